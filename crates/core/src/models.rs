//! Named model roles and their resolution from the environment.
//!
//! Agents never hard-code a model identifier. They pick a [`ModelRole`], and
//! the concrete identifier is looked up once at startup: an environment
//! variable wins if it is set to a non-empty value, otherwise the compiled-in
//! default is used.

use std::env;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Default identifier for [`ModelRole::Fast`].
pub const DEFAULT_FAST_MODEL: &str =
    "bedrock/anthropic.claude-3-haiku-20240307-v1:0";
/// Default identifier for [`ModelRole::Smart`].
pub const DEFAULT_SMART_MODEL: &str =
    "bedrock/anthropic.claude-3-5-sonnet-20241022-v2:0";
/// Default identifier for [`ModelRole::Powerful`].
pub const DEFAULT_POWERFUL_MODEL: &str =
    "bedrock/anthropic.claude-3-7-sonnet-20250219-v1:0";

/// A logical model role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// Cheap and quick, also known as "lite".
    Fast,
    /// The everyday model, also known as "standard".
    Smart,
    /// The strongest model, also known as "thinking".
    Powerful,
}

impl ModelRole {
    /// All roles, in ascending order of capability.
    pub const ALL: [ModelRole; 3] =
        [ModelRole::Fast, ModelRole::Smart, ModelRole::Powerful];

    /// Returns the canonical name of the role.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            ModelRole::Fast => "fast",
            ModelRole::Smart => "smart",
            ModelRole::Powerful => "powerful",
        }
    }

    /// Returns the environment variable that overrides this role.
    #[inline]
    pub fn env_var(self) -> &'static str {
        match self {
            ModelRole::Fast => "AGENT_FAST_MODEL",
            ModelRole::Smart => "AGENT_SMART_MODEL",
            ModelRole::Powerful => "AGENT_POWERFUL_MODEL",
        }
    }

    /// Returns the compiled-in model identifier for this role.
    #[inline]
    pub fn default_model(self) -> &'static str {
        match self {
            ModelRole::Fast => DEFAULT_FAST_MODEL,
            ModelRole::Smart => DEFAULT_SMART_MODEL,
            ModelRole::Powerful => DEFAULT_POWERFUL_MODEL,
        }
    }
}

impl Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRole(String);

impl Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for ModelRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" | "lite" => Ok(ModelRole::Fast),
            "smart" | "standard" => Ok(ModelRole::Smart),
            "powerful" | "thinking" => Ok(ModelRole::Powerful),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

/// Resolves a model identifier from the process environment.
///
/// Returns the value of `override_env_var` if it is set and non-empty,
/// otherwise `default_value`. The `role` only shows up in diagnostics.
pub fn resolve(
    role: &str,
    override_env_var: &str,
    default_value: &str,
) -> String {
    resolve_from(
        |key| env::var(key).ok(),
        role,
        override_env_var,
        default_value,
    )
}

/// Same as [`resolve`], but reads variables through `lookup`.
pub fn resolve_from<F>(
    lookup: F,
    role: &str,
    override_env_var: &str,
    default_value: &str,
) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(override_env_var) {
        Some(value) if !value.is_empty() => {
            debug!("model role `{role}` overridden by {override_env_var}");
            value
        }
        _ => default_value.to_owned(),
    }
}

/// The resolved model identifiers for every role.
///
/// Built once at startup and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelAliases {
    fast: String,
    smart: String,
    powerful: String,
}

impl ModelAliases {
    /// Resolves all roles from the process environment.
    #[inline]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves all roles through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve_role = |role: ModelRole| {
            resolve_from(
                &lookup,
                role.name(),
                role.env_var(),
                role.default_model(),
            )
        };
        Self {
            fast: resolve_role(ModelRole::Fast),
            smart: resolve_role(ModelRole::Smart),
            powerful: resolve_role(ModelRole::Powerful),
        }
    }

    /// Returns the model identifier for `role`.
    #[inline]
    pub fn get(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Fast => &self.fast,
            ModelRole::Smart => &self.smart,
            ModelRole::Powerful => &self.powerful,
        }
    }
}

impl Default for ModelAliases {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let resolved = resolve_from(
            lookup_in(&[]),
            "fast",
            "AGENT_FAST_MODEL",
            "bedrock/anthropic.claude-3-haiku-20240307-v1:0",
        );
        assert_eq!(resolved, "bedrock/anthropic.claude-3-haiku-20240307-v1:0");
    }

    #[test]
    fn test_resolve_prefers_non_empty_override() {
        let lookup = lookup_in(&[("AGENT_SMART_MODEL", "openai/gpt-4o")]);
        let resolved =
            resolve_from(lookup, "smart", "AGENT_SMART_MODEL", "fallback");
        assert_eq!(resolved, "openai/gpt-4o");
    }

    #[test]
    fn test_resolve_ignores_empty_override() {
        let lookup = lookup_in(&[("AGENT_SMART_MODEL", "")]);
        let resolved =
            resolve_from(lookup, "smart", "AGENT_SMART_MODEL", "fallback");
        assert_eq!(resolved, "fallback");
    }

    #[test]
    fn test_aliases_resolve_every_role() {
        let aliases = ModelAliases::from_lookup(lookup_in(&[(
            "AGENT_POWERFUL_MODEL",
            "local/big-model",
        )]));
        assert_eq!(aliases.get(ModelRole::Fast), DEFAULT_FAST_MODEL);
        assert_eq!(aliases.get(ModelRole::Smart), DEFAULT_SMART_MODEL);
        assert_eq!(aliases.get(ModelRole::Powerful), "local/big-model");
    }

    #[test]
    fn test_parse_role_names() {
        assert_eq!("fast".parse(), Ok(ModelRole::Fast));
        assert_eq!("Lite".parse(), Ok(ModelRole::Fast));
        assert_eq!("standard".parse(), Ok(ModelRole::Smart));
        assert_eq!("THINKING".parse(), Ok(ModelRole::Powerful));
        assert!("huge".parse::<ModelRole>().is_err());
    }
}
