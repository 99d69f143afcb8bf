use std::env;
use std::fmt::{self, Debug};

use agentry_core::server::StdioServerParams;

/// The container image of the official GitHub MCP server.
pub const GITHUB_SERVER_IMAGE: &str = "ghcr.io/github/github-mcp-server";

const TOKEN_ENV_VAR: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
const TOOLSETS_ENV_VAR: &str = "GITHUB_TOOLSETS";
const DYNAMIC_TOOLSETS_ENV_VAR: &str = "GITHUB_DYNAMIC_TOOLSETS";
const HOST_ENV_VAR: &str = "GITHUB_HOST";

/// Settings forwarded to the GitHub MCP server container.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GithubServerConfig {
    token: Option<String>,
    toolsets: Option<String>,
    dynamic_toolsets: Option<String>,
    host: Option<String>,
}

impl GithubServerConfig {
    /// Reads the `GITHUB_*` variables.
    #[inline]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], but reads variables through `lookup`.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            token: get(TOKEN_ENV_VAR),
            toolsets: get(TOOLSETS_ENV_VAR),
            dynamic_toolsets: get(DYNAMIC_TOOLSETS_ENV_VAR),
            host: get(HOST_ENV_VAR),
        }
    }

    /// Returns `true` if a personal access token is configured.
    #[inline]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Builds the `docker run` launch for the server.
    ///
    /// The container always asks for all four variables, but only the ones
    /// that are set get a value in the subprocess environment. A missing
    /// token is not fatal: the server starts and fails to authenticate.
    pub fn into_server_params(self) -> StdioServerParams {
        if self.token.is_none() {
            warn!(
                "{TOKEN_ENV_VAR} is not set, the GitHub MCP server will not \
                 be able to authenticate"
            );
        }

        let mut params = StdioServerParams::new("github", "docker")
            .with_args(["run", "-i", "--rm"]);
        for key in [
            TOKEN_ENV_VAR,
            TOOLSETS_ENV_VAR,
            DYNAMIC_TOOLSETS_ENV_VAR,
            HOST_ENV_VAR,
        ] {
            params = params.with_args(["-e", key]);
        }
        params = params.with_arg(GITHUB_SERVER_IMAGE);

        let forwarded = [
            (TOKEN_ENV_VAR, self.token),
            (TOOLSETS_ENV_VAR, self.toolsets),
            (DYNAMIC_TOOLSETS_ENV_VAR, self.dynamic_toolsets),
            (HOST_ENV_VAR, self.host),
        ];
        for (key, value) in forwarded {
            if let Some(value) = value {
                params = params.with_env(key, value);
            }
        }
        params
    }
}

impl Debug for GithubServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubServerConfig")
            .field("token", &self.token.as_ref().map(|_| "<deducted>"))
            .field("toolsets", &self.toolsets)
            .field("dynamic_toolsets", &self.dynamic_toolsets)
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> GithubServerConfig {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        GithubServerConfig::from_lookup(|key| {
            vars.get(key).map(|v| (*v).to_owned())
        })
    }

    #[test]
    fn test_launch_arguments() {
        let params = from_vars(&[]).into_server_params();
        assert_eq!(params.command(), "docker");
        assert_eq!(
            params.args(),
            [
                "run",
                "-i",
                "--rm",
                "-e",
                "GITHUB_PERSONAL_ACCESS_TOKEN",
                "-e",
                "GITHUB_TOOLSETS",
                "-e",
                "GITHUB_DYNAMIC_TOOLSETS",
                "-e",
                "GITHUB_HOST",
                "ghcr.io/github/github-mcp-server",
            ]
        );
        assert!(params.env().is_empty());
    }

    #[test]
    fn test_only_set_variables_are_forwarded() {
        let config = from_vars(&[
            ("GITHUB_PERSONAL_ACCESS_TOKEN", "ghp_secret"),
            ("GITHUB_TOOLSETS", "repos,issues"),
            ("GITHUB_HOST", ""),
        ]);
        assert!(config.has_token());
        assert!(!format!("{config:?}").contains("ghp_secret"));

        let params = config.into_server_params();
        let keys: Vec<_> = params.env().keys().map(String::as_str).collect();
        assert_eq!(keys, ["GITHUB_PERSONAL_ACCESS_TOKEN", "GITHUB_TOOLSETS"]);
        assert_eq!(params.env()["GITHUB_TOOLSETS"], "repos,issues");
    }

    #[test]
    fn test_missing_token_still_launches() {
        let config = from_vars(&[("GITHUB_DYNAMIC_TOOLSETS", "1")]);
        assert!(!config.has_token());

        let params = config.into_server_params();
        assert_eq!(params.name(), "github");
        assert!(!params.env().contains_key("GITHUB_PERSONAL_ACCESS_TOKEN"));
        assert_eq!(params.env()["GITHUB_DYNAMIC_TOOLSETS"], "1");
    }
}
