use std::env;
use std::fmt::{self, Debug};
use std::time::Duration;

use agentry_core::tool::Error;

use crate::SearchClient;

const HOST_ENV_VAR: &str = "OPENSEARCH_HOST";
const PORT_ENV_VAR: &str = "OPENSEARCH_PORT";
const USERNAME_ENV_VAR: &str = "OPENSEARCH_USERNAME";
const PASSWORD_ENV_VAR: &str = "OPENSEARCH_PASSWORD";
const USE_SSL_ENV_VAR: &str = "OPENSEARCH_USE_SSL";

const DEFAULT_PORT: u16 = 9200;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the search cluster.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SearchConfig {
    host: String,
    port: u16,
    use_ssl: bool,
    verify_certs: bool,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl SearchConfig {
    /// Creates a configuration for `host` with the default settings: port
    /// 9200, SSL on without certificate verification, no authentication and
    /// a 60 second timeout.
    #[inline]
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            use_ssl: true,
            verify_certs: false,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads the configuration from the `OPENSEARCH_*` variables.
    #[inline]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], but reads variables through `lookup`.
    ///
    /// `OPENSEARCH_HOST` is required. Basic authentication is only used when
    /// both the username and the password are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let Some(host) = get(HOST_ENV_VAR) else {
            return Err(Error::configuration().with_reason(format!(
                "{HOST_ENV_VAR} environment variable must be set"
            )));
        };
        let mut config = Self::new(host);

        if let Some(port) = get(PORT_ENV_VAR) {
            config.port = port.trim().parse().map_err(|_| {
                Error::configuration()
                    .with_reason(format!("{PORT_ENV_VAR} is not a port: {port}"))
            })?;
        }
        if let Some(use_ssl) = get(USE_SSL_ENV_VAR) {
            config.use_ssl = use_ssl.trim().eq_ignore_ascii_case("true");
        }
        if let (Some(username), Some(password)) =
            (get(USERNAME_ENV_VAR), get(PASSWORD_ENV_VAR))
        {
            config.credentials = Some((username, password));
        }
        Ok(config)
    }

    /// Sets the port.
    #[inline]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Turns SSL on or off.
    #[inline]
    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Turns certificate verification on or off.
    #[inline]
    pub fn with_verify_certs(mut self, verify_certs: bool) -> Self {
        self.verify_certs = verify_certs;
        self
    }

    /// Sets basic authentication credentials.
    #[inline]
    pub fn with_credentials<S1: Into<String>, S2: Into<String>>(
        mut self,
        username: S1,
        password: S2,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the request timeout.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host name.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether SSL is used.
    #[inline]
    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// Returns whether server certificates are verified.
    #[inline]
    pub fn verify_certs(&self) -> bool {
        self.verify_certs
    }

    /// Returns the basic authentication credentials, if any.
    #[inline]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(username, password)| (username.as_str(), password.as_str()))
    }

    /// Returns the request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the URL every request path is appended to.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

impl Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_ssl", &self.use_ssl)
            .field("verify_certs", &self.verify_certs)
            .field(
                "username",
                &self.credentials.as_ref().map(|(username, _)| username),
            )
            .field("password", &"<deducted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where tools get their connection settings from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read the environment again on every call.
    #[default]
    Environment,
    /// Always use this configuration.
    Fixed(SearchConfig),
}

impl ConfigSource {
    /// Resolves the configuration and opens a client.
    pub fn connect(&self) -> Result<SearchClient, Error> {
        match self {
            ConfigSource::Environment => {
                SearchClient::connect(&SearchConfig::from_env()?)
            }
            ConfigSource::Fixed(config) => SearchClient::connect(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use agentry_core::tool::ErrorKind;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Result<SearchConfig, Error> {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        SearchConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()))
    }

    #[test]
    fn test_host_is_required() {
        let err = from_vars(&[("OPENSEARCH_PORT", "9300")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = from_vars(&[("OPENSEARCH_HOST", "")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[("OPENSEARCH_HOST", "search.local")]).unwrap();
        assert_eq!(config.port(), 9200);
        assert!(config.use_ssl());
        assert!(config.credentials().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.base_url(), "https://search.local:9200");
    }

    #[test]
    fn test_overrides() {
        let config = from_vars(&[
            ("OPENSEARCH_HOST", "localhost"),
            ("OPENSEARCH_PORT", "9201"),
            ("OPENSEARCH_USE_SSL", "False"),
            ("OPENSEARCH_USERNAME", "admin"),
            ("OPENSEARCH_PASSWORD", "hunter2"),
        ])
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:9201");
        assert_eq!(config.credentials(), Some(("admin", "hunter2")));
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config = from_vars(&[
            ("OPENSEARCH_HOST", "localhost"),
            ("OPENSEARCH_USERNAME", "admin"),
        ])
        .unwrap();
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = from_vars(&[
            ("OPENSEARCH_HOST", "localhost"),
            ("OPENSEARCH_PORT", "ninety-two hundred"),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
