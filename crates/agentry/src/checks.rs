//! Connectivity checks for the external pieces the agents depend on.

use std::path::Path;

use agentry_core::tool::Error;
use agentry_repo::{CodeAssistant, Invocation, search_repository};
use agentry_search::{SearchClient, SearchConfig};
use serde_json::Value;

/// What [`check_repo`] found.
#[derive(Debug)]
pub struct RepoReport {
    /// The version reported by the assistant CLI.
    pub assistant_version: String,
    /// Whether the directory has a `.git` entry.
    pub is_git_repo: bool,
    /// The outcome of the sample query.
    pub invocation: Invocation,
}

/// Checks the assistant CLI and the repository, then runs `query` as a
/// repository search.
pub async fn check_repo(
    assistant: &CodeAssistant,
    repo_path: &Path,
    query: &str,
) -> Result<RepoReport, Error> {
    if !tokio::fs::metadata(repo_path)
        .await
        .is_ok_and(|meta| meta.is_dir())
    {
        return Err(Error::not_found().with_reason(format!(
            "Repository path does not exist: {}",
            repo_path.display()
        )));
    }
    let is_git_repo = tokio::fs::try_exists(repo_path.join(".git"))
        .await
        .unwrap_or(false);
    if !is_git_repo {
        warn!("{} is not a git repository", repo_path.display());
    }

    // The search probes the assistant first, so its version comes along.
    let invocation = search_repository(assistant, query, repo_path, &[]).await?;
    debug!("assistant version: {}", invocation.version);
    Ok(RepoReport {
        assistant_version: invocation.version.clone(),
        is_git_repo,
        invocation,
    })
}

/// One line of the connection summary printed before a search check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setting {
    /// What the line is about.
    pub label: &'static str,
    /// The human-readable value.
    pub value: String,
    /// Whether the value deserves a warning.
    pub warning: bool,
}

impl Setting {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            warning: false,
        }
    }
}

/// Summarizes the connection settings: host, port, authentication and SSL.
/// Missing authentication is flagged as a warning.
pub fn search_settings(config: &SearchConfig) -> Vec<Setting> {
    let authentication = match config.credentials() {
        Some((username, _)) => Setting::new(
            "Authentication",
            format!("Enabled (user {username})"),
        ),
        None => Setting {
            warning: true,
            ..Setting::new("Authentication", "Not configured")
        },
    };
    let ssl = match (config.use_ssl(), config.verify_certs()) {
        (true, true) => "Enabled",
        (true, false) => "Enabled (certificates not verified)",
        (false, _) => "Disabled",
    };
    vec![
        Setting::new("Host", config.host()),
        Setting::new("Port", config.port().to_string()),
        authentication,
        Setting::new("SSL", ssl),
    ]
}

/// Connects to the cluster and returns its information document.
pub async fn check_search(config: &SearchConfig) -> Result<Value, Error> {
    let client = SearchClient::connect(config)?;
    client.info().await
}
