//! Declarations of the built-in agents.

use agentry_core::models::{ModelAliases, ModelRole};
use agentry_core::{Agent, AgentBuilder};
use agentry_repo::CodeAssistant;
use agentry_search::ConfigSource;

use crate::github::GithubServerConfig;

/// Name of the GitHub agent.
pub const GITHUB_AGENT: &str = "github_mcp_agent";
/// Name of the search agent.
pub const SEARCH_AGENT: &str = "opensearch_agent";
/// Name of the repository agent.
pub const REPO_AGENT: &str = "repo_agent";

const GITHUB_INSTRUCTION: &str = "\
You work with GitHub through the official GitHub MCP server. The server needs \
GITHUB_PERSONAL_ACCESS_TOKEN in its environment to authenticate. Use the tools \
it provides to manage repositories, issues, pull requests and users as asked. \
GITHUB_TOOLSETS limits the enabled toolsets (e.g. 'repos,issues'), \
GITHUB_DYNAMIC_TOOLSETS=1 turns on dynamic tool discovery and GITHUB_HOST \
points at a GitHub Enterprise Server.";

const SEARCH_INSTRUCTION: &str = "\
You index, search and manage documents in OpenSearch. You can create indices, \
add or replace documents, run queries and delete documents.";

const REPO_INSTRUCTION: &str = "\
You analyze, explain and modify code in a repository by delegating to a code \
assistant. You can search for patterns, explain code, edit files and carry \
out general tasks. Be precise when reporting search results or changes.";

/// Declares the agent that drives the GitHub MCP server.
pub fn github_agent(models: &ModelAliases, github: GithubServerConfig) -> Agent {
    AgentBuilder::with_role(GITHUB_AGENT, ModelRole::Powerful, models)
        .with_description(
            "Performs GitHub operations through the official GitHub MCP \
             server running in Docker. Requires a personal access token.",
        )
        .with_instruction(GITHUB_INSTRUCTION)
        .with_server(github.into_server_params())
        .build()
}

/// Declares the agent with the document-search tools.
pub fn search_agent(models: &ModelAliases, source: ConfigSource) -> Agent {
    use agentry_search::tools::*;

    AgentBuilder::with_role(SEARCH_AGENT, ModelRole::Smart, models)
        .with_description("Indexes and searches data in OpenSearch.")
        .with_instruction(SEARCH_INSTRUCTION)
        .with_tool(CreateCollectionTool::new(source.clone()))
        .with_tool(UpsertDocumentTool::new(source.clone()))
        .with_tool(QueryTool::new(source.clone()))
        .with_tool(SimpleTextQueryTool::new(source.clone()))
        .with_tool(DeleteDocumentTool::new(source))
        .build()
}

/// Declares the agent with the repository tools.
pub fn repo_agent(models: &ModelAliases, assistant: CodeAssistant) -> Agent {
    use agentry_repo::tools::*;

    AgentBuilder::with_role(REPO_AGENT, ModelRole::Powerful, models)
        .with_description("Works with code repositories through a code assistant.")
        .with_instruction(REPO_INSTRUCTION)
        .with_tool(SearchRepositoryTool::new(assistant.clone()))
        .with_tool(ExplainCodeTool::new(assistant.clone()))
        .with_tool(ModifyCodeTool::new(assistant.clone()))
        .with_tool(ExecuteTaskTool::new(assistant))
        .build()
}

/// Declares every agent, configured from the environment.
pub fn all_from_env() -> Vec<Agent> {
    let models = ModelAliases::from_env();
    vec![
        github_agent(&models, GithubServerConfig::from_env()),
        search_agent(&models, ConfigSource::Environment),
        repo_agent(&models, CodeAssistant::from_env()),
    ]
}
