use std::path::PathBuf;

use agentry_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::{CodeAssistant, search_repository};

#[derive(Deserialize, JsonSchema)]
pub struct SearchRepositoryParameters {
    #[schemars(description = "The text, pattern or concept to look for.")]
    query: String,
    #[schemars(description = "Path to the repository.")]
    repo_path: String,
    #[schemars(description = "Glob patterns of files to include, e.g. `*.rs`.")]
    #[serde(default)]
    file_patterns: Option<Vec<String>>,
}

/// A tool for searching a repository through the code assistant.
pub struct SearchRepositoryTool {
    assistant: CodeAssistant,
    parameter_schema: Value,
}

impl SearchRepositoryTool {
    /// Creates a new search tool.
    #[inline]
    pub fn new(assistant: CodeAssistant) -> Self {
        SearchRepositoryTool {
            assistant,
            parameter_schema: schema_for!(SearchRepositoryParameters)
                .to_value(),
        }
    }
}

impl Tool for SearchRepositoryTool {
    type Input = SearchRepositoryParameters;

    fn name(&self) -> &str {
        "search_repository"
    }

    fn description(&self) -> &str {
        r#"
Searches a repository for code, patterns or concepts.
Optionally restrict the search to files matching the given patterns."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SearchRepositoryParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let assistant = self.assistant.clone();
        async move {
            let repo_path = PathBuf::from(input.repo_path);
            let file_patterns = input.file_patterns.unwrap_or_default();
            search_repository(&assistant, &input.query, &repo_path, &file_patterns)
                .await
                .map(|invocation| invocation.into_value())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_assistant;

    #[tokio::test]
    async fn test_search_repository() {
        let dir = tempfile::tempdir().unwrap();
        let tool =
            SearchRepositoryTool::new(fake_assistant(dir.path(), r#"printf '%s' "$2""#));

        let value = tool
            .execute(SearchRepositoryParameters {
                query: "spawn".to_owned(),
                repo_path: dir.path().to_string_lossy().into_owned(),
                file_patterns: Some(vec!["*.rs".to_owned()]),
            })
            .await
            .unwrap();
        assert_eq!(value["result"], r#"search --include="*.rs" "spawn""#);
        assert_eq!(value["format"], "text");
        assert_eq!(value["claude_version"], "fake-assistant 1.0.0");
    }
}
