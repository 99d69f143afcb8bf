use std::path::PathBuf;

use agentry_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::{CodeAssistant, explain_code};

#[derive(Deserialize, JsonSchema)]
pub struct ExplainCodeParameters {
    #[schemars(description = "The file to explain, relative to `repo_path` or absolute inside it.")]
    file_path: String,
    #[schemars(description = "Path to the repository.")]
    repo_path: String,
    #[schemars(description = "Optional line range, e.g. `10-20`.")]
    #[serde(default)]
    line_range: Option<String>,
}

/// A tool for explaining code in a file.
pub struct ExplainCodeTool {
    assistant: CodeAssistant,
    parameter_schema: Value,
}

impl ExplainCodeTool {
    /// Creates a new explain tool.
    #[inline]
    pub fn new(assistant: CodeAssistant) -> Self {
        ExplainCodeTool {
            assistant,
            parameter_schema: schema_for!(ExplainCodeParameters).to_value(),
        }
    }
}

impl Tool for ExplainCodeTool {
    type Input = ExplainCodeParameters;

    fn name(&self) -> &str {
        "explain_code"
    }

    fn description(&self) -> &str {
        r#"
Explains what the code in a file does, optionally limited to a line range."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: ExplainCodeParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let assistant = self.assistant.clone();
        async move {
            let file_path = PathBuf::from(input.file_path);
            let repo_path = PathBuf::from(input.repo_path);
            explain_code(
                &assistant,
                &file_path,
                &repo_path,
                input.line_range.as_deref(),
            )
            .await
            .map(|invocation| invocation.into_value())
        }
    }
}
