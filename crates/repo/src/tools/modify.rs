use std::path::PathBuf;

use agentry_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::{CodeAssistant, modify_code};

#[derive(Deserialize, JsonSchema)]
pub struct ModifyCodeParameters {
    #[schemars(description = "How the code should be changed.")]
    instruction: String,
    #[schemars(description = "The file to modify, relative to `repo_path` or absolute inside it.")]
    file_path: String,
    #[schemars(description = "Path to the repository.")]
    repo_path: String,
}

/// A tool for modifying code in a file.
pub struct ModifyCodeTool {
    assistant: CodeAssistant,
    parameter_schema: Value,
}

impl ModifyCodeTool {
    /// Creates a new modify tool.
    #[inline]
    pub fn new(assistant: CodeAssistant) -> Self {
        ModifyCodeTool {
            assistant,
            parameter_schema: schema_for!(ModifyCodeParameters).to_value(),
        }
    }
}

impl Tool for ModifyCodeTool {
    type Input = ModifyCodeParameters;

    fn name(&self) -> &str {
        "modify_code"
    }

    fn description(&self) -> &str {
        r#"
Modifies a file in the repository following the given instruction.
The file must be inside the repository."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: ModifyCodeParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let assistant = self.assistant.clone();
        async move {
            let file_path = PathBuf::from(input.file_path);
            let repo_path = PathBuf::from(input.repo_path);
            modify_code(&assistant, &input.instruction, &file_path, &repo_path)
                .await
                .map(|invocation| invocation.into_value())
        }
    }
}
