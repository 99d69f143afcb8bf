use std::path::PathBuf;

use agentry_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::{CodeAssistant, execute_task};

#[derive(Deserialize, JsonSchema)]
pub struct ExecuteTaskParameters {
    #[schemars(description = "The task to carry out.")]
    task: String,
    #[schemars(description = "Path to the repository.")]
    repo_path: String,
}

/// A tool for running a general task in a repository.
pub struct ExecuteTaskTool {
    assistant: CodeAssistant,
    parameter_schema: Value,
}

impl ExecuteTaskTool {
    /// Creates a new task tool.
    #[inline]
    pub fn new(assistant: CodeAssistant) -> Self {
        ExecuteTaskTool {
            assistant,
            parameter_schema: schema_for!(ExecuteTaskParameters).to_value(),
        }
    }
}

impl Tool for ExecuteTaskTool {
    type Input = ExecuteTaskParameters;

    fn name(&self) -> &str {
        "execute_task"
    }

    fn description(&self) -> &str {
        r#"
Hands a general task to the code assistant, running inside the repository."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: ExecuteTaskParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let assistant = self.assistant.clone();
        async move {
            let repo_path = PathBuf::from(input.repo_path);
            execute_task(&assistant, &input.task, &repo_path)
                .await
                .map(|invocation| invocation.into_value())
        }
    }
}
