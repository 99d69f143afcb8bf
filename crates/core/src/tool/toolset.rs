use std::collections::HashMap;
use std::sync::Arc;

use crate::tool::object::{ToolObject, ToolObjectImpl};
use crate::tool::{
    Error, Tool, ToolCallRequest, ToolCallResult, ToolDefinition,
    into_envelope,
};

/// An object that owns a set of tools and dispatches requests to them.
#[derive(Default)]
pub struct Toolset {
    tools: HashMap<String, Arc<dyn ToolObject>>,
}

impl Toolset {
    /// Registers a tool, replacing any tool with the same name.
    pub fn add_tool<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_owned();
        if self
            .tools
            .insert(name, Arc::new(ToolObjectImpl(tool)))
            .is_some()
        {
            warn!("a tool was registered twice, keeping the latest one");
        }
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns `true` if a tool named `name` is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns definitions of all tools, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_owned(),
                description: tool.description().trim().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Runs the requested tool and wraps its outcome in a status envelope.
    ///
    /// Unknown tools and malformed arguments are reported as `InvalidInput`
    /// errors, like any other tool failure.
    pub fn call(
        &self,
        req: ToolCallRequest,
    ) -> impl Future<Output = ToolCallResult> + Send + 'static {
        let ToolCallRequest {
            id,
            name,
            arguments,
        } = req;

        let span = debug_span!("toolset");
        let _enter = span.enter();

        let execution = match self.tools.get(&name) {
            Some(tool) => {
                trace!("calling a tool ({id}) with args: {arguments:?}");
                Ok(Arc::clone(tool).execute(arguments))
            }
            None => {
                warn!("tool not found: {name}");
                Err(Error::invalid_input()
                    .with_reason(format!("Unknown tool: {name}")))
            }
        };

        async move {
            let result = match execution {
                Ok(fut) => fut.await,
                Err(err) => Err(err),
            };
            ToolCallResult {
                id,
                content: into_envelope(result),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;
    use crate::tool::ToolResult;

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
    }

    struct EchoTool;

    impl Tool for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "\nEchoes the input back.\n"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(json!({ "result": input.text })))
        }
    }

    struct FailingTool;

    impl Tool for FailingTool {
        type Input = Value;

        fn name(&self) -> &str {
            "fail"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Err(Error::not_found().with_reason("nothing here")))
        }
    }

    fn toolset() -> Toolset {
        let mut toolset = Toolset::default();
        toolset.add_tool(FailingTool);
        toolset.add_tool(EchoTool);
        toolset
    }

    #[test]
    fn test_definitions_are_sorted_and_trimmed() {
        let definitions = toolset().definitions();
        let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["echo", "fail"]);
        assert_eq!(definitions[0].description, "Echoes the input back.");
    }

    #[tokio::test]
    async fn test_call_known_tool() {
        let result = toolset()
            .call(ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "echo".to_owned(),
                arguments: json!({ "text": "hello" }),
            })
            .await;
        assert_eq!(result.id, "tool:1");
        assert_eq!(
            result.content,
            json!({ "status": "success", "result": "hello" })
        );
    }

    #[tokio::test]
    async fn test_call_reports_errors_as_envelopes() {
        let toolset = toolset();

        let result = toolset
            .call(ToolCallRequest {
                id: "tool:2".to_owned(),
                name: "read_tool".to_owned(),
                arguments: json!({}),
            })
            .await;
        assert_eq!(result.content["status"], "error");
        assert_eq!(result.content["error_kind"], "invalid_input");

        let result = toolset
            .call(ToolCallRequest {
                id: "tool:3".to_owned(),
                name: "echo".to_owned(),
                arguments: json!({ "txt": "typo" }),
            })
            .await;
        assert_eq!(result.content["error_kind"], "invalid_input");

        let result = toolset
            .call(ToolCallRequest {
                id: "tool:4".to_owned(),
                name: "fail".to_owned(),
                arguments: json!(null),
            })
            .await;
        assert_eq!(result.content["error_kind"], "not_found");
        assert_eq!(result.content["error_message"], "nothing here");
    }
}
