//! Tool call supports.

mod error;
mod object;
mod toolset;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub use error::{Error, ErrorKind};
pub use toolset::Toolset;

/// The result of a tool call.
///
/// On success the value is usually a JSON object, whose fields are merged
/// into the envelope built by [`into_envelope`].
pub type ToolResult = Result<Value, Error>;

/// A tool that can be called by the model.
///
/// Implementations of this trait should be stateless, and may not maintain any
/// internal state.
///
/// The tool can be context-aware, meaning it can access additional information
/// about the current execution context, such as a connection configuration.
/// To do this, make the context an immutable state of the tool, which can be
/// set during initialization, and copy it when executing.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}

/// Describes a tool that can be offered to a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool, as a JSON schema.
    pub parameters: Value,
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The arguments to pass to the tool, usually a JSON object.
    pub arguments: Value,
}

/// The result of calling a tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The status envelope, see [`into_envelope`].
    pub content: Value,
}

/// Converts a tool result into the uniform status envelope.
///
/// A success becomes `{"status": "success", ...}` where the fields of an
/// object payload are merged in, and any other payload sits under
/// `"result"`. An error becomes `{"status": "error", "error_kind": ...,
/// "error_message": ...}`, plus `"exit_code"` when a process failed.
pub fn into_envelope(result: ToolResult) -> Value {
    match result {
        Ok(Value::Object(fields)) => {
            let mut envelope = Map::with_capacity(fields.len() + 1);
            envelope.insert("status".to_owned(), json!("success"));
            for (key, value) in fields {
                if key != "status" {
                    envelope.insert(key, value);
                }
            }
            Value::Object(envelope)
        }
        Ok(other) => json!({
            "status": "success",
            "result": other,
        }),
        Err(err) => {
            let mut envelope = json!({
                "status": "error",
                "error_kind": err.kind(),
                "error_message": err.reason(),
            });
            if let Some(exit_code) = err.exit_code() {
                envelope["exit_code"] = json!(exit_code);
            }
            envelope
        }
    }
}
