use agentry_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::ConfigSource;

#[derive(Deserialize, JsonSchema)]
pub struct UpsertDocumentParameters {
    #[schemars(description = "The index to add the document to.")]
    collection: String,
    #[schemars(description = "The document, as a JSON object.")]
    document: Value,
    #[schemars(description = "Document ID, generated by the cluster if omitted.")]
    #[serde(default)]
    id: Option<String>,
}

/// A tool for adding or replacing a document.
pub struct UpsertDocumentTool {
    source: ConfigSource,
    parameter_schema: Value,
}

impl UpsertDocumentTool {
    /// Creates a new upsert tool.
    #[inline]
    pub fn new(source: ConfigSource) -> Self {
        UpsertDocumentTool {
            source,
            parameter_schema: schema_for!(UpsertDocumentParameters).to_value(),
        }
    }
}

impl Tool for UpsertDocumentTool {
    type Input = UpsertDocumentParameters;

    fn name(&self) -> &str {
        "upsert_document"
    }

    fn description(&self) -> &str {
        r#"
Adds a document to an index, or replaces the document with the same ID.
The document is searchable as soon as this returns."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: UpsertDocumentParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let source = self.source.clone();
        async move {
            let client = source.connect()?;
            let response = client
                .upsert_document(
                    &input.collection,
                    input.document,
                    input.id.as_deref(),
                )
                .await?;
            Ok(json!({
                "result": "Document indexed successfully.",
                "id": response.get("_id").cloned().unwrap_or(Value::Null),
                "response": response,
            }))
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct DeleteDocumentParameters {
    #[schemars(description = "The index containing the document.")]
    collection: String,
    #[schemars(description = "The ID of the document to delete.")]
    id: String,
}

/// A tool for deleting a document.
pub struct DeleteDocumentTool {
    source: ConfigSource,
    parameter_schema: Value,
}

impl DeleteDocumentTool {
    /// Creates a new delete tool.
    #[inline]
    pub fn new(source: ConfigSource) -> Self {
        DeleteDocumentTool {
            source,
            parameter_schema: schema_for!(DeleteDocumentParameters).to_value(),
        }
    }
}

impl Tool for DeleteDocumentTool {
    type Input = DeleteDocumentParameters;

    fn name(&self) -> &str {
        "delete_document"
    }

    fn description(&self) -> &str {
        r#"
Deletes a document from an index by its ID."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: DeleteDocumentParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let source = self.source.clone();
        async move {
            let client = source.connect()?;
            let response =
                client.delete_document(&input.collection, &input.id).await?;
            Ok(json!({
                "result": format!(
                    "Document with ID '{}' deleted successfully.",
                    input.id
                ),
                "response": response,
            }))
        }
    }
}
