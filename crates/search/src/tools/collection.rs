use agentry_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::ConfigSource;

#[derive(Deserialize, JsonSchema)]
pub struct CreateCollectionParameters {
    #[schemars(description = "Name of the index to create.")]
    name: String,
    #[schemars(description = "Optional index body, e.g. `{\"mappings\": {...}}`.")]
    #[serde(default)]
    mapping: Option<Value>,
}

/// A tool for creating an index.
pub struct CreateCollectionTool {
    source: ConfigSource,
    parameter_schema: Value,
}

impl CreateCollectionTool {
    /// Creates a new create-collection tool.
    #[inline]
    pub fn new(source: ConfigSource) -> Self {
        CreateCollectionTool {
            source,
            parameter_schema: schema_for!(CreateCollectionParameters)
                .to_value(),
        }
    }
}

impl Tool for CreateCollectionTool {
    type Input = CreateCollectionParameters;

    fn name(&self) -> &str {
        "create_collection"
    }

    fn description(&self) -> &str {
        r#"
Creates a search index, optionally with a mapping for its schema.
Fails if the index already exists."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: CreateCollectionParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let source = self.source.clone();
        async move {
            let client = source.connect()?;
            let response =
                client.create_collection(&input.name, input.mapping).await?;
            Ok(json!({
                "result": format!("Index '{}' created successfully.", input.name),
                "response": response,
            }))
        }
    }
}
