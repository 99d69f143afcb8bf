use agentry_core::tool::{Error, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::{ConfigSource, QueryResults};

fn results_to_value(results: QueryResults) -> ToolResult {
    serde_json::to_value(results).map_err(|err| {
        Error::transport().with_reason(format!("Unserializable results: {err}"))
    })
}

#[derive(Deserialize, JsonSchema)]
pub struct QueryParameters {
    #[schemars(description = "The index to search in.")]
    collection: String,
    #[schemars(description = "A query in the OpenSearch query DSL.")]
    query: Value,
}

/// A tool for running a query DSL search.
pub struct QueryTool {
    source: ConfigSource,
    parameter_schema: Value,
}

impl QueryTool {
    /// Creates a new query tool.
    #[inline]
    pub fn new(source: ConfigSource) -> Self {
        QueryTool {
            source,
            parameter_schema: schema_for!(QueryParameters).to_value(),
        }
    }
}

impl Tool for QueryTool {
    type Input = QueryParameters;

    fn name(&self) -> &str {
        "query"
    }

    fn description(&self) -> &str {
        r#"
Searches an index with a query written in the OpenSearch query DSL.
Returns the total hit count, and the ID, score and source of each hit."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: QueryParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let source = self.source.clone();
        async move {
            let client = source.connect()?;
            let results = client.query(&input.collection, input.query).await?;
            results_to_value(results)
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct SimpleTextQueryParameters {
    #[schemars(description = "The index to search in.")]
    collection: String,
    #[schemars(description = "Plain text to look for.")]
    text: String,
}

/// A tool for a fuzzy plain text search.
pub struct SimpleTextQueryTool {
    source: ConfigSource,
    parameter_schema: Value,
}

impl SimpleTextQueryTool {
    /// Creates a new text query tool.
    #[inline]
    pub fn new(source: ConfigSource) -> Self {
        SimpleTextQueryTool {
            source,
            parameter_schema: schema_for!(SimpleTextQueryParameters)
                .to_value(),
        }
    }
}

impl Tool for SimpleTextQueryTool {
    type Input = SimpleTextQueryParameters;

    fn name(&self) -> &str {
        "simple_text_query"
    }

    fn description(&self) -> &str {
        r#"
Searches every field of an index for the given text, tolerating typos."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SimpleTextQueryParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let source = self.source.clone();
        async move {
            let client = source.connect()?;
            let results =
                client.simple_text_query(&input.collection, &input.text).await?;
            results_to_value(results)
        }
    }
}
