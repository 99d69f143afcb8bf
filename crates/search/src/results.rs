use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The outcome of a query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryResults {
    /// Total number of matching documents, which may exceed `results.len()`.
    pub total_hits: u64,
    /// The returned page of hits.
    pub results: Vec<Hit>,
}

/// A single matching document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hit {
    /// The document identifier.
    pub id: String,
    /// The relevance score, absent when the query did not score.
    pub score: Option<f64>,
    /// The stored document.
    pub document: Value,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    hits: RawHits,
}

#[derive(Default, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

// Older clusters report the total as a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Object { value: u64 },
    Count(u64),
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: Value,
}

impl QueryResults {
    /// Extracts the results from a `_search` response body.
    pub fn from_response(body: Value) -> Result<Self, serde_json::Error> {
        let raw: RawResponse = serde_json::from_value(body)?;
        let total_hits = match raw.hits.total {
            Some(RawTotal::Object { value }) | Some(RawTotal::Count(value)) => {
                value
            }
            None => 0,
        };
        let results = raw
            .hits
            .hits
            .into_iter()
            .map(|hit| Hit {
                id: hit.id,
                score: hit.score,
                document: hit.source,
            })
            .collect();
        Ok(Self {
            total_hits,
            results,
        })
    }
}

/// Builds a fuzzy match over every field for a plain text query.
pub fn text_query(text: &str) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": text,
                "fields": ["*"],
                "fuzziness": "AUTO",
            }
        }
    })
}
