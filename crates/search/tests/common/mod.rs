//! An in-memory stand-in for an OpenSearch cluster.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use agentry_search::SearchConfig;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, head, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct Collection {
    mapping: Value,
    documents: BTreeMap<String, Value>,
}

#[derive(Clone, Default)]
pub struct FakeCluster {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
    next_id: Arc<AtomicU64>,
    last_query: Arc<Mutex<Option<Value>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeCluster {
    pub fn mapping(&self, index: &str) -> Option<Value> {
        let collections = self.collections.lock().unwrap();
        collections.get(index).map(|c| c.mapping.clone())
    }

    pub fn last_query(&self) -> Option<Value> {
        self.last_query.lock().unwrap().clone()
    }

    /// Every request received so far, as `METHOD /path?query`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

type Reply = (StatusCode, Json<Value>);

/// Starts a fake cluster on a random local port.
pub async fn spawn_fake_cluster() -> (SearchConfig, FakeCluster) {
    let cluster = FakeCluster::default();
    let app = Router::new()
        .route("/", get(info))
        .route("/{index}", head(collection_exists).put(create_collection))
        .route("/{index}/_doc", post(add_document))
        .route(
            "/{index}/_doc/{id}",
            head(document_exists).put(put_document).delete(delete_document),
        )
        .route("/{index}/_search", post(search))
        .layer(middleware::from_fn_with_state(cluster.clone(), record_request))
        .with_state(cluster.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SearchConfig::new("127.0.0.1").with_port(port).with_ssl(false);
    (config, cluster)
}

async fn record_request(
    State(cluster): State<FakeCluster>,
    req: Request,
    next: Next,
) -> Response {
    let line = match req.uri().path_and_query() {
        Some(path) => format!("{} {path}", req.method()),
        None => format!("{} /", req.method()),
    };
    cluster.requests.lock().unwrap().push(line);
    next.run(req).await
}

async fn info() -> Json<Value> {
    Json(json!({
        "cluster_name": "fake-cluster",
        "version": { "distribution": "opensearch", "number": "2.13.0" },
    }))
}

async fn collection_exists(
    State(cluster): State<FakeCluster>,
    Path(index): Path<String>,
) -> StatusCode {
    if cluster.collections.lock().unwrap().contains_key(&index) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create_collection(
    State(cluster): State<FakeCluster>,
    Path(index): Path<String>,
    Json(mapping): Json<Value>,
) -> Reply {
    let mut collections = cluster.collections.lock().unwrap();
    if collections.contains_key(&index) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": { "type": "resource_already_exists_exception" },
                "status": 400,
            })),
        );
    }
    collections.insert(
        index.clone(),
        Collection {
            mapping,
            documents: BTreeMap::new(),
        },
    );
    (
        StatusCode::OK,
        Json(json!({ "acknowledged": true, "index": index })),
    )
}

async fn add_document(
    State(cluster): State<FakeCluster>,
    Path(index): Path<String>,
    Json(document): Json<Value>,
) -> Reply {
    let id = format!("gen-{}", cluster.next_id.fetch_add(1, Ordering::SeqCst));
    store_document(&cluster, index, id, document)
}

async fn put_document(
    State(cluster): State<FakeCluster>,
    Path((index, id)): Path<(String, String)>,
    Json(document): Json<Value>,
) -> Reply {
    store_document(&cluster, index, id, document)
}

fn store_document(
    cluster: &FakeCluster,
    index: String,
    id: String,
    document: Value,
) -> Reply {
    let mut collections = cluster.collections.lock().unwrap();
    let collection = collections.entry(index.clone()).or_default();
    let created = collection.documents.insert(id.clone(), document).is_none();
    let (status, result) = if created {
        (StatusCode::CREATED, "created")
    } else {
        (StatusCode::OK, "updated")
    };
    (
        status,
        Json(json!({ "_index": index, "_id": id, "result": result })),
    )
}

async fn document_exists(
    State(cluster): State<FakeCluster>,
    Path((index, id)): Path<(String, String)>,
) -> StatusCode {
    let collections = cluster.collections.lock().unwrap();
    let exists = collections
        .get(&index)
        .is_some_and(|c| c.documents.contains_key(&id));
    if exists {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn delete_document(
    State(cluster): State<FakeCluster>,
    Path((index, id)): Path<(String, String)>,
) -> Reply {
    let mut collections = cluster.collections.lock().unwrap();
    let Some(collection) = collections.get_mut(&index) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "type": "index_not_found_exception" } })),
        );
    };
    match collection.documents.remove(&id) {
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "_index": index, "_id": id, "result": "deleted" })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "_index": index, "_id": id, "result": "not_found" })),
        ),
    }
}

// Supports `match_all` (any body without `multi_match`) and a substring
// version of `multi_match` over string fields.
async fn search(
    State(cluster): State<FakeCluster>,
    Path(index): Path<String>,
    Json(query): Json<Value>,
) -> Reply {
    *cluster.last_query.lock().unwrap() = Some(query.clone());

    let collections = cluster.collections.lock().unwrap();
    let Some(collection) = collections.get(&index) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "type": "index_not_found_exception" } })),
        );
    };

    let needle = query
        .pointer("/query/multi_match/query")
        .and_then(Value::as_str)
        .map(str::to_lowercase);
    let hits: Vec<Value> = collection
        .documents
        .iter()
        .filter(|(_, document)| match &needle {
            Some(needle) => document.as_object().is_some_and(|fields| {
                fields.values().any(|value| {
                    value
                        .as_str()
                        .is_some_and(|text| text.to_lowercase().contains(needle))
                })
            }),
            None => true,
        })
        .map(|(id, document)| {
            json!({
                "_index": index,
                "_id": id,
                "_score": 1.0,
                "_source": document,
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "took": 1,
            "hits": {
                "total": { "value": hits.len(), "relation": "eq" },
                "hits": hits,
            }
        })),
    )
}
