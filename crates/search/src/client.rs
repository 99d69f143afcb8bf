use agentry_core::tool::Error;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};

use crate::{QueryResults, SearchConfig, text_query};

/// A client for one search cluster.
///
/// Operations check the state of the cluster before acting, and report
/// mismatches as `NotFound` or `AlreadyExists` errors. Any other failure,
/// including unexpected responses, is a `Transport` error.
#[derive(Clone, Debug)]
pub struct SearchClient {
    http: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl SearchClient {
    /// Creates a client for the cluster described by `config`.
    pub fn connect(config: &SearchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_certs())
            .build()
            .map_err(transport_error)?;
        let credentials = config
            .credentials()
            .map(|(username, password)| (username.to_owned(), password.to_owned()));
        Ok(Self {
            http,
            base_url: config.base_url(),
            credentials,
        })
    }

    /// Returns the cluster information document.
    pub async fn info(&self) -> Result<Value, Error> {
        let resp = self.send(self.request(Method::GET, "/")).await?;
        expect_json(resp).await
    }

    /// Returns `true` if the collection exists.
    pub async fn collection_exists(&self, name: &str) -> Result<bool, Error> {
        let path = collection_path(name)?;
        let resp = self.send(self.request(Method::HEAD, &path)).await?;
        expect_presence(resp.status())
    }

    /// Creates a collection, optionally with a mapping.
    pub async fn create_collection(
        &self,
        name: &str,
        mapping: Option<Value>,
    ) -> Result<Value, Error> {
        debug!("creating collection `{name}`");
        if self.collection_exists(name).await? {
            return Err(Error::already_exists()
                .with_reason(format!("Index '{name}' already exists.")));
        }

        let path = collection_path(name)?;
        let body = mapping.unwrap_or_else(|| json!({}));
        let resp = self
            .send(self.request(Method::PUT, &path).json(&body))
            .await?;
        expect_json(resp).await
    }

    /// Adds or replaces a document, returning the indexing response.
    ///
    /// Without an `id` the cluster generates one; it is reported as `_id`.
    /// The collection is refreshed before returning, so the document is
    /// visible to the next query.
    pub async fn upsert_document(
        &self,
        collection: &str,
        document: Value,
        id: Option<&str>,
    ) -> Result<Value, Error> {
        if !document.is_object() {
            return Err(Error::invalid_input()
                .with_reason("The document must be a JSON object."));
        }
        let collection_path = collection_path(collection)?;
        let doc_id = match id.filter(|id| !id.is_empty()) {
            Some(id) => Some((id, path_segment("Document ID", id)?)),
            None => None,
        };
        self.ensure_collection(collection).await?;

        let req = match doc_id {
            Some((id, id_segment)) => {
                debug!("indexing document `{id}` into `{collection}`");
                let path =
                    format!("{collection_path}/_doc/{id_segment}?refresh=true");
                self.request(Method::PUT, &path)
            }
            None => {
                debug!("indexing a document into `{collection}`");
                let path = format!("{collection_path}/_doc?refresh=true");
                self.request(Method::POST, &path)
            }
        };
        let resp = self.send(req.json(&document)).await?;
        expect_json(resp).await
    }

    /// Runs a query written in the cluster's query DSL.
    pub async fn query(
        &self,
        collection: &str,
        query: Value,
    ) -> Result<QueryResults, Error> {
        self.ensure_collection(collection).await?;

        let path = format!("{}/_search", collection_path(collection)?);
        trace!("querying `{collection}` with {query}");
        let resp = self
            .send(self.request(Method::POST, &path).json(&query))
            .await?;
        let body = expect_json(resp).await?;
        QueryResults::from_response(body).map_err(|err| {
            Error::transport()
                .with_reason(format!("Malformed search response: {err}"))
        })
    }

    /// Runs a fuzzy match of `text` over every field.
    #[inline]
    pub async fn simple_text_query(
        &self,
        collection: &str,
        text: &str,
    ) -> Result<QueryResults, Error> {
        self.query(collection, text_query(text)).await
    }

    /// Deletes a document, refreshing the collection before returning.
    pub async fn delete_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Value, Error> {
        let path = format!(
            "{}/_doc/{}",
            collection_path(collection)?,
            path_segment("Document ID", id)?
        );
        self.ensure_collection(collection).await?;

        let resp = self.send(self.request(Method::HEAD, &path)).await?;
        if !expect_presence(resp.status())? {
            return Err(Error::not_found().with_reason(format!(
                "Document with ID '{id}' does not exist in index '{collection}'."
            )));
        }

        debug!("deleting document `{id}` from `{collection}`");
        let path = format!("{path}?refresh=true");
        let resp = self.send(self.request(Method::DELETE, &path)).await?;
        expect_json(resp).await
    }

    async fn ensure_collection(&self, name: &str) -> Result<(), Error> {
        if self.collection_exists(name).await? {
            Ok(())
        } else {
            Err(Error::not_found()
                .with_reason(format!("Index '{name}' does not exist.")))
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.credentials {
            Some((username, password)) => req.basic_auth(username, Some(password)),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        req.send().await.map_err(transport_error)
    }
}

fn collection_path(name: &str) -> Result<String, Error> {
    Ok(format!("/{}", path_segment("Index name", name)?))
}

// The URL parser collapses `.` and `..` segments, so they would address a
// different resource than the one named.
fn path_segment(what: &str, value: &str) -> Result<String, Error> {
    match value {
        "" => Err(Error::invalid_input().with_reason(format!("{what} is empty."))),
        "." | ".." => Err(Error::invalid_input()
            .with_reason(format!("{what} cannot be `{value}`."))),
        _ => Ok(urlencoding::encode(value).into_owned()),
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    Error::transport().with_reason(format!("{err}"))
}

fn expect_presence(status: StatusCode) -> Result<bool, Error> {
    match status {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        status => Err(Error::transport()
            .with_reason(format!("Unexpected status: {status}"))),
    }
}

async fn expect_json(resp: Response) -> Result<Value, Error> {
    let status = resp.status();
    if status.is_success() {
        return resp.json().await.map_err(transport_error);
    }

    let body = resp.text().await.unwrap_or_default();
    let err = match status {
        StatusCode::NOT_FOUND => Error::not_found(),
        StatusCode::BAD_REQUEST
            if body.contains("resource_already_exists_exception") =>
        {
            Error::already_exists()
        }
        _ => Error::transport(),
    };
    Err(err.with_reason(format!("{status}: {body}")))
}

#[cfg(test)]
mod tests {
    use agentry_core::tool::ErrorKind;

    use super::*;

    #[test]
    fn test_collection_path() {
        assert_eq!(collection_path("books").unwrap(), "/books");
        assert_eq!(collection_path("a b/c").unwrap(), "/a%20b%2Fc");
        for name in ["", ".", ".."] {
            assert_eq!(
                collection_path(name).unwrap_err().kind(),
                ErrorKind::InvalidInput
            );
        }
        assert_eq!(collection_path("...").unwrap(), "/...");
        assert_eq!(path_segment("Document ID", "a.b").unwrap(), "a.b");
    }

    #[test]
    fn test_expect_presence() {
        assert_eq!(expect_presence(StatusCode::OK), Ok(true));
        assert_eq!(expect_presence(StatusCode::NOT_FOUND), Ok(false));
        assert_eq!(
            expect_presence(StatusCode::UNAUTHORIZED).unwrap_err().kind(),
            ErrorKind::Transport
        );
    }

    #[tokio::test]
    async fn test_unreachable_cluster() {
        let config = SearchConfig::new("127.0.0.1").with_port(1).with_ssl(false);
        let client = SearchClient::connect(&config).unwrap();

        let err = client.query("books", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
