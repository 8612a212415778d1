use super::SearchMode;
use super::config::SearchConfig;
use super::error::SearchError;
use super::models::{ScoredPoint, deserialize_point_id};
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::time::Duration;

pub const DENSE_VECTOR: &str = "dense";
pub const SPARSE_VECTOR: &str = "sparse";

const SCROLL_PAGE_SIZE: usize = 10_000;

/// Thin REST client for the subset of the Qdrant API used here.
#[derive(Clone)]
pub struct QdrantClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("slack-qa/0.1")
            .build()
            .map_err(SearchError::QdrantHttp)?;

        Ok(Self {
            http,
            base_url: config.qdrant_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url_for(path));
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    async fn send_json<T, R>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<R, SearchError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .request(method, path)
            .json(payload)
            .send()
            .await
            .map_err(SearchError::QdrantHttp)?;
        Self::decode(response).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<R, SearchError> {
        let response = self
            .request(method, path)
            .send()
            .await
            .map_err(SearchError::QdrantHttp)?;
        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, SearchError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(SearchError::qdrant_status(status, body));
        }

        let body = response.bytes().await.map_err(SearchError::QdrantHttp)?;
        let envelope: Envelope<R> = serde_json::from_slice(&body)?;
        Ok(envelope.result)
    }

    pub async fn collection_exists(&self, collection: &str) -> Result<bool, SearchError> {
        #[derive(serde::Deserialize)]
        struct Exists {
            exists: bool,
        }

        let result: Exists = self
            .send(Method::GET, &format!("/collections/{collection}/exists"))
            .await?;
        Ok(result.exists)
    }

    pub async fn create_collection(
        &self,
        collection: &str,
        mode: SearchMode,
        embedding_dim: Option<usize>,
    ) -> Result<(), SearchError> {
        let body = collection_config(mode, embedding_dim)?;
        let _: Value = self
            .send_json(Method::PUT, &format!("/collections/{collection}"), &body)
            .await?;
        Ok(())
    }

    pub async fn create_payload_index(
        &self,
        collection: &str,
        field_name: &str,
        field_schema: &str,
    ) -> Result<(), SearchError> {
        let body = json!({ "field_name": field_name, "field_schema": field_schema });
        let _: Value = self
            .send_json(
                Method::PUT,
                &format!("/collections/{collection}/index?wait=true"),
                &body,
            )
            .await?;
        Ok(())
    }

    /// Collect every point id in `collection`, page by page.
    pub async fn scroll_ids(&self, collection: &str) -> Result<HashSet<String>, SearchError> {
        let mut ids = HashSet::new();
        let mut offset: Option<Value> = None;

        loop {
            let body = json!({
                "limit": SCROLL_PAGE_SIZE,
                "with_payload": false,
                "with_vector": false,
                "offset": offset,
            });
            let page: ScrollPage = self
                .send_json(
                    Method::POST,
                    &format!("/collections/{collection}/points/scroll"),
                    &body,
                )
                .await?;

            debug!("scroll: {} ids from {}", page.points.len(), collection);
            let exhausted = page.points.is_empty();
            ids.extend(page.points.into_iter().map(|point| point.id));

            match page.next_page_offset {
                Some(next) if !next.is_null() && !exhausted => offset = Some(next),
                _ => break,
            }
        }

        Ok(ids)
    }

    pub async fn upsert_points(
        &self,
        collection: &str,
        points: &[PointStruct],
    ) -> Result<(), SearchError> {
        if points.is_empty() {
            return Ok(());
        }

        let body = json!({ "points": points });
        let _: Value = self
            .send_json(
                Method::PUT,
                &format!("/collections/{collection}/points?wait=true"),
                &body,
            )
            .await?;
        Ok(())
    }

    /// Run a universal query (`/points/query`) and return its hits.
    pub async fn query_points(
        &self,
        collection: &str,
        body: &Value,
    ) -> Result<Vec<ScoredPoint>, SearchError> {
        let result: QueryResult = self
            .send_json(
                Method::POST,
                &format!("/collections/{collection}/points/query"),
                body,
            )
            .await?;
        Ok(result.points)
    }
}

/// A point to upsert. Vectors are inference documents (`{text, model}`)
/// embedded server-side.
#[derive(Debug, Clone, Serialize)]
pub struct PointStruct {
    pub id: String,
    pub vector: serde_json::Map<String, Value>,
    pub payload: Value,
}

/// Inference document for server-side embedding.
pub fn document(text: &str, model: &str) -> Value {
    json!({ "text": text, "model": model })
}

/// Collection creation body for `mode`.
pub fn collection_config(
    mode: SearchMode,
    embedding_dim: Option<usize>,
) -> Result<Value, SearchError> {
    let mut body = serde_json::Map::new();

    if mode.uses_dense() {
        let size = embedding_dim
            .filter(|dim| *dim > 0)
            .ok_or(SearchError::MissingDimension(mode))?;
        body.insert(
            "vectors".to_string(),
            json!({ DENSE_VECTOR: { "size": size, "distance": "Cosine" } }),
        );
    }

    if mode.uses_sparse() {
        body.insert(
            "sparse_vectors".to_string(),
            json!({ SPARSE_VECTOR: { "modifier": "idf" } }),
        );
    }

    Ok(Value::Object(body))
}

#[derive(serde::Deserialize)]
struct Envelope<R> {
    result: R,
}

#[derive(serde::Deserialize)]
struct ScrollPage {
    #[serde(default)]
    points: Vec<PointId>,
    #[serde(default)]
    next_page_offset: Option<Value>,
}

#[derive(serde::Deserialize)]
struct PointId {
    #[serde(deserialize_with = "deserialize_point_id")]
    id: String,
}

#[derive(serde::Deserialize)]
struct QueryResult {
    #[serde(default)]
    points: Vec<ScoredPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_collection_requires_dimension() {
        assert!(matches!(
            collection_config(SearchMode::Dense, None),
            Err(SearchError::MissingDimension(SearchMode::Dense))
        ));
        assert!(matches!(
            collection_config(SearchMode::Hybrid, Some(0)),
            Err(SearchError::MissingDimension(SearchMode::Hybrid))
        ));
    }

    #[test]
    fn collection_config_per_mode() {
        let dense = collection_config(SearchMode::Dense, Some(768)).unwrap();
        assert_eq!(dense["vectors"]["dense"]["size"], 768);
        assert_eq!(dense["vectors"]["dense"]["distance"], "Cosine");
        assert!(dense.get("sparse_vectors").is_none());

        let sparse = collection_config(SearchMode::Sparse, None).unwrap();
        assert!(sparse.get("vectors").is_none());
        assert_eq!(sparse["sparse_vectors"]["sparse"]["modifier"], "idf");

        let hybrid = collection_config(SearchMode::Hybrid, Some(384)).unwrap();
        assert_eq!(hybrid["vectors"]["dense"]["size"], 384);
        assert_eq!(hybrid["sparse_vectors"]["sparse"]["modifier"], "idf");
    }

    #[test]
    fn decodes_scroll_and_query_envelopes() {
        let scroll: Envelope<ScrollPage> = serde_json::from_str(
            r#"{"result": {"points": [{"id": "a"}, {"id": 3}], "next_page_offset": null},
                "status": "ok", "time": 0.001}"#,
        )
        .unwrap();
        let ids: Vec<String> = scroll.result.points.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "3".to_string()]);
        assert_eq!(scroll.result.next_page_offset, None);

        let query: Envelope<QueryResult> = serde_json::from_str(
            r#"{"result": {"points": [{"id": "x", "score": 0.9, "payload": {"question": "q"}}]}}"#,
        )
        .unwrap();
        assert_eq!(query.result.points[0].id, "x");
        assert_eq!(query.result.points[0].payload.question, "q");
    }
}
