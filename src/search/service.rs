use super::SearchMode;
use super::client::{DENSE_VECTOR, QdrantClient, SPARSE_VECTOR, document};
use super::config::SearchConfig;
use super::error::SearchError;
use super::models::ScoredPoint;
use log::debug;
use serde_json::{Value, json};
use std::future::Future;

/// Multiplier applied to `limit` for each hybrid prefetch branch.
const HYBRID_PREFETCH_FACTOR: usize = 5;

/// Similarity search over indexed Q&A records.
///
/// Used by the answer-generation loop and by the evaluation harness.
pub trait Retriever {
    fn search(
        &self,
        mode: SearchMode,
        query: &str,
        channel: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ScoredPoint>, SearchError>> + Send;
}

/// Qdrant-backed [`Retriever`]. Each mode queries its own collection.
#[derive(Clone)]
pub struct QaSearch {
    client: QdrantClient,
    config: SearchConfig,
}

impl QaSearch {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = QdrantClient::new(&config)?;
        Ok(Self { client, config })
    }
}

impl Retriever for QaSearch {
    async fn search(
        &self,
        mode: SearchMode,
        query: &str,
        channel: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, SearchError> {
        let collection = self.config.collection_for(mode);
        let body = build_query(
            mode,
            query,
            channel,
            limit,
            &self.config.dense_model,
            &self.config.sparse_model,
        );

        debug!(
            "search: {} query against '{}' (channel={:?}, limit={})",
            mode, collection, channel, limit
        );
        self.client.query_points(&collection, &body).await
    }
}

/// Build a `/points/query` request body.
///
/// Dense and sparse modes query their named vector directly. Hybrid mode
/// prefetches `5 * limit` candidates from each vector and fuses them with
/// reciprocal rank fusion.
pub fn build_query(
    mode: SearchMode,
    query: &str,
    channel: Option<&str>,
    limit: usize,
    dense_model: &str,
    sparse_model: &str,
) -> Value {
    let limit = limit.max(1);
    let mut body = match mode {
        SearchMode::Dense => json!({
            "query": document(query, dense_model),
            "using": DENSE_VECTOR,
        }),
        SearchMode::Sparse => json!({
            "query": document(query, sparse_model),
            "using": SPARSE_VECTOR,
        }),
        SearchMode::Hybrid => json!({
            "prefetch": [
                {
                    "query": document(query, dense_model),
                    "using": DENSE_VECTOR,
                    "limit": HYBRID_PREFETCH_FACTOR * limit,
                },
                {
                    "query": document(query, sparse_model),
                    "using": SPARSE_VECTOR,
                    "limit": HYBRID_PREFETCH_FACTOR * limit,
                },
            ],
            "query": { "fusion": "rrf" },
        }),
    };

    if let Value::Object(map) = &mut body {
        map.insert("limit".to_string(), json!(limit));
        map.insert("with_payload".to_string(), json!(true));
        if let Some(channel) = channel {
            map.insert("filter".to_string(), channel_filter(channel));
        }
    }

    body
}

fn channel_filter(channel: &str) -> Value {
    json!({
        "must": [
            { "key": "channel", "match": { "value": channel } }
        ]
    })
}
