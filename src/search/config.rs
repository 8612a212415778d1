use super::SearchMode;
use crate::config::{env_duration_millis, env_optional, env_string, env_usize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DENSE_MODEL: &str = "jinaai/jina-embeddings-v2-base-en";
pub const DEFAULT_SPARSE_MODEL: &str = "Qdrant/bm25";
pub const DEFAULT_EMBED_DIM: usize = 768;
pub const DEFAULT_CHANNEL: &str = "#course-llm-zoomcamp";

/// Connection and collection settings for the Qdrant vector store.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub qdrant_url: String,
    pub api_key: Option<String>,
    /// Collections are named `<prefix>_<mode>`
    pub collection_prefix: String,
    pub dense_model: String,
    pub sparse_model: String,
    pub embedding_dim: usize,
    pub batch_size: usize,
    pub default_mode: SearchMode,
    pub default_channel: Option<String>,
    pub request_timeout: Duration,
}

impl SearchConfig {
    pub fn from_env() -> Self {
        let default_mode = env::var("SEARCH_DEFAULT_MODE")
            .ok()
            .and_then(|value| SearchMode::from_str(&value).ok())
            .unwrap_or_default();

        Self {
            qdrant_url: env_string("QDRANT_URL", "http://localhost:6333"),
            api_key: env_optional("QDRANT_API_KEY"),
            collection_prefix: env_string("QDRANT_COLLECTION_PREFIX", "slack_qa"),
            dense_model: env_string("EMBEDDINGS_MODEL_ID", DEFAULT_DENSE_MODEL),
            sparse_model: env_string("SPARSE_MODEL_ID", DEFAULT_SPARSE_MODEL),
            embedding_dim: env_usize("EMBEDDINGS_DIM", DEFAULT_EMBED_DIM),
            batch_size: env_usize("INDEX_BATCH_SIZE", 256).max(1),
            default_mode,
            default_channel: Some(env_string("SEARCH_DEFAULT_CHANNEL", DEFAULT_CHANNEL))
                .filter(|channel| !channel.trim().is_empty()),
            request_timeout: env_duration_millis("QDRANT_TIMEOUT_MS", 30_000),
        }
    }

    /// Collection holding points built for `mode`.
    pub fn collection_for(&self, mode: SearchMode) -> String {
        format!("{}_{}", self.collection_prefix, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_follow_mode() {
        let config = SearchConfig {
            collection_prefix: "slack".to_string(),
            ..SearchConfig::from_env()
        };
        assert_eq!(config.collection_for(SearchMode::Dense), "slack_dense");
        assert_eq!(config.collection_for(SearchMode::Hybrid), "slack_hybrid");
    }
}
