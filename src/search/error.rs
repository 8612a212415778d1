use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that occur while interacting with the vector store.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("qdrant HTTP error: {0}")]
    QdrantHttp(#[from] reqwest::Error),
    #[error("qdrant returned status {status}: {body}")]
    QdrantStatus { status: StatusCode, body: String },
    #[error("failed to decode qdrant response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("embedding dimensionality is required for {0} collections")]
    MissingDimension(super::SearchMode),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SearchError {
    pub fn qdrant_status(status: StatusCode, body: String) -> Self {
        SearchError::QdrantStatus { status, body }
    }
}
