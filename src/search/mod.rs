//! Vector search over extracted Q&A pairs: Qdrant client, configuration,
//! indexing and retrieval.

pub mod client;
pub mod config;
pub mod error;
pub mod indexer;
pub mod models;
pub mod service;
pub mod types;

pub use client::QdrantClient;
pub use config::SearchConfig;
pub use error::SearchError;
pub use indexer::{
    IndexOptions, IndexReport, index_records, iter_records, load_qa_threads, point_id,
};
pub use models::{QaRecord, ScoredPoint};
pub use service::{QaSearch, Retriever, build_query};
pub use types::SearchMode;
