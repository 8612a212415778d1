//! Slack export thread reconstruction and the Q&A pipeline built on it:
//! extraction with an LLM, indexing into Qdrant, retrieval, answering and
//! retrieval evaluation.

pub(crate) mod config;
pub mod evaluation;
pub mod extract;
pub mod llm;
pub mod rag;
pub mod search;
pub mod threading;

use env_logger::Env;
use std::sync::Once;

static LOGGER: Once = Once::new();

/// Install the process-wide logger once. `RUST_LOG` overrides the default
/// filter.
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,reqwest=warn,hyper=warn"),
        )
        .format_timestamp(None)
        .init();
    });
}
