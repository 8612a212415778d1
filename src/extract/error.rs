use crate::llm::LlmError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting Q&A pairs or writing extraction output.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model output was not valid JSON: {error}\noutput:\n{content}")]
    InvalidJson { error: String, content: String },
    #[error("model output JSON missing expected 'qas' list\noutput:\n{content}")]
    MissingQas { content: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode extraction results: {0}")]
    Encode(#[from] serde_json::Error),
}
