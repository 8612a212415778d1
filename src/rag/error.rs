use crate::llm::LlmError;
use crate::search::SearchError;
use thiserror::Error;

/// Errors raised while answering a question from the Q&A index.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("retrieval failed: {0}")]
    Search(#[from] SearchError),
    #[error("answer generation failed: {0}")]
    Llm(#[from] LlmError),
}
