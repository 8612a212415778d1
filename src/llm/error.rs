use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while calling the chat completion service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM service returned status {status}: {body}")]
    Service { status: StatusCode, body: String },
    #[error("failed to decode LLM response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("LLM returned no content")]
    EmptyCompletion,
}
