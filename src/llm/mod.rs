//! Chat completion client used for Q&A extraction, answer generation and
//! relevancy grading.

pub mod client;
pub mod config;
pub mod error;

pub use client::{ChatClient, ChatMessage, ChatModel, Completion};
pub use config::{DEFAULT_MODEL, LlmConfig};
pub use error::LlmError;
