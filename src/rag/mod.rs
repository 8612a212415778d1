//! Retrieval-augmented answering over the indexed Q&A pairs.

pub mod answer;
pub mod error;
pub mod prompt;

pub use answer::{RagAnswer, Relevancy, answer, calculate_llm_cost, compute_relevancy};
pub use error::RagError;
pub use prompt::{build_prompt, build_relevancy_prompt};
