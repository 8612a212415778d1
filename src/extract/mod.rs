//! LLM-driven extraction of confirmed Q&A pairs from reconstructed threads.
//!
//! Each thread is rendered with [`crate::threading::thread_to_llm_text`] and
//! sent to the extractor on its own. Failed threads are skipped so one bad
//! model response never aborts a run.

pub mod error;
pub mod extractor;
pub mod models;
pub mod pipeline;

pub use error::ExtractError;
pub use extractor::{LlmExtractor, QaExtractor, SYSTEM_PROMPT, parse_extraction};
pub use models::{ExtractionResult, QaPair};
pub use pipeline::{ExtractionReport, extract_threads, write_jsonl, write_qa_json};
