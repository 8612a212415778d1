//! Slack thread reconstruction
//!
//! This module rebuilds conversational threads from a Slack standard export
//! (one directory per channel, one JSON array per day). Threads may span
//! several day files and their root may be missing from the export slice.
//!
//! ## Threading Strategy
//!
//! Slack marks replies with `thread_ts` (the root's timestamp) and roots with
//! `replies` / `reply_count`. Messages are grouped per channel by that key:
//!
//! 1. **Explicit key**: `thread_ts` when present
//! 2. **Self-root key**: the message's own `ts` when it carries reply markers
//! 3. **Orphans**: everything else is ignored
//!
//! ## Module Structure
//!
//! - `message`: Message and thread data structures
//! - `loader`: Export directory walking and record filtering
//! - `builder`: Grouping, root resolution and ordering
//! - `serialize`: Dumped-thread JSON format
//! - `render`: Transcript and summary rendering

pub mod builder;
pub mod error;
pub mod loader;
pub mod message;
pub mod render;
pub mod serialize;

// Re-export main types and functions
pub use builder::{ThreadKey, build_threads};
pub use error::{LoadError, SerializeError};
pub use loader::{load_all_messages, read_channel_day_file};
pub use message::{Message, Thread};
pub use render::{thread_summary_line, thread_to_llm_text};
pub use serialize::{
    MessageDocument, ThreadDocument, threads_from_json, threads_from_path, threads_to_json,
    write_threads,
};
