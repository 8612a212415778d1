//! Dumped-thread JSON format.
//!
//! Threads are persisted as an array of
//! `{channel, thread_ts, root: {ts, text, user, thread_ts, subtype} | null, replies: [...]}`.
//! An empty `root` object reads back as a missing root.
//! Reading a dump back rebuilds [`Message`]s whose `raw` is the minimal
//! message object; the original export record is not recoverable.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use super::error::SerializeError;
use super::message::{Message, Thread};

/// Minimal message shape stored in thread dumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDocument {
    pub ts: String,
    pub text: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

/// One thread as stored in a dump file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadDocument {
    pub channel: String,
    pub thread_ts: String,
    #[serde(default, deserialize_with = "deserialize_root")]
    pub root: Option<MessageDocument>,
    #[serde(default)]
    pub replies: Vec<MessageDocument>,
}

/// `null` and `{}` both mean the root is missing from the export slice.
fn deserialize_root<'de, D>(deserializer: D) -> Result<Option<MessageDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl From<&Message> for MessageDocument {
    fn from(message: &Message) -> Self {
        MessageDocument {
            ts: message.ts.clone(),
            text: message.text.clone(),
            user: message.user.clone(),
            thread_ts: message.thread_ts.clone(),
            subtype: message.subtype.clone(),
        }
    }
}

impl MessageDocument {
    fn into_message(self, channel: &str) -> Message {
        let raw = json!({
            "ts": self.ts,
            "text": self.text,
            "user": self.user,
            "thread_ts": self.thread_ts,
            "subtype": self.subtype,
        });

        Message {
            channel: channel.to_string(),
            ts: self.ts,
            text: self.text,
            user: self.user,
            thread_ts: self.thread_ts,
            subtype: self.subtype,
            raw,
        }
    }
}

impl From<&Thread> for ThreadDocument {
    fn from(thread: &Thread) -> Self {
        ThreadDocument {
            channel: thread.channel.clone(),
            thread_ts: thread.thread_ts.clone(),
            root: thread.root.as_ref().map(MessageDocument::from),
            replies: thread.replies.iter().map(MessageDocument::from).collect(),
        }
    }
}

impl From<ThreadDocument> for Thread {
    fn from(document: ThreadDocument) -> Self {
        let channel = document.channel;
        let root = document.root.map(|root| root.into_message(&channel));
        let replies = document
            .replies
            .into_iter()
            .map(|reply| reply.into_message(&channel))
            .collect();

        Thread {
            channel,
            thread_ts: document.thread_ts,
            root,
            replies,
        }
    }
}

/// Convert threads into their dump representation.
pub fn threads_to_documents(threads: &[Thread]) -> Vec<ThreadDocument> {
    threads.iter().map(ThreadDocument::from).collect()
}

/// Serialize threads as a two-space indented JSON array.
pub fn threads_to_json(threads: &[Thread]) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(&threads_to_documents(threads))?)
}

/// Parse a thread dump. Malformed input is an error; nothing is recovered
/// from a partially valid document.
pub fn threads_from_json(contents: &str) -> Result<Vec<Thread>, SerializeError> {
    let documents: Vec<ThreadDocument> = serde_json::from_str(contents)?;
    Ok(documents.into_iter().map(Thread::from).collect())
}

pub fn threads_from_path(path: &Path) -> Result<Vec<Thread>, SerializeError> {
    let contents = fs::read_to_string(path).map_err(|source| SerializeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    threads_from_json(&contents)
}

/// Write threads to `path` as pretty JSON, returning the number written.
pub fn write_threads(path: &Path, threads: &[Thread]) -> Result<usize, SerializeError> {
    let write_err = |source| SerializeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &threads_to_documents(threads))?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    Ok(threads.len())
}
