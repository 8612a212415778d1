//! Slack export loading.
//!
//! A standard Slack export is a directory with one subdirectory per channel,
//! each holding one JSON array per day (`2024-05-01.json`, ...). Threads may
//! span several day files, so everything is loaded eagerly and grouped later
//! by [`super::builder::build_threads`].
//!
//! # Record filtering
//!
//! - Records without a `ts` are skipped.
//! - Non-`message` records that carry a `subtype` but no text (joins,
//!   channel topic changes, ...) are skipped. Subtype records that still
//!   carry text are kept.
//!
//! # Error Handling
//!
//! Day files that cannot be read or parsed are logged and contribute zero
//! messages; only an unusable export root aborts the load.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value;

use super::error::LoadError;
use super::message::{Message, is_truthy};

/// Load every message from every channel directory under `export_root`.
///
/// Channels and day files are visited in sorted path order. The result is
/// not deduplicated.
pub fn load_all_messages(export_root: &Path) -> Result<Vec<Message>, LoadError> {
    if !export_root.is_dir() {
        return Err(LoadError::NotADirectory(export_root.to_path_buf()));
    }

    let mut channel_dirs = list_dir(export_root)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    channel_dirs.sort();

    let mut messages = Vec::new();
    for channel_dir in channel_dirs {
        let Some(channel) = channel_dir.file_name().and_then(|name| name.to_str()) else {
            warn!(
                "skipping channel directory with non UTF-8 name: {}",
                channel_dir.display()
            );
            continue;
        };

        let day_files = match list_dir(&channel_dir) {
            Ok(paths) => paths,
            Err(err) => {
                warn!("{}", err);
                continue;
            }
        };

        let mut day_files = day_files
            .into_iter()
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect::<Vec<_>>();
        day_files.sort();

        let before = messages.len();
        for day_file in &day_files {
            messages.extend(read_channel_day_file(day_file, channel));
        }
        debug!(
            "loaded {} messages from #{} ({} day files)",
            messages.len() - before,
            channel,
            day_files.len()
        );
    }

    info!("loaded {} messages from {}", messages.len(), export_root.display());
    Ok(messages)
}

/// Parse one per-day export file into messages for `channel`.
///
/// Never fails: unreadable files, invalid UTF-8 and invalid JSON are logged
/// as warnings and yield an empty vector.
pub fn read_channel_day_file(path: &Path, channel: &str) -> Vec<Message> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!("failed to read {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    let records: Vec<Value> = match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!("failed to read {}: top-level JSON is not an array", path.display());
            return Vec::new();
        }
        Err(err) => {
            warn!("failed to read {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| parse_record(record, channel))
        .collect()
}

/// Convert one raw export record into a [`Message`], or `None` if the record
/// should be dropped.
fn parse_record(record: Value, channel: &str) -> Option<Message> {
    if !record.is_object() {
        return None;
    }

    let is_message = record.get("type").and_then(Value::as_str) == Some("message");
    if !is_message && truthy_field(&record, "subtype") && !truthy_field(&record, "text") {
        return None;
    }

    let ts = string_field(&record, "ts")?;

    Some(Message {
        channel: channel.to_string(),
        ts,
        text: string_field(&record, "text").unwrap_or_default(),
        user: string_field(&record, "user")
            .or_else(|| string_field(&record, "bot_id"))
            .or_else(|| string_field(&record, "username")),
        thread_ts: raw_string_field(&record, "thread_ts"),
        subtype: string_field(&record, "subtype"),
        raw: record,
    })
}

fn truthy_field(record: &Value, key: &str) -> bool {
    record.get(key).is_some_and(is_truthy)
}

/// Non-empty string value of `key`. Numeric timestamps are accepted and
/// rendered back to text.
fn string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(value) if !value.is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

/// String value of `key` as exported, empty strings included.
fn raw_string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn list_dir(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = fs::read_dir(path).map_err(|source| LoadError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(err) => warn!("failed to read entry in {}: {}", path.display(), err),
        }
    }
    Ok(paths)
}
