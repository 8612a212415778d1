//! Message and thread data structures for Slack thread reconstruction
//!
//! A [`Message`] is one record from a channel's per-day export file. A
//! [`Thread`] is the result of grouping those records by thread key: an
//! optional root plus the chronologically ordered replies.

use serde_json::Value;

/// A single Slack message as loaded from an export day file.
///
/// Messages are identified by `(channel, ts)` within one export. The `ts`
/// string doubles as the sort key once parsed with [`Message::ts_float`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Channel directory the message was loaded from
    pub channel: String,

    /// Slack timestamp, e.g. `"1712345678.123456"`
    pub ts: String,

    /// Message body (empty when the record carried no text)
    pub text: String,

    /// First of user id, bot id, or username found on the record
    pub user: Option<String>,

    /// Root timestamp of the thread this message belongs to
    pub thread_ts: Option<String>,

    pub subtype: Option<String>,

    /// Original record, retained for root detection and inspection
    pub raw: Value,
}

impl Message {
    /// Numeric value of `ts`, or `0.0` when it does not parse.
    pub fn ts_float(&self) -> f64 {
        self.ts.trim().parse::<f64>().unwrap_or(0.0)
    }

    /// Whether the raw record marks this message as having replies.
    ///
    /// Slack exports flag thread roots either with a non-empty `replies`
    /// list or with a positive `reply_count`.
    pub fn has_reply_markers(&self) -> bool {
        self.raw.get("replies").is_some_and(is_truthy)
            || self.raw.get("reply_count").is_some_and(is_truthy)
    }
}

/// A reconstructed conversation thread.
///
/// The root may be absent when the export slice only contains replies. When
/// present it never appears again in `replies`.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub channel: String,

    /// Canonical thread key (the root's timestamp)
    pub thread_ts: String,

    pub root: Option<Message>,

    /// Replies in ascending timestamp order, root excluded
    pub replies: Vec<Message>,
}

impl Thread {
    /// Timestamp used to order threads within a channel: the root's, else
    /// the first reply's, else zero.
    pub fn sort_ts(&self) -> f64 {
        match (&self.root, self.replies.first()) {
            (Some(root), _) => root.ts_float(),
            (None, Some(first)) => first.ts_float(),
            (None, None) => 0.0,
        }
    }

    /// Number of messages held by this thread, root included.
    pub fn message_count(&self) -> usize {
        self.replies.len() + usize::from(self.root.is_some())
    }
}

/// JSON truthiness as used by Slack export consumers: `null`, `false`, zero,
/// empty strings, empty arrays and empty objects are all "absent".
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(ts: &str, raw: Value) -> Message {
        Message {
            channel: "general".to_string(),
            ts: ts.to_string(),
            text: String::new(),
            user: None,
            thread_ts: None,
            subtype: None,
            raw,
        }
    }

    #[test]
    fn ts_float_parses_decimal_timestamps() {
        let msg = message("1712345678.123456", json!({}));
        assert!((msg.ts_float() - 1712345678.123456).abs() < 1e-6);
    }

    #[test]
    fn ts_float_falls_back_to_zero() {
        assert_eq!(message("not-a-number", json!({})).ts_float(), 0.0);
        assert_eq!(message("", json!({})).ts_float(), 0.0);
    }

    #[test]
    fn reply_markers_require_non_empty_values() {
        assert!(message("1", json!({"reply_count": 2})).has_reply_markers());
        assert!(message("1", json!({"replies": [{"user": "U1", "ts": "2"}]})).has_reply_markers());
        assert!(!message("1", json!({"reply_count": 0})).has_reply_markers());
        assert!(!message("1", json!({"replies": []})).has_reply_markers());
        assert!(!message("1", json!({"text": "hi"})).has_reply_markers());
    }

    #[test]
    fn sort_ts_prefers_root_then_first_reply() {
        let root = message("10.0", json!({}));
        let reply = message("12.0", json!({}));

        let with_root = Thread {
            channel: "general".to_string(),
            thread_ts: "10.0".to_string(),
            root: Some(root),
            replies: vec![reply.clone()],
        };
        assert_eq!(with_root.sort_ts(), 10.0);
        assert_eq!(with_root.message_count(), 2);

        let rootless = Thread {
            root: None,
            ..with_root.clone()
        };
        assert_eq!(rootless.sort_ts(), 12.0);

        let empty = Thread {
            root: None,
            replies: Vec::new(),
            ..with_root
        };
        assert_eq!(empty.sort_ts(), 0.0);
    }
}
