//! Thread reconstruction from a flat message list
//!
//! ## Algorithm Overview
//!
//! 1. **Partition**: group messages by channel; threads never span channels
//! 2. **Find Candidate Roots**: messages whose raw record carries reply markers
//! 3. **Resolve Keys**: explicit `thread_ts`, else own `ts` for candidate
//!    roots, else orphan (dropped)
//! 4. **Bucket**: group messages by key, preserving arrival order
//! 5. **Resolve Roots**: stable-sort each bucket by timestamp and pick the
//!    member whose `ts` equals the key, falling back to the candidate root
//! 6. **Order**: sort threads by channel, then by root/first-reply timestamp

use std::collections::HashMap;

use super::message::{Message, Thread};

/// How a message attaches to a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadKey<'a> {
    /// The message declares its parent via `thread_ts`
    Explicit(&'a str),
    /// The message has no `thread_ts` but is itself a flagged thread root
    SelfRoot(&'a str),
    /// Neither reply nor root; excluded from threading
    None,
}

impl<'a> ThreadKey<'a> {
    /// Resolve the grouping key for `message`.
    ///
    /// `is_candidate_root` reports whether a timestamp belongs to a message
    /// carrying reply markers in the same channel.
    pub fn resolve(message: &'a Message, is_candidate_root: impl Fn(&str) -> bool) -> Self {
        if let Some(thread_ts) = message.thread_ts.as_deref().filter(|ts| !ts.is_empty()) {
            ThreadKey::Explicit(thread_ts)
        } else if is_candidate_root(message.ts.as_str()) {
            ThreadKey::SelfRoot(message.ts.as_str())
        } else {
            ThreadKey::None
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            ThreadKey::Explicit(key) | ThreadKey::SelfRoot(key) => Some(*key),
            ThreadKey::None => None,
        }
    }
}

/// Build threads from every loaded message.
///
/// Orphan messages (no `thread_ts`, no reply markers) are dropped. A bucket
/// whose root is not part of the input still yields a thread with
/// `root: None`.
pub fn build_threads<I>(messages: I) -> Vec<Thread>
where
    I: IntoIterator<Item = Message>,
{
    let mut channel_order: Vec<String> = Vec::new();
    let mut by_channel: HashMap<String, Vec<Message>> = HashMap::new();
    for message in messages {
        if !by_channel.contains_key(&message.channel) {
            channel_order.push(message.channel.clone());
        }
        by_channel
            .entry(message.channel.clone())
            .or_default()
            .push(message);
    }

    let mut threads = Vec::new();
    for channel in channel_order {
        if let Some(channel_messages) = by_channel.remove(&channel) {
            threads.extend(build_channel_threads(&channel, &channel_messages));
        }
    }

    threads.sort_by(|a, b| {
        a.channel
            .cmp(&b.channel)
            .then_with(|| a.sort_ts().total_cmp(&b.sort_ts()))
    });
    threads
}

/// Group one channel's messages into threads.
fn build_channel_threads(channel: &str, messages: &[Message]) -> Vec<Thread> {
    let mut candidate_roots: HashMap<&str, &Message> = HashMap::new();
    for message in messages {
        if message.has_reply_markers() {
            candidate_roots.insert(message.ts.as_str(), message);
        }
    }

    let mut key_order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, Vec<&Message>> = HashMap::new();
    for message in messages {
        let key = ThreadKey::resolve(message, |ts| candidate_roots.contains_key(ts));
        let Some(key) = key.as_str() else {
            continue;
        };
        buckets
            .entry(key)
            .or_insert_with(|| {
                key_order.push(key);
                Vec::new()
            })
            .push(message);
    }

    let mut threads = Vec::with_capacity(key_order.len());
    for key in key_order {
        let Some(mut bucket) = buckets.remove(key) else {
            continue;
        };

        // `sort_by` is stable, so equal timestamps keep arrival order.
        bucket.sort_by(|a, b| a.ts_float().total_cmp(&b.ts_float()));

        let root = bucket
            .iter()
            .find(|message| message.ts == key)
            .copied()
            .or_else(|| candidate_roots.get(key).copied());

        let replies = bucket
            .into_iter()
            .filter(|message| root.is_none_or(|root| message.ts != root.ts))
            .cloned()
            .collect();

        threads.push(Thread {
            channel: channel.to_string(),
            thread_ts: key.to_string(),
            root: root.cloned(),
            replies,
        });
    }

    threads
}
