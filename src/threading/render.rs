//! Plain-text rendering of threads.

use super::message::{Message, Thread};

const UNKNOWN_USER: &str = "unknown";

/// Render a thread as the transcript handed to the Q&A extractor.
///
/// Layout: a channel/thread header, a `---` separator, the root block (or a
/// missing-root marker), then one block per reply in stored order.
pub fn thread_to_llm_text(thread: &Thread) -> String {
    let mut lines = Vec::with_capacity(thread.replies.len() + 3);
    lines.push(format!(
        "Channel: #{}\nThread: {}",
        thread.channel, thread.thread_ts
    ));
    lines.push("---".to_string());

    match &thread.root {
        Some(root) => lines.push(message_block("ROOT", root)),
        None => lines.push("[ROOT] (missing in this export slice)\n".to_string()),
    }

    for reply in &thread.replies {
        lines.push(message_block("REPLY", reply));
    }

    lines.join("\n")
}

fn message_block(label: &str, message: &Message) -> String {
    format!(
        "[{label}] {} @ {}:\n{}\n",
        message.user.as_deref().unwrap_or(UNKNOWN_USER),
        message.ts,
        message.text
    )
}

/// One-line summary used by `slack-threads --list`.
pub fn thread_summary_line(thread: &Thread) -> String {
    let (root_user, root_ts) = match &thread.root {
        Some(root) => (
            root.user.as_deref().unwrap_or(UNKNOWN_USER),
            root.ts.as_str(),
        ),
        None => ("(missing)", thread.thread_ts.as_str()),
    };

    format!(
        "#{} thread {} | root {} @ {} | replies: {}",
        thread.channel,
        thread.thread_ts,
        root_user,
        root_ts,
        thread.replies.len()
    )
}
