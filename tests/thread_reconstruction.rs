use serde_json::{Value, json};
use slack_qa::threading::{
    build_threads, load_all_messages, thread_summary_line, thread_to_llm_text, threads_from_path,
    write_threads,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_day(root: &Path, channel: &str, day: &str, records: Value) {
    let dir = root.join(channel);
    fs::create_dir_all(&dir).expect("failed to create channel dir");
    fs::write(dir.join(format!("{day}.json")), records.to_string())
        .expect("failed to write day file");
}

/// Two channels; one thread spans two days, one thread's root is outside
/// the slice, plus noise the loader must drop.
fn export_tree() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    let root = dir.path();

    write_day(
        root,
        "general",
        "2024-03-01",
        json!([
            {"type": "message", "ts": "100.000100", "user": "U1",
             "text": "How do I install the CLI?", "reply_count": 2,
             "replies": [{"user": "U2", "ts": "100.000200"}]},
            {"type": "message", "ts": "100.000200", "user": "U2", "text": "pip install it",
             "thread_ts": "100.000100"},
            {"type": "message", "ts": "150.000000", "user": "U3", "text": "unrelated chatter"},
            {"type": "channel_join", "subtype": "channel_join", "ts": "160.0", "text": ""},
            {"type": "message", "user": "U3", "text": "no timestamp"},
            "not an object"
        ]),
    );
    write_day(
        root,
        "general",
        "2024-03-02",
        json!([
            {"type": "message", "ts": "200.000300", "user": "U1", "text": "that worked, thanks",
             "thread_ts": "100.000100"},
            {"type": "message", "ts": "210.000000", "bot_id": "B1",
             "text": "reply to an old thread", "thread_ts": "50.000000"}
        ]),
    );
    write_day(
        root,
        "announcements",
        "2024-03-01",
        json!([
            {"type": "message", "ts": "120.000000", "username": "bot", "text": "Deadline moved",
             "reply_count": 1},
            {"type": "message", "ts": "121.000000", "user": "U4", "text": "noted",
             "thread_ts": "120.000000"}
        ]),
    );

    fs::write(root.join("general").join("broken.json"), "{not json")
        .expect("failed to write broken file");
    fs::write(root.join("users.json"), "[]").expect("failed to write top-level file");

    dir
}

#[test]
fn rebuilds_threads_across_days_and_channels() {
    let export = export_tree();
    let messages = load_all_messages(export.path()).expect("export should load");

    // 2 announcements + 3 on day one + 2 on day two; noise is dropped
    assert_eq!(messages.len(), 7);

    let threads = build_threads(messages);
    let keys: Vec<(&str, &str)> = threads
        .iter()
        .map(|thread| (thread.channel.as_str(), thread.thread_ts.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("announcements", "120.000000"),
            ("general", "100.000100"),
            ("general", "50.000000"),
        ]
    );

    // the rootless thread sorts by its first reply (210.0)
    let spanning = &threads[1];
    let root = spanning.root.as_ref().expect("root is in the slice");
    assert_eq!(root.user.as_deref(), Some("U1"));
    let reply_ts: Vec<&str> = spanning.replies.iter().map(|reply| reply.ts.as_str()).collect();
    assert_eq!(reply_ts, vec!["100.000200", "200.000300"]);

    let orphaned = &threads[2];
    assert!(orphaned.root.is_none());
    assert_eq!(orphaned.replies.len(), 1);
    assert_eq!(orphaned.replies[0].user.as_deref(), Some("B1"));

    let announcement = &threads[0];
    assert_eq!(
        announcement.root.as_ref().and_then(|root| root.user.as_deref()),
        Some("bot")
    );
}

#[test]
fn renders_transcripts_and_summaries() {
    let export = export_tree();
    let threads = build_threads(load_all_messages(export.path()).expect("export should load"));

    let transcript = thread_to_llm_text(&threads[1]);
    assert!(transcript.starts_with("Channel: #general\nThread: 100.000100\n---"));
    assert!(transcript.contains("[ROOT] U1 @ 100.000100:\nHow do I install the CLI?"));
    assert!(transcript.contains("[REPLY] U1 @ 200.000300:\nthat worked, thanks"));

    let missing = thread_to_llm_text(&threads[2]);
    assert!(missing.contains("[ROOT] (missing in this export slice)"));

    assert_eq!(
        thread_summary_line(&threads[2]),
        "#general thread 50.000000 | root (missing) @ 50.000000 | replies: 1"
    );
}

#[test]
fn dumped_threads_reload_identically() {
    let export = export_tree();
    let threads = build_threads(load_all_messages(export.path()).expect("export should load"));

    let out = TempDir::new().expect("failed to create temp dir");
    let dump = out.path().join("threads.json");
    let written = write_threads(&dump, &threads).expect("dump should be written");
    assert_eq!(written, threads.len());

    let reloaded = threads_from_path(&dump).expect("dump should reload");
    assert_eq!(reloaded.len(), threads.len());
    for (before, after) in threads.iter().zip(&reloaded) {
        assert_eq!(thread_to_llm_text(before), thread_to_llm_text(after));
    }

    let redumped = out.path().join("threads-again.json");
    write_threads(&redumped, &reloaded).expect("second dump should be written");
    assert_eq!(
        fs::read_to_string(&dump).unwrap(),
        fs::read_to_string(&redumped).unwrap()
    );
}

#[test]
fn missing_export_root_is_an_error() {
    let dir = TempDir::new().expect("failed to create temp dir");
    assert!(load_all_messages(&dir.path().join("nope")).is_err());
}
