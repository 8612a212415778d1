use clap::Parser;
use log::info;
use slack_qa::extract::{LlmExtractor, extract_threads, write_jsonl, write_qa_json};
use slack_qa::llm::{ChatClient, LlmConfig};
use slack_qa::threading::{
    Thread, build_threads, load_all_messages, thread_summary_line, threads_from_path,
    write_threads,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "slack-threads",
    about = "Rebuild Slack threads from an export and optionally extract Q&A pairs"
)]
struct Args {
    /// Slack export root directory, or a thread dump with `--from-json`.
    source: PathBuf,

    /// Print one summary line per thread.
    #[arg(long)]
    list: bool,

    /// Write the reconstructed threads as a JSON array.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run Q&A extraction over every thread.
    #[arg(long)]
    extract: bool,

    /// Write extraction results that contain Q&A pairs as a JSON array.
    #[arg(long)]
    qa_out: Option<PathBuf>,

    /// Write every extraction result as JSON lines.
    #[arg(long)]
    jsonl: Option<PathBuf>,

    /// Chat model used with `--extract` (defaults to `LLM_MODEL`).
    #[arg(long)]
    model: Option<String>,

    /// Read threads from a previous `--out` dump instead of an export tree.
    #[arg(long)]
    from_json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    slack_qa::init_logger();
    let args = Args::parse();

    let valid_source = if args.from_json {
        args.source.is_file()
    } else {
        args.source.is_dir()
    };
    if !valid_source {
        let expected = if args.from_json { "file" } else { "directory" };
        writeln!(
            io::stderr(),
            "error: {} is not a {expected}",
            args.source.display()
        )?;
        std::process::exit(2);
    }

    let (message_count, threads) = load_threads(&args)?;

    if args.list {
        let mut stdout = io::stdout().lock();
        for thread in &threads {
            writeln!(stdout, "{}", thread_summary_line(thread))?;
        }
    }

    if let Some(path) = &args.out {
        let written = write_threads(path, &threads)?;
        info!("wrote {} threads to {}", written, path.display());
    }

    if args.extract {
        let config = LlmConfig::from_env();
        let model = args.model.clone().unwrap_or_else(|| config.model.clone());
        let temperature = config.temperature;
        let extractor = LlmExtractor::new(ChatClient::new(config)?, temperature);

        let report = extract_threads(&extractor, &threads, &model).await;

        if let Some(path) = &args.jsonl {
            let written = write_jsonl(path, &report.results)?;
            println!("Wrote {written} extraction results to {}", path.display());
        }
        if let Some(path) = &args.qa_out {
            let written = write_qa_json(path, &report.results)?;
            println!("Wrote {written} threads with Q&A pairs to {}", path.display());
        }
        if args.jsonl.is_none() && args.qa_out.is_none() {
            let mut stdout = io::stdout().lock();
            for result in &report.results {
                writeln!(stdout, "{}", serde_json::to_string(result)?)?;
            }
        }
    }

    if !(args.list || args.out.is_some() || args.extract) {
        if let Some(count) = message_count {
            println!("Loaded messages: {count}");
        }
        println!("Reconstructed threads: {}", threads.len());
        println!("Use --list, --out, or --extract for actions.");
    }

    Ok(())
}

/// Threads from the source, plus the raw message count when read from an
/// export tree.
fn load_threads(args: &Args) -> Result<(Option<usize>, Vec<Thread>), Box<dyn std::error::Error>> {
    if args.from_json {
        let threads = threads_from_path(&args.source)?;
        info!("loaded {} threads from {}", threads.len(), args.source.display());
        return Ok((None, threads));
    }

    let messages = load_all_messages(&args.source)?;
    let count = messages.len();
    let threads = build_threads(messages);
    info!("reconstructed {} threads from {} messages", threads.len(), count);
    Ok((Some(count), threads))
}
