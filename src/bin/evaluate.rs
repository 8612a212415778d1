use clap::Parser;
use slack_qa::evaluation::{DEFAULT_EVAL_LIMIT, evaluate_search, load_ground_truth};
use slack_qa::search::{QaSearch, SearchConfig, SearchMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "evaluate", about = "Score retrieval against a ground-truth question set")]
struct Args {
    /// Ground-truth JSON: point id to a list of questions.
    #[arg(long, default_value = "Data/ground_truth.json")]
    path: PathBuf,

    /// `dense`, `sparse` or `hybrid`.
    #[arg(long, default_value_t = SearchMode::Dense)]
    method: SearchMode,

    /// Restrict hits to one channel (defaults to `SEARCH_DEFAULT_CHANNEL`).
    #[arg(long)]
    channel: Option<String>,

    /// Hits considered per question.
    #[arg(long, default_value_t = DEFAULT_EVAL_LIMIT)]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    slack_qa::init_logger();
    let args = Args::parse();

    let ground_truth = load_ground_truth(&args.path)?;
    let config = SearchConfig::from_env();
    let channel = args.channel.or_else(|| config.default_channel.clone());
    let search = QaSearch::new(config)?;

    let report = evaluate_search(
        &search,
        &ground_truth,
        args.method,
        channel.as_deref(),
        args.limit,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
