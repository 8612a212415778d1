use clap::Parser;
use slack_qa::search::{QaSearch, Retriever, SearchConfig, SearchMode};

#[derive(Parser, Debug)]
#[command(name = "search_qa", about = "Query the indexed Slack Q&A pairs")]
struct Args {
    /// `dense`, `sparse` or `hybrid`.
    mode: SearchMode,

    /// Search text.
    query: String,

    /// Restrict hits to one channel (defaults to `SEARCH_DEFAULT_CHANNEL`).
    #[arg(long)]
    channel: Option<String>,

    /// Number of hits to print.
    #[arg(long, default_value_t = 1)]
    limit: usize,

    /// Qdrant base URL (defaults to `QDRANT_URL`).
    #[arg(long)]
    qdrant_url: Option<String>,

    /// Dense embedding model (defaults to `EMBEDDINGS_MODEL_ID`).
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    slack_qa::init_logger();
    let args = Args::parse();

    let mut config = SearchConfig::from_env();
    if let Some(url) = args.qdrant_url {
        config.qdrant_url = url;
    }
    if let Some(model) = args.model {
        config.dense_model = model;
    }
    let channel = args.channel.or_else(|| config.default_channel.clone());

    let search = QaSearch::new(config)?;
    let results = search
        .search(args.mode, &args.query, channel.as_deref(), args.limit)
        .await?;

    if results.is_empty() {
        eprintln!("no results");
    }
    for point in results {
        println!("{}", point.payload.answer);
    }
    Ok(())
}
