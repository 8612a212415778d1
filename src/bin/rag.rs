use clap::Parser;
use slack_qa::llm::{ChatClient, LlmConfig};
use slack_qa::rag::{answer, compute_relevancy};
use slack_qa::search::{QaSearch, SearchConfig, SearchMode};

#[derive(Parser, Debug)]
#[command(name = "rag", about = "Answer a question from the indexed Slack Q&A pairs")]
struct Args {
    /// Question to answer.
    query: String,

    /// Retrieval mode: `dense`, `sparse` or `hybrid`.
    #[arg(long)]
    method: Option<SearchMode>,

    /// Restrict context to one channel (defaults to `SEARCH_DEFAULT_CHANNEL`).
    #[arg(long)]
    channel: Option<String>,

    /// Number of Q&A records used as context.
    #[arg(long, default_value_t = 5)]
    limit: usize,

    /// Chat model (defaults to `LLM_MODEL`).
    #[arg(long)]
    model: Option<String>,

    /// Also grade the answer's relevance.
    #[arg(long)]
    evaluate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    slack_qa::init_logger();
    let args = Args::parse();

    let search_config = SearchConfig::from_env();
    let mode = args.method.unwrap_or(search_config.default_mode);
    let channel = args
        .channel
        .or_else(|| search_config.default_channel.clone());

    let llm_config = LlmConfig::from_env();
    let model = args.model.unwrap_or_else(|| llm_config.model.clone());

    let search = QaSearch::new(search_config)?;
    let llm = ChatClient::new(llm_config)?;

    let result = answer(
        &llm,
        &search,
        &args.query,
        mode,
        channel.as_deref(),
        &model,
        args.limit,
    )
    .await?;

    println!("{}", result.answer);
    println!();
    println!(
        "tokens in: {} | tokens out: {} | cost: ${:.6}",
        result.tokens_in,
        result.tokens_out,
        result.cost()
    );

    if args.evaluate {
        let relevancy = compute_relevancy(&llm, &args.query, &result.answer, &model).await?;
        println!(
            "relevance: {} | {}",
            relevancy.relevance, relevancy.explanation
        );
    }

    Ok(())
}
