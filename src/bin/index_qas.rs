use clap::Parser;
use slack_qa::search::{
    IndexOptions, QdrantClient, SearchConfig, SearchMode, index_records, iter_records,
    load_qa_threads,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "index_qas", about = "Index extracted Slack Q&A pairs into Qdrant")]
struct Args {
    /// Q&A JSON file produced by `slack-threads --qa-out`.
    #[arg(long)]
    file: PathBuf,

    /// Collection name (defaults to `<QDRANT_COLLECTION_PREFIX>_<mode>`).
    #[arg(long)]
    collection: Option<String>,

    /// Qdrant base URL (defaults to `QDRANT_URL`).
    #[arg(long)]
    qdrant_url: Option<String>,

    /// Dense embedding model (defaults to `EMBEDDINGS_MODEL_ID`).
    #[arg(long)]
    model: Option<String>,

    /// Dense embedding dimensionality (defaults to `EMBEDDINGS_DIM`).
    #[arg(long)]
    embed_dim: Option<usize>,

    /// Points per upsert request (defaults to `INDEX_BATCH_SIZE`).
    #[arg(long)]
    batch_size: Option<usize>,

    /// Skip records whose ids are already in the collection.
    #[arg(long)]
    skip_existing: bool,

    /// `dense`, `sparse` or `hybrid`.
    #[arg(long, default_value_t = SearchMode::Dense)]
    mode: SearchMode,
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
    if let Some(dim) = args.embed_dim {
        config.embedding_dim = dim;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size.max(1);
    }

    let mut options = IndexOptions::from_config(&config, args.mode);
    options.skip_existing = args.skip_existing;
    if let Some(collection) = args.collection {
        options.collection = collection;
    }

    let threads = load_qa_threads(&args.file)?;
    let records = iter_records(&threads);
    log::info!(
        "loaded {} Q&A records from {} threads in {}",
        records.len(),
        threads.len(),
        args.file.display()
    );

    let client = QdrantClient::new(&config)?;
    let report = index_records(&client, records, &options).await?;

    println!(
        "Upserted {} points into '{}' ({} skipped)",
        report.upserted, options.collection, report.skipped
    );
    Ok(())
}
