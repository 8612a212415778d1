//! Indexing of extracted Q&A pairs into a Qdrant collection.
//!
//! Every Q&A pair becomes one point whose id is derived from its position in
//! the thread and the thread timestamp, so re-running the indexer over the
//! same file updates points in place instead of duplicating them.

use super::SearchMode;
use super::client::{DENSE_VECTOR, PointStruct, QdrantClient, SPARSE_VECTOR, document};
use super::config::SearchConfig;
use super::error::SearchError;
use super::models::QaRecord;
use crate::extract::ExtractionResult;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Options for a single indexing run.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub collection: String,
    pub mode: SearchMode,
    pub dense_model: String,
    pub sparse_model: String,
    pub embedding_dim: Option<usize>,
    pub batch_size: usize,
    pub skip_existing: bool,
}

impl IndexOptions {
    pub fn from_config(config: &SearchConfig, mode: SearchMode) -> Self {
        Self {
            collection: config.collection_for(mode),
            mode,
            dense_model: config.dense_model.clone(),
            sparse_model: config.sparse_model.clone(),
            embedding_dim: mode.uses_dense().then_some(config.embedding_dim),
            batch_size: config.batch_size,
            skip_existing: false,
        }
    }
}

/// Counts reported after an indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub upserted: usize,
    pub skipped: usize,
}

/// Load a Q&A file: a JSON array of per-thread extraction results.
pub fn load_qa_threads(path: &Path) -> Result<Vec<ExtractionResult>, SearchError> {
    let contents = fs::read_to_string(path).map_err(|source| SearchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_qa_threads(&contents)
}

pub fn parse_qa_threads(contents: &str) -> Result<Vec<ExtractionResult>, SearchError> {
    let value: Value = serde_json::from_str(contents)?;
    if !value.is_array() {
        return Err(SearchError::InvalidInput(
            "top-level JSON must be a list of thread objects".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Deterministic UUIDv5 (URL namespace) for `name`.
pub fn point_id(name: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()).to_string()
}

/// Flatten threads into `(point_id, record)` pairs.
///
/// The id name is the pair's index within its thread followed by the thread
/// timestamp with dots removed, e.g. `0` + `1712345678123456`.
pub fn iter_records(threads: &[ExtractionResult]) -> Vec<(String, QaRecord)> {
    let mut records = Vec::new();

    for thread in threads {
        let thread_ts_nodot = thread.thread_ts.replace('.', "");
        let channel = Some(thread.channel.clone()).filter(|channel| !channel.is_empty());

        for (index, qa) in thread.qas.iter().enumerate() {
            let id = point_id(&format!("{index}{thread_ts_nodot}"));
            records.push((
                id,
                QaRecord {
                    channel: channel.clone(),
                    thread_ts: thread.thread_ts.clone(),
                    asked_by: qa.asked_by.clone(),
                    answered_by: qa.answered_by.clone(),
                    question: qa.question.clone(),
                    answer: qa.answer.clone(),
                },
            ));
        }
    }

    records
}

/// Build the point for one record under `options.mode`.
pub fn build_point(
    id: &str,
    record: &QaRecord,
    options: &IndexOptions,
) -> Result<PointStruct, SearchError> {
    let text = record.embedding_text();
    let mut vector = serde_json::Map::new();

    if options.mode.uses_dense() {
        vector.insert(DENSE_VECTOR.to_string(), document(&text, &options.dense_model));
    }
    if options.mode.uses_sparse() {
        vector.insert(SPARSE_VECTOR.to_string(), document(&text, &options.sparse_model));
    }

    Ok(PointStruct {
        id: id.to_string(),
        vector,
        payload: serde_json::to_value(record)?,
    })
}

/// Create the collection (and its `channel` keyword index) if missing.
pub async fn ensure_collection(
    client: &QdrantClient,
    collection: &str,
    mode: SearchMode,
    embedding_dim: Option<usize>,
) -> Result<(), SearchError> {
    if client.collection_exists(collection).await? {
        info!("collection '{}' already exists", collection);
        return Ok(());
    }

    info!(
        "creating collection '{}' (mode={}, size={:?}, distance=cosine)",
        collection, mode, embedding_dim
    );
    client.create_collection(collection, mode, embedding_dim).await?;

    info!("creating payload index on 'channel'");
    client
        .create_payload_index(collection, "channel", "keyword")
        .await?;
    Ok(())
}

/// Drop records whose ids are already present.
pub fn pending_records(
    records: Vec<(String, QaRecord)>,
    existing: &HashSet<String>,
) -> Vec<(String, QaRecord)> {
    records
        .into_iter()
        .filter(|(id, _)| !existing.contains(id))
        .collect()
}

/// Upsert `records` into the collection described by `options`.
pub async fn index_records(
    client: &QdrantClient,
    records: Vec<(String, QaRecord)>,
    options: &IndexOptions,
) -> Result<IndexReport, SearchError> {
    ensure_collection(client, &options.collection, options.mode, options.embedding_dim).await?;

    if records.is_empty() {
        warn!("no records found in input");
        return Ok(IndexReport::default());
    }

    let total = records.len();
    let to_process = if options.skip_existing {
        info!(
            "fetching existing ids from collection '{}' (this may take a while)",
            options.collection
        );
        let existing = client.scroll_ids(&options.collection).await?;
        info!("found {} existing ids", existing.len());
        pending_records(records, &existing)
    } else {
        records
    };

    let skipped = total - to_process.len();
    if skipped > 0 {
        info!("skipping {} existing records", skipped);
    }

    let batch_size = options.batch_size.max(1);
    info!(
        "indexing {} records (batch size={})",
        to_process.len(),
        batch_size
    );

    let mut upserted = 0;
    for batch in to_process.chunks(batch_size) {
        let points = batch
            .iter()
            .map(|(id, record)| build_point(id, record, options))
            .collect::<Result<Vec<_>, _>>()?;

        client.upsert_points(&options.collection, &points).await?;
        upserted += points.len();
        debug!("upserted {} of {} records", upserted, to_process.len());
    }

    info!(
        "done: upserted {} points into collection '{}'",
        upserted, options.collection
    );
    Ok(IndexReport { upserted, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::QaPair;

    fn options(mode: SearchMode) -> IndexOptions {
        IndexOptions {
            collection: "slack_qa_test".to_string(),
            mode,
            dense_model: "jinaai/jina-embeddings-v2-base-en".to_string(),
            sparse_model: "Qdrant/bm25".to_string(),
            embedding_dim: Some(768),
            batch_size: 2,
            skip_existing: false,
        }
    }

    fn qa(question: &str) -> QaPair {
        QaPair {
            question: question.to_string(),
            answer: format!("answer to {question}"),
            asked_by: Some("U1".to_string()),
            answered_by: Some("U2".to_string()),
        }
    }

    fn sample_threads() -> Vec<ExtractionResult> {
        vec![
            ExtractionResult {
                channel: "#course-llm-zoomcamp".to_string(),
                thread_ts: "1712345678.123456".to_string(),
                qas: vec![qa("first"), qa("second")],
            },
            ExtractionResult {
                channel: String::new(),
                thread_ts: "1712345999.000100".to_string(),
                qas: vec![qa("third")],
            },
        ]
    }

    #[test]
    fn point_ids_are_deterministic_uuid_v5() {
        let id = point_id("01712345678123456");
        assert_eq!(id, point_id("01712345678123456"));
        assert_ne!(id, point_id("11712345678123456"));

        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 5);
    }

    #[test]
    fn iter_records_flattens_with_positional_ids() {
        let records = iter_records(&sample_threads());

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].0, point_id("01712345678123456"));
        assert_eq!(records[1].0, point_id("11712345678123456"));
        assert_eq!(records[2].0, point_id("01712345999000100"));

        assert_eq!(records[0].1.channel.as_deref(), Some("#course-llm-zoomcamp"));
        assert_eq!(records[1].1.question, "second");
        assert_eq!(records[2].1.channel, None);
        assert_eq!(records[2].1.thread_ts, "1712345999.000100");
    }

    #[test]
    fn build_point_per_mode() {
        let (id, record) = iter_records(&sample_threads()).remove(0);

        let dense = build_point(&id, &record, &options(SearchMode::Dense)).unwrap();
        assert_eq!(dense.vector.len(), 1);
        assert_eq!(dense.vector["dense"]["model"], "jinaai/jina-embeddings-v2-base-en");
        assert_eq!(dense.vector["dense"]["text"], "first\nanswer to first");
        assert_eq!(dense.payload["question"], "first");
        assert_eq!(dense.payload["asked_by"], "U1");

        let sparse = build_point(&id, &record, &options(SearchMode::Sparse)).unwrap();
        assert_eq!(sparse.vector.len(), 1);
        assert_eq!(sparse.vector["sparse"]["model"], "Qdrant/bm25");

        let hybrid = build_point(&id, &record, &options(SearchMode::Hybrid)).unwrap();
        assert_eq!(hybrid.vector.len(), 2);

        let body = serde_json::to_value(&hybrid).unwrap();
        assert_eq!(body["id"], id);
    }

    #[test]
    fn pending_records_skips_existing_ids() {
        let records = iter_records(&sample_threads());
        let existing: HashSet<String> = [records[1].0.clone()].into_iter().collect();

        let pending = pending_records(records.clone(), &existing);
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|(id, _)| id != &records[1].0));
    }

    #[test]
    fn qa_file_must_be_an_array() {
        assert!(matches!(
            parse_qa_threads(r#"{"channel": "x"}"#),
            Err(SearchError::InvalidInput(_))
        ));
        let parsed = parse_qa_threads(
            r#"[{"channel": "c", "thread_ts": "1.0", "qas": [{"question": "q", "answer": "a"}]}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0].qas[0].asked_by, None);
    }

    #[test]
    fn options_from_config_skip_dimension_for_sparse() {
        let config = SearchConfig::from_env();
        assert_eq!(IndexOptions::from_config(&config, SearchMode::Sparse).embedding_dim, None);
        assert_eq!(
            IndexOptions::from_config(&config, SearchMode::Dense).embedding_dim,
            Some(config.embedding_dim)
        );
    }
}
