//! Offline retrieval evaluation against a ground-truth question set.
//!
//! The ground truth maps a point id to the questions that should retrieve
//! it. Every question is run through a [`Retriever`] and the hits are scored
//! with hit rate and mean reciprocal rank.

use crate::search::{Retriever, SearchError, SearchMode};
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of hits considered per query.
pub const DEFAULT_EVAL_LIMIT: usize = 10;

/// Point id to the questions expected to retrieve it.
pub type GroundTruth = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid ground truth JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid ground truth: {0}")]
    InvalidGroundTruth(String),
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub hit_rate: f64,
    pub mrr: f64,
    pub queries: usize,
}

pub fn load_ground_truth(path: &Path) -> Result<GroundTruth, EvaluationError> {
    let contents = fs::read_to_string(path).map_err(|source| EvaluationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ground_truth(&contents)
}

/// Parse a ground-truth object. Each value is either a JSON-encoded string
/// holding a list of questions or the list itself.
pub fn parse_ground_truth(contents: &str) -> Result<GroundTruth, EvaluationError> {
    let Value::Object(entries) = serde_json::from_str::<Value>(contents)? else {
        return Err(EvaluationError::InvalidGroundTruth(
            "top-level JSON must be an object of point id to questions".to_string(),
        ));
    };

    let mut ground_truth = GroundTruth::new();
    for (id, questions) in entries {
        let questions: Vec<String> = match questions {
            Value::String(encoded) => serde_json::from_str(&encoded)?,
            list @ Value::Array(_) => serde_json::from_value(list)?,
            other => {
                return Err(EvaluationError::InvalidGroundTruth(format!(
                    "questions for {id} must be a list, got {other}"
                )));
            }
        };
        ground_truth.insert(id, questions);
    }

    Ok(ground_truth)
}

/// Share of queries with at least one relevant hit.
pub fn hit_rate(relevance: &[Vec<bool>]) -> f64 {
    if relevance.is_empty() {
        return 0.0;
    }
    let hits = relevance.iter().filter(|line| line.contains(&true)).count();
    hits as f64 / relevance.len() as f64
}

/// Mean reciprocal rank. Every relevant hit contributes `1 / (rank + 1)`.
pub fn mrr(relevance: &[Vec<bool>]) -> f64 {
    if relevance.is_empty() {
        return 0.0;
    }
    let total: f64 = relevance
        .iter()
        .flat_map(|line| line.iter().enumerate())
        .filter(|(_, relevant)| **relevant)
        .map(|(rank, _)| 1.0 / (rank as f64 + 1.0))
        .sum();
    total / relevance.len() as f64
}

/// Run every ground-truth question and score the results.
pub async fn evaluate_search<R: Retriever + Sync>(
    retriever: &R,
    ground_truth: &GroundTruth,
    mode: SearchMode,
    channel: Option<&str>,
    limit: usize,
) -> Result<EvaluationReport, EvaluationError> {
    let mut relevance = Vec::new();

    for (id, questions) in ground_truth {
        for question in questions {
            let results = retriever.search(mode, question, channel, limit).await?;
            let line: Vec<bool> = results
                .iter()
                .take(limit)
                .map(|point| point.id == *id)
                .collect();
            debug!("{} -> {} hits, relevant: {}", id, line.len(), line.contains(&true));
            relevance.push(line);
        }
    }

    let report = EvaluationReport {
        hit_rate: hit_rate(&relevance),
        mrr: mrr(&relevance),
        queries: relevance.len(),
    };
    info!(
        "evaluated {} queries ({}): hit_rate={:.4} mrr={:.4}",
        report.queries, mode, report.hit_rate, report.mrr
    );
    Ok(report)
}
