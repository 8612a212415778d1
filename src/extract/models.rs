use serde::{Deserialize, Serialize};

/// One confirmed question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub asked_by: Option<String>,
    #[serde(default)]
    pub answered_by: Option<String>,
}

/// Extraction output for a single thread.
///
/// This is also the input format of the indexer: a Q&A file is a JSON array
/// of these objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub channel: String,
    #[serde(default, deserialize_with = "deserialize_thread_ts")]
    pub thread_ts: String,
    #[serde(default)]
    pub qas: Vec<QaPair>,
}

impl ExtractionResult {
    pub fn has_qas(&self) -> bool {
        !self.qas.is_empty()
    }
}

/// Accept `thread_ts` as either a string or a bare number.
fn deserialize_thread_ts<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(ts) => ts,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
