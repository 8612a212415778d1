use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Flattened Q&A record stored as a point payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QaRecord {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub thread_ts: String,
    #[serde(default)]
    pub asked_by: Option<String>,
    #[serde(default)]
    pub answered_by: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl QaRecord {
    /// Text embedded for this record: question, newline, answer.
    pub fn embedding_text(&self) -> String {
        format!("{}\n{}", self.question, self.answer)
            .trim()
            .to_string()
    }
}

/// A search hit returned by the vector store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredPoint {
    #[serde(deserialize_with = "deserialize_point_id")]
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub payload: QaRecord,
}

/// Point ids are UUID strings or unsigned integers.
pub(crate) fn deserialize_point_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported point id: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_text_joins_question_and_answer() {
        let record = QaRecord {
            question: "How do I reset?".to_string(),
            answer: "Run reset.sh".to_string(),
            ..QaRecord::default()
        };
        assert_eq!(record.embedding_text(), "How do I reset?\nRun reset.sh");

        let answer_only = QaRecord {
            answer: "  only an answer ".to_string(),
            ..QaRecord::default()
        };
        assert_eq!(answer_only.embedding_text(), "only an answer");
    }

    #[test]
    fn scored_point_accepts_numeric_ids_and_null_payload_fields() {
        let point: ScoredPoint = serde_json::from_str(
            r#"{"id": 7, "version": 1, "score": 0.5,
                "payload": {"channel": null, "thread_ts": "1.0", "question": "q", "answer": "a"}}"#,
        )
        .unwrap();

        assert_eq!(point.id, "7");
        assert_eq!(point.payload.channel, None);
        assert_eq!(point.payload.question, "q");
    }
}
