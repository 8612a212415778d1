use super::error::RagError;
use super::prompt::{build_prompt, build_relevancy_prompt};
use crate::llm::{ChatMessage, ChatModel};
use crate::search::{Retriever, SearchMode};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// USD per 1K prompt tokens.
const INPUT_PRICE_PER_1K: f64 = 0.000150;
/// USD per 1K completion tokens.
const OUTPUT_PRICE_PER_1K: f64 = 0.000600;

/// Generated answer plus the token usage of the call that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
}

impl RagAnswer {
    pub fn cost(&self) -> f64 {
        calculate_llm_cost(self.tokens_in, self.tokens_out)
    }
}

/// Relevance grade for a generated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relevancy {
    #[serde(rename = "Relevance")]
    pub relevance: String,
    #[serde(rename = "Explanation")]
    pub explanation: String,
}

impl Relevancy {
    fn unknown() -> Self {
        Self {
            relevance: "UNKNOWN".to_string(),
            explanation: "Failed to parse evaluation".to_string(),
        }
    }
}

/// Retrieve context for `query` and ask the model to answer from it.
pub async fn answer<M, R>(
    llm: &M,
    retriever: &R,
    query: &str,
    mode: SearchMode,
    channel: Option<&str>,
    model: &str,
    limit: usize,
) -> Result<RagAnswer, RagError>
where
    M: ChatModel + Sync,
    R: Retriever + Sync,
{
    let results = retriever.search(mode, query, channel, limit).await?;
    debug!("rag: {} context records for query", results.len());

    let prompt = build_prompt(query, &results);
    let completion = llm
        .complete(&[ChatMessage::user(prompt)], model, None)
        .await?;

    Ok(RagAnswer {
        answer: completion.content,
        tokens_in: completion.tokens_in,
        tokens_out: completion.tokens_out,
    })
}

/// Cost in USD of a call with the given token counts, rounded to six
/// decimal places.
pub fn calculate_llm_cost(tokens_in: u64, tokens_out: u64) -> f64 {
    let cost = (tokens_in as f64 / 1000.0) * INPUT_PRICE_PER_1K
        + (tokens_out as f64 / 1000.0) * OUTPUT_PRICE_PER_1K;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

/// Ask the model to grade how relevant `answer` is to `question`.
///
/// Evaluator output that is not the expected JSON object yields an
/// `UNKNOWN` grade instead of an error.
pub async fn compute_relevancy<M>(
    llm: &M,
    question: &str,
    answer: &str,
    model: &str,
) -> Result<Relevancy, RagError>
where
    M: ChatModel + Sync,
{
    let prompt = build_relevancy_prompt(question, answer);
    let completion = llm
        .complete(&[ChatMessage::user(prompt)], model, None)
        .await?;

    Ok(parse_relevancy(&completion.content))
}

fn parse_relevancy(content: &str) -> Relevancy {
    match serde_json::from_str::<Relevancy>(content.trim()) {
        Ok(relevancy) => relevancy,
        Err(err) => {
            warn!("could not parse relevancy evaluation: {}", err);
            Relevancy::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Completion, LlmError};
    use crate::search::{QaRecord, ScoredPoint, SearchError};
    use std::sync::Mutex;

    struct CannedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for CannedModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _model: &str,
            _temperature: Option<f32>,
        ) -> Result<Completion, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .extend(messages.iter().map(|m| m.content.clone()));
            Ok(Completion {
                content: self.reply.clone(),
                tokens_in: 1200,
                tokens_out: 300,
            })
        }
    }

    struct FixedRetriever {
        fail: bool,
    }

    impl Retriever for FixedRetriever {
        async fn search(
            &self,
            _mode: SearchMode,
            _query: &str,
            _channel: Option<&str>,
            limit: usize,
        ) -> Result<Vec<ScoredPoint>, SearchError> {
            if self.fail {
                return Err(SearchError::InvalidInput("collection missing".to_string()));
            }
            let point = ScoredPoint {
                id: "p1".to_string(),
                score: 0.8,
                payload: QaRecord {
                    question: "How do I submit homework?".to_string(),
                    answer: "Use the course platform form.".to_string(),
                    ..QaRecord::default()
                },
            };
            Ok(vec![point; limit.min(1)])
        }
    }

    #[tokio::test]
    async fn answer_builds_prompt_from_retrieved_context() {
        let llm = CannedModel::new("Use the form.");
        let retriever = FixedRetriever { fail: false };

        let result = answer(
            &llm,
            &retriever,
            "where to submit?",
            SearchMode::Dense,
            None,
            "gpt-4o-mini",
            5,
        )
        .await
        .unwrap();

        assert_eq!(result.answer, "Use the form.");
        assert_eq!((result.tokens_in, result.tokens_out), (1200, 300));

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("QUESTION: where to submit?"));
        assert!(prompts[0].contains("question: How do I submit homework?"));
    }

    #[tokio::test]
    async fn retrieval_failure_is_reported() {
        let llm = CannedModel::new("unused");
        let retriever = FixedRetriever { fail: true };

        let err = answer(&llm, &retriever, "q", SearchMode::Hybrid, Some("#general"), "m", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Search(_)));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn cost_is_rounded_to_six_decimals() {
        assert_eq!(calculate_llm_cost(0, 0), 0.0);
        assert_eq!(calculate_llm_cost(1000, 1000), 0.00075);
        assert_eq!(calculate_llm_cost(1200, 300), 0.00036);
        assert_eq!(calculate_llm_cost(2000, 500), 0.0006);
        assert_eq!(calculate_llm_cost(3, 0), 0.0);
    }

    #[tokio::test]
    async fn relevancy_parses_evaluator_json() {
        let llm = CannedModel::new(
            r#"{"Relevance": "RELEVANT", "Explanation": "Directly answers the question."}"#,
        );
        let grade = compute_relevancy(&llm, "q", "a", "gpt-4o-mini").await.unwrap();

        assert_eq!(grade.relevance, "RELEVANT");
        assert_eq!(grade.explanation, "Directly answers the question.");
        assert!(llm.prompts.lock().unwrap()[0].contains("Generated Answer: a"));
    }

    #[tokio::test]
    async fn unparseable_relevancy_is_unknown() {
        let llm = CannedModel::new("It looks relevant to me.");
        let grade = compute_relevancy(&llm, "q", "a", "gpt-4o-mini").await.unwrap();

        assert_eq!(grade.relevance, "UNKNOWN");
        assert_eq!(grade.explanation, "Failed to parse evaluation");
    }
}
