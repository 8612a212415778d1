use super::error::ExtractError;
use super::models::ExtractionResult;
use crate::llm::{ChatMessage, ChatModel};
use serde_json::Value;
use std::future::Future;

/// System prompt for FAQ extraction from a rendered Slack thread.
pub const SYSTEM_PROMPT: &str = r#"You are an assistant that extracts Q&A pairs from Slack threads to build an FAQ.
Only include questions that have a confirmed working answer.

Detection rules (strict):

- Identify all distinct questions in the thread (initial post or replies).
- If the same user replies to themselves:
  * If it clarifies the same question, append it to the question.
  * If it is a different question, create a new Q&A candidate.
- Validation required to include a Q&A:
  * A question can be included only if there is explicit evidence of success, such as:
    - A follow-up from the asker or thread participants confirming success
      (e.g. "that worked", "fixed", "resolved", "thanks, it works now").
    - Or clear objective evidence in the thread that the fix worked (final logs or outcomes showing success).
  * If there is no explicit success confirmation, treat the question as unresolved and do not include it.
- Negative signals (treat as unresolved):
  "didn't work", "still fails", "same error", "not solved", "no luck", "any other ideas?".
- Skip any answer that clearly did not work.
- If no working answer exists for a question, skip that Q&A.
- If no questions have a working answer, or the thread has no question at all, output exactly:
  {"qas": []}
- If a Q&A is about a time-sensitive event (deadlines, submission dates, schedules), skip it entirely.

Output format (strict JSON, no text outside JSON):

{
  "channel": "<channel_name>",
  "thread_ts": "<thread_timestamp>",
  "qas": [
    {
      "question": "Clean full question, including clarifications (remove mentions like <@U123>)",
      "answer": "The confirmed working answer. Preserve code/commands.",
      "asked_by": "Uxxxx",
      "answered_by": "Uxxxx"
    }
  ]
}

Never output placeholders like "no solution provided".
Do not include usernames or timestamps outside of the 'asked_by' and 'answered_by' fields.
Be conservative: when in doubt about success, output {"qas": []}."#;

/// Turns a rendered thread transcript into structured Q&A pairs.
pub trait QaExtractor {
    fn extract_qas(
        &self,
        thread_text: &str,
        model: &str,
    ) -> impl Future<Output = Result<ExtractionResult, ExtractError>> + Send;
}

/// [`QaExtractor`] backed by a chat completion model.
pub struct LlmExtractor<M> {
    model: M,
    temperature: f32,
}

impl<M: ChatModel> LlmExtractor<M> {
    pub fn new(model: M, temperature: f32) -> Self {
        Self { model, temperature }
    }
}

impl<M: ChatModel + Sync> QaExtractor for LlmExtractor<M> {
    async fn extract_qas(
        &self,
        thread_text: &str,
        model: &str,
    ) -> Result<ExtractionResult, ExtractError> {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(thread_text),
        ];
        let completion = self
            .model
            .complete(&messages, model, Some(self.temperature))
            .await?;

        parse_extraction(&completion.content)
    }
}

/// Parse model output into an [`ExtractionResult`].
///
/// The output must be a JSON object with a `qas` array. A surrounding
/// markdown code fence is tolerated.
pub fn parse_extraction(content: &str) -> Result<ExtractionResult, ExtractError> {
    let content = strip_code_fence(content.trim());

    let value: Value = serde_json::from_str(content).map_err(|err| ExtractError::InvalidJson {
        error: err.to_string(),
        content: content.to_string(),
    })?;

    if !value.get("qas").is_some_and(Value::is_array) {
        return Err(ExtractError::MissingQas {
            content: serde_json::to_string_pretty(&value).unwrap_or_else(|_| content.to_string()),
        });
    }

    serde_json::from_value(value).map_err(|err| ExtractError::InvalidJson {
        error: err.to_string(),
        content: content.to_string(),
    })
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
