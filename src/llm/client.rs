use super::config::LlmConfig;
use super::error::LlmError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// One chat message in an OpenAI-style conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Completion text plus token accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
}

/// A chat completion backend.
///
/// Implemented by [`ChatClient`]; tests substitute canned responses.
pub trait ChatModel {
    fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: Option<f32>,
    ) -> impl Future<Output = Result<Completion, LlmError>> + Send;
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("slack-qa/0.1")
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            http: client,
            config,
        })
    }

    async fn dispatch(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: Option<f32>,
    ) -> Result<Completion, LlmError> {
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model,
            messages,
            temperature,
        };

        debug!(
            "llm: dispatching completion request (model {}, {} messages)",
            model,
            messages.len()
        );

        let mut request = self.http.post(&endpoint).json(&payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(LlmError::Http)?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Service { status, body });
        }

        let body = response.bytes().await.map_err(LlmError::Http)?;
        let parsed: ChatResponse = serde_json::from_slice(&body)?;
        parsed.into_completion()
    }
}

impl ChatModel for ChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: Option<f32>,
    ) -> Result<Completion, LlmError> {
        self.dispatch(messages, model, temperature).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl ChatResponse {
    fn into_completion(self) -> Result<Completion, LlmError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        let usage = self.usage.unwrap_or_default();
        Ok(Completion {
            content,
            tokens_in: usage.prompt_tokens,
            tokens_out: usage.completion_tokens,
        })
    }
}
