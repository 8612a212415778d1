use crate::config::{env_duration_millis, env_f32, env_optional, env_string};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the OpenAI-compatible chat completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            api_key: env_optional("OPENAI_API_KEY"),
            model: env_string("LLM_MODEL", DEFAULT_MODEL),
            temperature: env_f32("LLM_TEMPERATURE", 0.2).clamp(0.0, 2.0),
            request_timeout: env_duration_millis("LLM_TIMEOUT_MS", 60_000),
        }
    }
}
