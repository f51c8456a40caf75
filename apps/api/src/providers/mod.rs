//! Model providers: the single point of entry for all LLM calls in the
//! resume pipeline.
//!
//! ARCHITECTURAL RULE: No other module may call a model API directly.
//! All model interactions MUST go through a [`ModelProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

pub mod chat_completions;
pub mod gemini;
#[cfg(test)]
pub mod stub;

/// Which API shape a provider speaks. Response text lives in a different
/// place per family, so downstream extraction is keyed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    Gemini,
    OpenAi,
    DeepSeek,
    /// A family the pipeline has no extraction rule for. Responses fall
    /// back to their raw JSON serialization.
    #[allow(dead_code)]
    Unknown,
}

impl ProviderFamily {
    pub fn label(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "gemini",
            ProviderFamily::OpenAi => "openai",
            ProviderFamily::DeepSeek => "deepseek",
            ProviderFamily::Unknown => "unknown",
        }
    }
}

/// Per-model request settings. Intentionally hardcoded per provider to
/// prevent accidental drift.
#[derive(Debug, Clone, Copy)]
pub struct ModelSettings {
    pub model: &'static str,
    pub temperature: f64,
    pub max_tokens: u32,
}

pub const GEMINI_SETTINGS: ModelSettings = ModelSettings {
    model: "gemini-1.5-pro",
    temperature: 0.5,
    max_tokens: 4096,
};

pub const OPENAI_SETTINGS: ModelSettings = ModelSettings {
    model: "gpt-4o",
    temperature: 0.5,
    max_tokens: 4096,
};

pub const DEEPSEEK_SETTINGS: ModelSettings = ModelSettings {
    model: "deepseek-chat",
    temperature: 0.6,
    max_tokens: 4096,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("{provider} selected but {env_var} is not set")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("unsupported model provider: {0}")]
    UnsupportedProvider(String),
}

/// A normalized model reply. Exactly one of `text` / `content` is populated
/// depending on the provider family; `raw` always carries the full response
/// body for logging and fallback.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub text: Option<String>,
    pub content: Option<String>,
    pub raw: Value,
}

/// Pulls the reply text out of a [`ModelResponse`] according to the family
/// that produced it. A response missing its family's field (or coming from
/// an unknown family) degrades to the raw JSON serialization rather than
/// failing.
pub fn extract_response_text(response: &ModelResponse, family: ProviderFamily) -> String {
    match family {
        ProviderFamily::Gemini => response
            .text
            .clone()
            .unwrap_or_else(|| response.raw.to_string()),
        ProviderFamily::OpenAi | ProviderFamily::DeepSeek => response
            .content
            .clone()
            .unwrap_or_else(|| response.raw.to_string()),
        ProviderFamily::Unknown => response.raw.to_string(),
    }
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn family(&self) -> ProviderFamily;

    /// Sends one prompt and returns the normalized reply. One attempt per
    /// call; retry policy belongs to the caller.
    async fn invoke(&self, prompt: &str) -> Result<ModelResponse, ProviderError>;
}

/// Builds the provider selected by `MODEL_NAME`, failing fast when the
/// matching API key is missing.
pub fn create_provider(config: &Config) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    match config.model_provider.to_ascii_lowercase().as_str() {
        "gemini" => {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or(ProviderError::MissingApiKey {
                    provider: "gemini",
                    env_var: "GEMINI_API_KEY",
                })?;
            Ok(Arc::new(gemini::GeminiProvider::new(api_key)))
        }
        "openai" => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or(ProviderError::MissingApiKey {
                    provider: "openai",
                    env_var: "OPENAI_API_KEY",
                })?;
            Ok(Arc::new(chat_completions::ChatCompletionsProvider::openai(
                api_key,
            )))
        }
        "deepseek" => {
            let api_key = config
                .deepseek_api_key
                .clone()
                .ok_or(ProviderError::MissingApiKey {
                    provider: "deepseek",
                    env_var: "DEEPSEEK_API_KEY",
                })?;
            Ok(Arc::new(
                chat_completions::ChatCompletionsProvider::deepseek(api_key),
            ))
        }
        other => Err(ProviderError::UnsupportedProvider(other.to_string())),
    }
}
