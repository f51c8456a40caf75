//! In-memory [`ModelProvider`] for tests. Replies are selected by substring
//! match against the prompt, with optional artificial latency to exercise
//! concurrent completion orders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{ModelProvider, ModelResponse, ProviderError, ProviderFamily};

#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Error(String),
}

struct StubRule {
    needle: String,
    reply: StubReply,
    delay: Option<Duration>,
}

pub struct StubProvider {
    family: ProviderFamily,
    rules: Vec<StubRule>,
    fallback: StubReply,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(fallback: StubReply) -> Self {
        Self {
            family: ProviderFamily::OpenAi,
            rules: Vec::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider that answers every prompt with the same text.
    pub fn replying(text: &str) -> Self {
        Self::new(StubReply::Text(text.to_string()))
    }

    /// A provider that fails every prompt with an API error.
    pub fn failing(message: &str) -> Self {
        Self::new(StubReply::Error(message.to_string()))
    }

    pub fn with_family(mut self, family: ProviderFamily) -> Self {
        self.family = family;
        self
    }

    /// Prompts containing `needle` get `reply` instead of the fallback.
    /// Rules are checked in insertion order.
    pub fn with_rule(mut self, needle: &str, reply: StubReply) -> Self {
        self.rules.push(StubRule {
            needle: needle.to_string(),
            reply,
            delay: None,
        });
        self
    }

    pub fn with_delayed_rule(mut self, needle: &str, reply: StubReply, delay: Duration) -> Self {
        self.rules.push(StubRule {
            needle: needle.to_string(),
            reply,
            delay: Some(delay),
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Places the reply text in the field the configured family uses, so
    /// family-keyed extraction sees the same shape a real provider returns.
    fn shape_response(&self, text: &str) -> ModelResponse {
        let raw = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        match self.family {
            ProviderFamily::Gemini => ModelResponse {
                text: Some(text.to_string()),
                content: None,
                raw,
            },
            ProviderFamily::OpenAi | ProviderFamily::DeepSeek => ModelResponse {
                text: None,
                content: Some(text.to_string()),
                raw,
            },
            ProviderFamily::Unknown => ModelResponse {
                text: None,
                content: None,
                raw,
            },
        }
    }
}

#[async_trait]
impl ModelProvider for StubProvider {
    fn family(&self) -> ProviderFamily {
        self.family
    }

    async fn invoke(&self, prompt: &str) -> Result<ModelResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let rule = self.rules.iter().find(|r| prompt.contains(&r.needle));
        let (reply, delay) = match rule {
            Some(r) => (&r.reply, r.delay),
            None => (&self.fallback, None),
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            StubReply::Text(text) => Ok(self.shape_response(text)),
            StubReply::Error(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}
