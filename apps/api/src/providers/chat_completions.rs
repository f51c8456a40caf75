//! Shared wire client for chat-completions APIs. OpenAI and DeepSeek speak
//! the same protocol, so one client covers both.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    ModelProvider, ModelResponse, ModelSettings, ProviderError, ProviderFamily, DEEPSEEK_SETTINGS,
    OPENAI_SETTINGS,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct ChatCompletionsProvider {
    client: Client,
    url: &'static str,
    api_key: String,
    family: ProviderFamily,
    settings: ModelSettings,
}

impl ChatCompletionsProvider {
    pub fn openai(api_key: String) -> Self {
        Self::new(OPENAI_API_URL, api_key, ProviderFamily::OpenAi, OPENAI_SETTINGS)
    }

    pub fn deepseek(api_key: String) -> Self {
        Self::new(
            DEEPSEEK_API_URL,
            api_key,
            ProviderFamily::DeepSeek,
            DEEPSEEK_SETTINGS,
        )
    }

    fn new(
        url: &'static str,
        api_key: String,
        family: ProviderFamily,
        settings: ModelSettings,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            url,
            api_key,
            family,
            settings,
        }
    }
}

fn first_choice_content(response: &ChatResponse) -> Option<String> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.as_ref())
        .and_then(|message| message.content.clone())
        .filter(|content| !content.is_empty())
}

#[async_trait]
impl ModelProvider for ChatCompletionsProvider {
    fn family(&self) -> ProviderFamily {
        self.family
    }

    async fn invoke(&self, prompt: &str) -> Result<ModelResponse, ProviderError> {
        let request_body = ChatRequest {
            model: self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: Value = response.json().await?;
        let parsed: ChatResponse = serde_json::from_value(raw.clone())?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "{} call succeeded: prompt_tokens={:?}, completion_tokens={:?}",
                self.family.label(),
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let content = first_choice_content(&parsed).ok_or(ProviderError::EmptyResponse)?;

        Ok(ModelResponse {
            text: None,
            content: Some(content),
            raw,
        })
    }
}
