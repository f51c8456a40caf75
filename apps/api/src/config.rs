use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Provider API keys are optional here; the key matching the selected
/// provider is checked at provider construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_provider: String,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub port: u16,
    pub output_dir: PathBuf,
    pub typst_template_dir: PathBuf,
    pub interaction_log_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            model_provider: env_or("MODEL_NAME", "openai"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            deepseek_api_key: optional_env("DEEPSEEK_API_KEY"),
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            output_dir: env_or("OUTPUT_DIR", "temp/output").into(),
            typst_template_dir: env_or("TYPST_TEMPLATE_DIR", "typst_templates").into(),
            interaction_log_dir: env_or("LLM_LOG_DIR", "logs").into(),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset and empty both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
