//! PDF resume ingestion: text + hyperlink extraction, one model call to
//! structure the text into resume JSON, and validation of the result.

pub mod pdf;
pub mod prompts;

pub use pdf::extract_text_and_hyperlinks;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::interaction_log::InteractionLogger;
use crate::providers::{extract_response_text, ModelProvider, ProviderError};

use prompts::build_extraction_prompt;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("no text could be extracted from the PDF")]
    NoText,

    #[error("model call failed during extraction: {0}")]
    Provider(#[from] ProviderError),

    #[error("model returned invalid resume JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("extracted resume JSON has no basics section")]
    MissingBasics,
}

/// Converts an uploaded PDF into structured resume JSON.
///
/// Unlike section enhancement there is no fallback here: without a valid
/// extraction there is nothing to enhance, so every failure is an error.
/// Both outcomes of the model call are recorded in the interaction log.
pub async fn extract_resume(
    pdf_bytes: &[u8],
    provider: &dyn ModelProvider,
    interaction_log: &InteractionLogger,
) -> Result<Value, ExtractError> {
    let (resume_text, hyperlinks) = extract_text_and_hyperlinks(pdf_bytes)?;
    if resume_text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }

    let prompt = build_extraction_prompt(&resume_text, &hyperlinks);
    let model_name = provider.family().label();

    let response = provider.invoke(&prompt).await?;
    let response_text = extract_response_text(&response, provider.family());
    let cleaned = strip_code_fences(&response_text);

    let parsed: Value = match serde_json::from_str(&cleaned) {
        Ok(parsed) => parsed,
        Err(e) => {
            interaction_log.log_interaction(
                model_name,
                &prompt,
                &cleaned,
                json!({"error": e.to_string(), "status": "failed"}),
            );
            return Err(ExtractError::InvalidJson(e));
        }
    };

    let resume = remove_null_values(parsed);

    if resume.get("basics").is_none() {
        interaction_log.log_interaction(
            model_name,
            &prompt,
            &cleaned,
            json!({"error": "missing basics section", "status": "failed"}),
        );
        return Err(ExtractError::MissingBasics);
    }

    interaction_log.log_interaction(
        model_name,
        &prompt,
        &serde_json::to_string_pretty(&resume).unwrap_or_default(),
        json!({"status": "success"}),
    );

    info!(
        "Resume extracted with {} top-level sections",
        resume.as_object().map_or(0, |sections| sections.len())
    );
    Ok(resume)
}

/// Removes markdown code fences anywhere in the reply, not only wrapping
/// ones. Models sometimes emit prose before the fenced block.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Recursively replaces JSON nulls with empty strings. Downstream rendering
/// expects every schema field to be present and string-like.
fn remove_null_values(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, remove_null_values(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(remove_null_values).collect()),
        Value::Null => Value::String(String::new()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub::StubProvider;
    use std::path::Path;

    #[test]
    fn test_strip_code_fences_wrapped() {
        assert_eq!(
            strip_code_fences("```json\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn test_strip_code_fences_with_leading_prose() {
        // Removing the fence tokens keeps their surrounding newlines.
        assert_eq!(
            strip_code_fences("Here is the JSON:\n```json\n{\"a\": 1}\n```"),
            "Here is the JSON:\n\n{\"a\": 1}"
        );
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_remove_null_values_nested() {
        let input = json!({
            "basics": {"name": "Ada", "summary": null},
            "work": [{"highlights": [null, "led a team"]}],
            "count": 3
        });
        let scrubbed = remove_null_values(input);
        assert_eq!(scrubbed["basics"]["summary"], json!(""));
        assert_eq!(scrubbed["work"][0]["highlights"], json!(["", "led a team"]));
        assert_eq!(scrubbed["count"], json!(3));
    }

    fn read_log_entries(dir: &Path) -> Vec<Value> {
        let mut entries = Vec::new();
        for file in std::fs::read_dir(dir).unwrap() {
            let content = std::fs::read_to_string(file.unwrap().path()).unwrap();
            for line in content.lines() {
                entries.push(serde_json::from_str(line).unwrap());
            }
        }
        entries
    }

    #[tokio::test]
    async fn test_extract_resume_happy_path() {
        let bytes = pdf::fixture_pdf("Ada Lovelace Engineer", Some("https://github.com/ada"));
        let stub = StubProvider::replying(
            "```json\n{\"basics\": {\"name\": \"Ada Lovelace\", \"summary\": null}}\n```",
        );
        let log_dir = tempfile::tempdir().unwrap();
        let logger = InteractionLogger::new(log_dir.path()).unwrap();

        let resume = extract_resume(&bytes, &stub, &logger).await.unwrap();

        assert_eq!(resume["basics"]["name"], json!("Ada Lovelace"));
        assert_eq!(resume["basics"]["summary"], json!(""));

        let entries = read_log_entries(log_dir.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["model_name"], json!("openai"));
        assert_eq!(entries[0]["metadata"]["status"], json!("success"));
    }

    #[tokio::test]
    async fn test_extract_resume_missing_basics() {
        let bytes = pdf::fixture_pdf("Some resume text", None);
        let stub = StubProvider::replying("{\"work\": []}");
        let log_dir = tempfile::tempdir().unwrap();
        let logger = InteractionLogger::new(log_dir.path()).unwrap();

        let err = extract_resume(&bytes, &stub, &logger).await.unwrap_err();
        assert!(matches!(err, ExtractError::MissingBasics));

        let entries = read_log_entries(log_dir.path());
        assert_eq!(entries[0]["metadata"]["status"], json!("failed"));
    }

    #[tokio::test]
    async fn test_extract_resume_invalid_json() {
        let bytes = pdf::fixture_pdf("Some resume text", None);
        let stub = StubProvider::replying("I could not parse this resume.");
        let log_dir = tempfile::tempdir().unwrap();
        let logger = InteractionLogger::new(log_dir.path()).unwrap();

        let err = extract_resume(&bytes, &stub, &logger).await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_extract_resume_provider_error() {
        let bytes = pdf::fixture_pdf("Some resume text", None);
        let stub = StubProvider::failing("quota exceeded");
        let log_dir = tempfile::tempdir().unwrap();
        let logger = InteractionLogger::new(log_dir.path()).unwrap();

        let err = extract_resume(&bytes, &stub, &logger).await.unwrap_err();
        assert!(matches!(err, ExtractError::Provider(_)));
    }
}
