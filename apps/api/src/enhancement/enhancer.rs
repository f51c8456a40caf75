//! Section-level enhancement and the document-level fan-out that drives it.
//!
//! Every section is enhanced independently and concurrently. A section that
//! fails at any stage (model call, sanitization, empty reply) falls back to
//! its original content, so the caller always receives a complete document.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::providers::{extract_response_text, ModelProvider};

use super::prompts::build_section_prompt;
use super::sanitize::{parse_leniently, sanitize};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("resume document must be a JSON object")]
    NotAnObject,

    #[error("section task failed: {0}")]
    SectionTask(#[from] tokio::task::JoinError),
}

/// Enhances one section, returning the original content untouched on any
/// failure. One model call per invocation; no retries.
pub async fn enhance_section(
    section_name: &str,
    section_content: &Value,
    provider: &dyn ModelProvider,
    job_description: Option<&str>,
    style_template: &str,
) -> Value {
    let prompt =
        build_section_prompt(section_name, section_content, job_description, style_template);

    let response = match provider.invoke(&prompt).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Model call failed for section {section_name}: {e}");
            return section_content.clone();
        }
    };

    let text = extract_response_text(&response, provider.family());

    let cleaned = match sanitize(&text) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            warn!("Failed to enhance section {section_name}, keeping original: {e}");
            return section_content.clone();
        }
    };

    let enhanced = parse_leniently(&cleaned);
    if is_empty_result(&enhanced) {
        warn!("Enhancement of section {section_name} produced an empty result, keeping original");
        return section_content.clone();
    }

    enhanced
}

/// An empty reply cannot be told apart from a model legitimately emptying a
/// section, so both count as failure and the original content wins.
fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Enhances every section of a resume document concurrently and reassembles
/// the result in the document's original shape.
///
/// Documents may wrap their sections in a `{details, JD}` envelope; the
/// envelope is detected, unwrapped for processing, and restored on output.
/// The job description resolves as: non-empty parameter first, then the
/// document's own `JD` field, then nothing.
pub async fn enhance_document(
    document: &Value,
    provider: Arc<dyn ModelProvider>,
    job_description: Option<&str>,
    style_template: &str,
) -> Result<Value, PipelineError> {
    let top = document.as_object().ok_or(PipelineError::NotAnObject)?;

    let wrapped = top.get("details").and_then(Value::as_object);
    let sections = wrapped.unwrap_or(top);

    let jd = job_description
        .filter(|jd| !jd.is_empty())
        .map(str::to_string)
        .or_else(|| top.get("JD").and_then(Value::as_str).map(str::to_string));

    let mut tasks = JoinSet::new();
    for (name, content) in sections {
        let name = name.clone();
        let content = content.clone();
        let provider = Arc::clone(&provider);
        let jd = jd.clone();
        let style = style_template.to_string();
        tasks.spawn(async move {
            let enhanced =
                enhance_section(&name, &content, provider.as_ref(), jd.as_deref(), &style).await;
            (name, enhanced)
        });
    }

    let mut collected: HashMap<String, Value> = HashMap::with_capacity(sections.len());
    while let Some(joined) = tasks.join_next().await {
        let (name, enhanced) = joined?;
        collected.insert(name, enhanced);
    }

    // Rebuild in discovery order, not completion order.
    let mut rebuilt = Map::new();
    for name in sections.keys() {
        if let Some(enhanced) = collected.remove(name) {
            rebuilt.insert(name.clone(), enhanced);
        }
    }

    let result = if wrapped.is_some() {
        let mut envelope = Map::new();
        envelope.insert("details".to_string(), Value::Object(rebuilt));
        if let Some(jd_value) = top.get("JD") {
            envelope.insert("JD".to_string(), jd_value.clone());
        }
        Value::Object(envelope)
    } else {
        Value::Object(rebuilt)
    };

    info!("Resume enhancement completed successfully");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub::{StubProvider, StubReply};
    use crate::providers::ProviderFamily;
    use serde_json::json;
    use std::time::Duration;

    fn sample_document() -> Value {
        json!({
            "basics": {"name": "Ada Lovelace", "label": "Engineer"},
            "work": [{"name": "Acme", "position": "Developer"}],
            "skills": [{"name": "Analytical Thinking", "keywords": ["math"]}]
        })
    }

    #[tokio::test]
    async fn test_enhance_section_replaces_content() {
        let stub = StubProvider::replying(r#"Here you go: {"name": "Ada Lovelace, PhD"}"#);
        let original = json!({"name": "Ada Lovelace"});
        let result = enhance_section("basics", &original, &stub, None, "simple").await;
        assert_eq!(result, json!({"name": "Ada Lovelace, PhD"}));
    }

    #[tokio::test]
    async fn test_enhance_section_single_model_call() {
        let stub = StubProvider::replying(r#"{"ok": true}"#);
        enhance_section("work", &json!([{"a": 1}]), &stub, None, "simple").await;
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_enhance_section_provider_error_keeps_original() {
        let stub = StubProvider::failing("rate limited");
        let original = json!([{"name": "Acme"}]);
        let result = enhance_section("work", &original, &stub, None, "simple").await;
        assert_eq!(result, original);
    }

    #[tokio::test]
    async fn test_enhance_section_garbage_reply_keeps_original() {
        let stub = StubProvider::replying("I cannot help with that.");
        let original = json!({"name": "Ada"});
        let result = enhance_section("basics", &original, &stub, None, "simple").await;
        assert_eq!(result, original);
    }

    #[tokio::test]
    async fn test_enhance_section_empty_reply_keeps_original() {
        let original = json!({"name": "Ada"});
        for reply in ["{}", "[]"] {
            let stub = StubProvider::replying(reply);
            let result = enhance_section("basics", &original, &stub, None, "simple").await;
            assert_eq!(result, original);
        }
    }

    #[tokio::test]
    async fn test_enhance_section_unknown_family_falls_back_to_raw() {
        // No extraction rule for the family, so the raw body serialization
        // feeds the sanitizer directly.
        let stub = StubProvider::replying(r#"{"name": "Ada, PhD"}"#)
            .with_family(ProviderFamily::Unknown);
        let result =
            enhance_section("basics", &json!({"name": "Ada"}), &stub, None, "simple").await;
        assert_eq!(result, json!({"name": "Ada, PhD"}));
    }

    #[test]
    fn test_is_empty_result() {
        assert!(is_empty_result(&Value::Null));
        assert!(is_empty_result(&json!({})));
        assert!(is_empty_result(&json!([])));
        assert!(is_empty_result(&json!("")));
        assert!(!is_empty_result(&json!({"a": 1})));
        assert!(!is_empty_result(&json!([0])));
        assert!(!is_empty_result(&json!("text")));
        assert!(!is_empty_result(&json!(0)));
    }

    #[tokio::test]
    async fn test_shape_preservation_and_key_order() {
        let document = sample_document();
        let provider: Arc<dyn ModelProvider> =
            Arc::new(StubProvider::replying(r#"{"enhanced": true}"#));
        let result = enhance_document(&document, provider, None, "simple")
            .await
            .unwrap();

        let input_keys: Vec<&String> = document.as_object().unwrap().keys().collect();
        let output_keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(input_keys, output_keys);
    }

    #[tokio::test]
    async fn test_wrapped_document_preserves_envelope_and_jd() {
        let document = json!({
            "details": {"basics": {"name": "Ada"}},
            "JD": "Senior Engineer"
        });
        let provider: Arc<dyn ModelProvider> =
            Arc::new(StubProvider::replying(r#"{"name": "Ada, PhD"}"#));
        let result = enhance_document(&document, provider, None, "simple")
            .await
            .unwrap();

        assert_eq!(result["JD"], json!("Senior Engineer"));
        assert_eq!(result["details"]["basics"], json!({"name": "Ada, PhD"}));
        let top_keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(top_keys, ["details", "JD"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fanout_collects_all_sections_despite_delay_skew() {
        // Per-rule delays force completion in reverse discovery order; the
        // rebuilt document must still carry every marker under its own key.
        let document = sample_document();
        let stub = StubProvider::replying(r#"{"marker": "fallback"}"#)
            .with_delayed_rule(
                "Ada Lovelace",
                StubReply::Text(r#"{"marker": "basics"}"#.to_string()),
                Duration::from_secs(3),
            )
            .with_delayed_rule(
                "Acme",
                StubReply::Text(r#"{"marker": "work"}"#.to_string()),
                Duration::from_secs(2),
            )
            .with_delayed_rule(
                "Analytical Thinking",
                StubReply::Text(r#"{"marker": "skills"}"#.to_string()),
                Duration::from_secs(1),
            );
        let provider: Arc<dyn ModelProvider> = Arc::new(stub);
        let result = enhance_document(&document, provider, None, "simple")
            .await
            .unwrap();

        assert_eq!(result["basics"]["marker"], json!("basics"));
        assert_eq!(result["work"]["marker"], json!("work"));
        assert_eq!(result["skills"]["marker"], json!("skills"));
        let output_keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(output_keys, ["basics", "work", "skills"]);
    }

    #[tokio::test]
    async fn test_job_description_parameter_takes_precedence() {
        let document = json!({
            "details": {"basics": {"name": "Ada"}},
            "JD": "Staff DBA"
        });
        let stub = StubProvider::replying(r#"{"marker": "no-jd"}"#)
            .with_rule(
                "Senior Rust Engineer",
                StubReply::Text(r#"{"marker": "param"}"#.to_string()),
            )
            .with_rule(
                "Staff DBA",
                StubReply::Text(r#"{"marker": "document"}"#.to_string()),
            );
        let provider: Arc<dyn ModelProvider> = Arc::new(stub);
        let result = enhance_document(&document, provider, Some("Senior Rust Engineer"), "simple")
            .await
            .unwrap();
        assert_eq!(result["details"]["basics"]["marker"], json!("param"));
    }

    #[tokio::test]
    async fn test_empty_job_description_parameter_falls_back_to_document() {
        let document = json!({
            "details": {"basics": {"name": "Ada"}},
            "JD": "Staff DBA"
        });
        let stub = StubProvider::replying(r#"{"marker": "no-jd"}"#).with_rule(
            "Staff DBA",
            StubReply::Text(r#"{"marker": "document"}"#.to_string()),
        );
        let provider: Arc<dyn ModelProvider> = Arc::new(stub);
        let result = enhance_document(&document, provider, Some(""), "simple")
            .await
            .unwrap();
        assert_eq!(result["details"]["basics"]["marker"], json!("document"));
    }

    #[tokio::test]
    async fn test_unknown_section_participates_in_fanout() {
        let document = json!({
            "certifications": [{"name": "CKA"}]
        });
        let provider: Arc<dyn ModelProvider> =
            Arc::new(StubProvider::replying(r#"[{"name": "Certified Kubernetes Administrator"}]"#));
        let result = enhance_document(&document, provider, None, "simple")
            .await
            .unwrap();
        assert_eq!(
            result["certifications"],
            json!([{"name": "Certified Kubernetes Administrator"}])
        );
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_original_byte_for_byte() {
        let document = sample_document();
        let stub = StubProvider::replying(r#"{"enhanced": true}"#).with_rule(
            "Acme",
            StubReply::Error("model exploded".to_string()),
        );
        let provider: Arc<dyn ModelProvider> = Arc::new(stub);
        let result = enhance_document(&document, provider, None, "simple")
            .await
            .unwrap();

        assert_eq!(result["work"].to_string(), document["work"].to_string());
        assert_eq!(result["basics"], json!({"enhanced": true}));
        assert_eq!(result["skills"], json!({"enhanced": true}));
    }

    #[tokio::test]
    async fn test_double_enhance_preserves_key_sets() {
        let document = sample_document();
        let provider: Arc<dyn ModelProvider> =
            Arc::new(StubProvider::replying(r#"{"enhanced": true}"#));
        let first = enhance_document(&document, Arc::clone(&provider), None, "simple")
            .await
            .unwrap();
        let second = enhance_document(&first, provider, None, "simple")
            .await
            .unwrap();

        let first_keys: Vec<&String> = first.as_object().unwrap().keys().collect();
        let second_keys: Vec<&String> = second.as_object().unwrap().keys().collect();
        assert_eq!(first_keys, second_keys);
    }

    #[tokio::test]
    async fn test_non_object_document_is_rejected() {
        let provider: Arc<dyn ModelProvider> = Arc::new(StubProvider::replying("{}"));
        let err = enhance_document(&json!([1, 2]), provider, None, "simple")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotAnObject));
    }

    #[tokio::test]
    async fn test_empty_document_passes_through() {
        let provider: Arc<dyn ModelProvider> = Arc::new(StubProvider::replying("{}"));
        let result = enhance_document(&json!({}), provider, None, "simple")
            .await
            .unwrap();
        assert_eq!(result, json!({}));
    }
}
