//! Model output cleanup: pull one JSON value out of free-form reply text,
//! re-serialize it canonically, and (separately) repair the two quote
//! malformations models actually produce.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// First `{...}` or `[...]` span in the reply, greedy to the last closing
/// delimiter, newlines included. A reply containing two JSON values yields
/// one span from the first opener to the last closer, which then fails the
/// strict parse.
static JSON_CANDIDATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}|\[.*\]").unwrap());

/// Bareword object key: preceded by `{` or `,`, followed by `:`.
static BARE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([{,])\s*(\w+):").unwrap());

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("no valid JSON found in model output")]
    NoJsonFound,

    #[error("invalid JSON format in model output: {0}")]
    InvalidJsonFormat(#[source] serde_json::Error),
}

/// Extracts the first JSON object or array from raw model output and returns
/// it re-serialized with stable 2-space indentation.
///
/// Embedded newlines are stripped from the candidate before parsing, which
/// incidentally repairs raw line breaks inside string values.
pub fn sanitize(raw: &str) -> Result<String, SanitizeError> {
    let candidate = JSON_CANDIDATE
        .find(raw)
        .ok_or(SanitizeError::NoJsonFound)?
        .as_str();

    let cleaned = candidate.replace('\n', "");
    let value: Value =
        serde_json::from_str(cleaned.trim()).map_err(SanitizeError::InvalidJsonFormat)?;

    serde_json::to_string_pretty(&value).map_err(SanitizeError::InvalidJsonFormat)
}

/// Parses text as JSON, repairing exactly two malformations before giving
/// up: single quotes become double quotes, and bareword object keys are
/// quoted. Anything still unparseable yields an empty object; this function
/// never fails.
pub fn parse_leniently(text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "JSON parse error: {e}, text: {}...",
                text.chars().take(100).collect::<String>()
            );
            let repaired = text.replace('\'', "\"");
            let repaired = BARE_KEY.replace_all(&repaired, r#"${1}"${2}":"#);
            serde_json::from_str(&repaired).unwrap_or_else(|_| Value::Object(Map::new()))
        }
    }
}
