//! Append-only JSONL audit log of model interactions, one file per day.
//!
//! Entries carry estimated token counts and truncated prompt/reply text.
//! Logging never fails the request it records.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

/// Prompt and reply text stored per entry is capped at this many characters.
const LOG_TEXT_LIMIT: usize = 1000;

pub struct InteractionLogger {
    log_dir: PathBuf,
}

impl InteractionLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let log_dir = log_dir.into();
        std::fs::create_dir_all(&log_dir)?;
        Ok(Self { log_dir })
    }

    /// Records one model interaction. I/O errors are logged and swallowed;
    /// the audit trail is best-effort.
    pub fn log_interaction(&self, model_name: &str, input: &str, output: &str, metadata: Value) {
        let input_tokens = estimate_tokens(input);
        let output_tokens = estimate_tokens(output);

        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "model_name": model_name,
            "input_tokens": input_tokens,
            "output_tokens": output_tokens,
            "total_tokens": input_tokens + output_tokens,
            "input_text": truncate_text(input),
            "output_text": truncate_text(output),
            "metadata": metadata,
        });

        if let Err(e) = self.append(&entry) {
            error!("Failed to write model interaction log: {e}");
        }
    }

    fn append(&self, entry: &Value) -> io::Result<()> {
        let file_name = format!("llm_interactions_{}.log", Utc::now().format("%Y%m%d"));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_dir.join(file_name))?;
        writeln!(file, "{entry}")
    }
}

/// Rough token count: whitespace-separated words times 1.3.
fn estimate_tokens(text: &str) -> usize {
    (text.split_whitespace().count() as f64 * 1.3).round() as usize
}

fn truncate_text(text: &str) -> String {
    if text.chars().count() > LOG_TEXT_LIMIT {
        let truncated: String = text.chars().take(LOG_TEXT_LIMIT).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}
