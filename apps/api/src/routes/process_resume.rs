use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::enhancement::enhance_document;
use crate::errors::AppError;
use crate::extraction::extract_resume;
use crate::state::AppState;

const DEFAULT_TEMPLATE_TYPE: &str = "software_engineer";

/// POST /process-resume
/// Multipart form: `resume` (PDF file, required), `job_description` (text,
/// optional), `template_type` (text, defaults to "software_engineer").
/// Runs extract -> enhance -> render and returns the finished PDF.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut pdf_bytes: Option<bytes::Bytes> = None;
    let mut job_description: Option<String> = None;
    let mut template_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "resume" => {
                if field.file_name().map_or(true, str::is_empty) {
                    return Err(AppError::Validation("No file selected".to_string()));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume file: {e}")))?;
                pdf_bytes = Some(data);
            }
            "job_description" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description: {e}"))
                })?;
                job_description = Some(value);
            }
            "template_type" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read template_type: {e}"))
                })?;
                template_type = Some(value);
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    let style = template_type.unwrap_or_else(|| DEFAULT_TEMPLATE_TYPE.to_string());

    info!("Processing resume upload ({} bytes)", pdf_bytes.len());

    let resume = extract_resume(&pdf_bytes, state.provider.as_ref(), &state.interaction_log).await?;

    let enhanced = enhance_document(
        &resume,
        Arc::clone(&state.provider),
        job_description.as_deref(),
        &style,
    )
    .await?;

    let request_id = Uuid::new_v4();
    persist_enhanced_json(&state.config.output_dir, request_id, &enhanced)
        .await
        .context("failed to persist enhanced resume")?;

    let pdf_path = state.renderer.render(&enhanced).await?;
    let pdf_file = tokio::fs::read(&pdf_path)
        .await
        .context("failed to read rendered PDF")?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"resume_{request_id}.pdf\""),
        ),
    ];

    Ok((StatusCode::OK, headers, pdf_file).into_response())
}

/// Keeps a copy of the enhanced JSON next to the rendered PDFs, named after
/// the request id from the download filename.
async fn persist_enhanced_json(
    output_dir: &Path,
    request_id: Uuid,
    enhanced: &Value,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("{request_id}.json"));
    let json = serde_json::to_string_pretty(enhanced)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
