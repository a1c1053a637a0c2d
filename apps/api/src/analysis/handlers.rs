use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::analysis::ats::AtsStrategy;
use crate::analysis::orchestrator::{run_analysis, AnalysisRequest, AnalysisResult};
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Malformed JSON and a missing `resume_text` are both reported as 400;
/// a body over the upload limit is 413.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let limit = state.config.max_upload_bytes;
    let Json(req) = payload.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => too_large(limit),
        _ => AppError::Validation(e.body_text()),
    })?;
    let result = analyze(&state, req).await?;
    Ok(Json(result))
}

/// POST /api/v1/analyze/upload
///
/// Multipart form: `resume` (file, required), `job_description` and
/// `ats_strategy` (text, optional). Unknown fields are ignored.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut resume: Option<(Vec<u8>, Option<String>, Option<String>)> = None;
    let mut job_description: Option<String> = None;
    let mut ats_strategy: Option<AtsStrategy> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| bad_multipart(e, limit))? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(|e| bad_multipart(e, limit))?;
                debug!(?file_name, size = bytes.len(), "Received resume upload");
                resume = Some((bytes.to_vec(), file_name, content_type));
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| bad_multipart(e, limit))?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            Some("ats_strategy") => {
                let raw = field.text().await.map_err(|e| bad_multipart(e, limit))?;
                if !raw.trim().is_empty() {
                    ats_strategy = Some(raw.parse::<AtsStrategy>().map_err(AppError::Validation)?);
                }
            }
            _ => {}
        }
    }

    let (bytes, file_name, content_type) = resume.ok_or_else(|| {
        AppError::Validation("multipart field 'resume' is required".to_string())
    })?;

    let resume_text = extract_text(bytes, file_name.as_deref(), content_type.as_deref()).await?;

    let result = analyze(
        &state,
        AnalysisRequest {
            resume_text,
            job_description,
            ats_strategy,
        },
    )
    .await?;
    Ok(Json(result))
}

async fn analyze(state: &AppState, req: AnalysisRequest) -> Result<AnalysisResult, AppError> {
    run_analysis(
        req,
        state.catalog.clone(),
        state.enricher.clone(),
        state.config.ats_strategy,
    )
    .await
}

fn bad_multipart(e: MultipartError, limit: usize) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => too_large(limit),
        _ => AppError::Validation(format!("invalid multipart body: {}", e.body_text())),
    }
}

fn too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!("request body exceeds the {limit}-byte upload limit"))
}
