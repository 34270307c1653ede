//! Route handlers for the analysis API.
//!
//! Handlers stay thin: decode the request, call into the engine, shape the
//! response. All scoring and extraction behavior lives in the engine
//! modules where it is tested directly.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::analyzer::analyze;
use crate::analysis::skills::extract_skills;
use crate::errors::AppError;
use crate::pdf;
use crate::state::AppState;

/// Job description applied to PDF uploads that arrive without one.
const DEFAULT_JOB_DESCRIPTION: &str = "Software development, programming, technical skills.";

// ──────────────────────────── Request / response types ────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextResponse {
    pub similarity_score: f64,
    pub similarity_percent: f64,
    pub skills: Vec<String>,
    pub resume_preview: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzePdfResponse {
    pub similarity_score: f64,
    pub similarity_percent: f64,
    pub skills: Vec<String>,
    /// Full extracted text, returned so clients can re-analyze it against
    /// other job descriptions without re-uploading the file.
    pub resume_text: String,
    pub resume_preview: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<String>,
}

// ──────────────────────────── Handlers ────────────────────────────

/// POST /api/analyze/text
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, AppError> {
    let report = analyze(
        &request.resume_text,
        &request.job_description,
        state.annotator.as_ref(),
    )
    .await?;

    Ok(Json(AnalyzeTextResponse {
        similarity_score: report.similarity_score,
        similarity_percent: report.similarity_percent,
        skills: report.skills,
        resume_preview: report.resume_preview,
    }))
}

/// POST /api/analyze/pdf
///
/// Multipart form with a `file` part (the PDF) and an optional
/// `job_description` part. An absent or empty job description falls back
/// to a generic software-role one.
pub async fn analyze_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzePdfResponse>, AppError> {
    let mut file_name: Option<String> = None;
    let mut file_data: Option<Bytes> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                file_data = Some(data);
            }
            "job_description" => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            }
            _ => {}
        }
    }

    let file_name = file_name.unwrap_or_default();
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation("Please upload a PDF file.".to_string()));
    }
    let file_data = file_data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation("Uploaded file is empty.".to_string()))?;

    let resume_text = pdf::extract_text(&file_data)
        .map_err(|e| AppError::Validation(format!("Could not extract text from the PDF: {e:#}")))?;
    if resume_text.is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from the PDF.".to_string(),
        ));
    }
    info!(
        "Extracted {} characters from {}",
        resume_text.chars().count(),
        file_name
    );

    let job_description = effective_job_description(job_description);

    let report = analyze(&resume_text, &job_description, state.annotator.as_ref()).await?;

    Ok(Json(AnalyzePdfResponse {
        similarity_score: report.similarity_score,
        similarity_percent: report.similarity_percent,
        skills: report.skills,
        resume_text,
        resume_preview: report.resume_preview,
    }))
}

/// POST /api/skills
pub async fn skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let skills = extract_skills(&request.resume_text, state.annotator.as_ref()).await?;
    Ok(Json(ExtractSkillsResponse { skills }))
}

/// The default applies only when the form field was absent or an empty
/// string; a present-but-blank description is kept and scores as
/// degenerate input.
fn effective_job_description(provided: String) -> String {
    if provided.is_empty() {
        DEFAULT_JOB_DESCRIPTION.to_string()
    } else {
        provided
    }
}

// ──────────────────────────── Tests ────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_job_description_gets_default() {
        assert_eq!(
            effective_job_description(String::new()),
            DEFAULT_JOB_DESCRIPTION
        );
    }

    #[test]
    fn test_whitespace_job_description_is_kept() {
        assert_eq!(effective_job_description("   ".to_string()), "   ");
    }

    #[test]
    fn test_real_job_description_is_kept() {
        let provided = "Rust engineer with axum experience".to_string();
        assert_eq!(effective_job_description(provided.clone()), provided);
    }
}
