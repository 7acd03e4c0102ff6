use std::time::{Duration, Instant};

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::pipeline::AnalysisResult;
use crate::errors::AppError;
use crate::extract::extract_text_blocking;
use crate::records::store;
use crate::routes::upload::UploadForm;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeStoredRequest {
    pub resume_id: i64,
    pub job_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
    pub job_id: Option<i64>,
    pub candidate_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub job_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub job_fit_analysis: JobFitAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFitAnalysis {
    pub match_score: f64,
    pub semantic_similarity: f64,
    /// Sorted so identical inputs serialize identically.
    pub missing_keywords: Vec<String>,
    pub recruiter_summary: String,
    pub resume_improvements: ResumeImprovements,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeImprovements {
    pub actionable_advice: String,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        let missing_keywords = result.sorted_missing_keywords();
        AnalysisResponse {
            job_id: result.job_id,
            candidate_id: result.candidate_id,
            job_fit_analysis: JobFitAnalysis {
                match_score: result.final_score,
                semantic_similarity: result.similarity,
                missing_keywords,
                recruiter_summary: result.rewritten_resume,
                resume_improvements: ResumeImprovements {
                    actionable_advice: result.suggestions,
                },
            },
        }
    }
}

/// POST /api/v1/analyze
/// Analyzes a stored resume against a stored job.
pub async fn handle_analyze_stored(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeStoredRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let resume = store::get_resume(&state.db, req.resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {}", req.resume_id)))?;
    let job = store::get_job(&state.db, req.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", req.job_id)))?;

    let result = run_analysis(
        &state,
        &resume.full_text,
        &job.description,
        Some(job.id),
        Some(resume.candidate_id),
    )
    .await?;
    Ok(Json(result.into()))
}

/// POST /api/v1/analyze/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let result = run_analysis(
        &state,
        &req.resume_text,
        &req.job_description,
        req.job_id,
        req.candidate_id,
    )
    .await?;
    Ok(Json(result.into()))
}

/// POST /api/v1/analyze/upload
/// Multipart: a resume `file`, `job_description`, and optional `job_id` / `candidate_id`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let job_id = form.optional_id("job_id")?;
    let candidate_id = form.optional_id("candidate_id")?;
    let job_description = form.text("job_description").unwrap_or_default().to_string();
    let file = form.require_file()?;

    // An unreadable document yields empty text, which the pipeline rejects as input.
    let resume_text = extract_text_blocking(file.file_name, file.bytes).await?;

    let result = run_analysis(&state, &resume_text, &job_description, job_id, candidate_id).await?;
    Ok(Json(result.into()))
}

/// Runs the pipeline under the configured deadline.
async fn run_analysis(
    state: &AppState,
    resume_text: &str,
    jd_text: &str,
    job_id: Option<i64>,
    candidate_id: Option<i64>,
) -> Result<AnalysisResult, AppError> {
    let secs = state.config.analysis_timeout_secs;
    let started = Instant::now();

    let result = tokio::time::timeout(
        Duration::from_secs(secs),
        state
            .pipeline
            .analyze(resume_text, jd_text, job_id, candidate_id),
    )
    .await
    .map_err(|_| AppError::Timeout(secs))??;

    info!(
        "Analysis done in {}ms: score={} similarity={} missing={}",
        started.elapsed().as_millis(),
        result.final_score,
        result.similarity,
        result.missing_keywords.len()
    );
    Ok(result)
}
