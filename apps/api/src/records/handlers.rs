use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::extract_text_blocking;
use crate::models::{CandidateRow, JobRow, ResumeRow};
use crate::records::store;
use crate::routes::upload::UploadForm;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCandidateRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub candidate_id: i64,
    pub full_text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Json(req): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CandidateRow>), AppError> {
    let name = non_blank("name", &req.name)?;
    let email = non_blank("email", &req.email)?;
    let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let candidate = store::create_candidate(&state.db, name, email, phone)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "A candidate with email '{email}' already exists"
                    ));
                }
            }
            AppError::from(e)
        })?;
    info!("Created candidate {}", candidate.id);
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let full_text = non_blank("full_text", &req.full_text)?;
    let resume = save_resume(&state, req.candidate_id, full_text).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// POST /api/v1/resumes/upload
/// Multipart: `candidate_id` plus a PDF, DOCX or plain-text `file`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let candidate_id = form
        .optional_id("candidate_id")?
        .ok_or_else(|| AppError::Validation("'candidate_id' is required".to_string()))?;
    let file = form.require_file()?;

    let file_name = file.file_name.clone();
    let text = extract_text_blocking(file.file_name, file.bytes).await?;
    if text.is_empty() {
        return Err(AppError::Validation(format!(
            "No text could be extracted from '{file_name}'"
        )));
    }

    let resume = save_resume(&state, candidate_id, &text).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let title = non_blank("title", &req.title)?;
    let description = non_blank("description", &req.description)?;

    let job = store::create_job(&state.db, title, description).await?;
    info!("Created job {}", job.id);
    Ok((StatusCode::CREATED, Json(job)))
}

async fn save_resume(
    state: &AppState,
    candidate_id: i64,
    full_text: &str,
) -> Result<ResumeRow, AppError> {
    if !store::candidate_exists(&state.db, candidate_id).await? {
        return Err(AppError::NotFound(format!("Candidate {candidate_id}")));
    }
    let resume = store::create_resume(&state.db, candidate_id, full_text).await?;
    info!(
        "Stored resume {} for candidate {} ({} chars)",
        resume.id,
        candidate_id,
        full_text.chars().count()
    );
    Ok(resume)
}

/// Trims `value`, rejecting it when nothing is left.
fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("'{field}' must not be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank("name", "  Ada  ").unwrap(), "Ada");
    }

    #[test]
    fn test_non_blank_rejects_whitespace() {
        assert!(matches!(
            non_blank("email", " \n\t"),
            Err(AppError::Validation(msg)) if msg.contains("email")
        ));
    }
}
