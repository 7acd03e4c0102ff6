//! Postgres access for candidates, resumes and jobs.
//!
//! Analysis results are not stored; callers get them back in the HTTP response.

use sqlx::PgPool;

use crate::models::{CandidateRow, JobRow, ResumeRow};

pub async fn create_candidate(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<CandidateRow, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates (name, email, phone)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .fetch_one(pool)
    .await
}

pub async fn create_resume(
    pool: &PgPool,
    candidate_id: i64,
    full_text: &str,
) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "INSERT INTO resumes (candidate_id, full_text) VALUES ($1, $2) RETURNING *",
    )
    .bind(candidate_id)
    .bind(full_text)
    .fetch_one(pool)
    .await
}

pub async fn create_job(
    pool: &PgPool,
    title: &str,
    description: &str,
) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "INSERT INTO jobs (title, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn get_resume(pool: &PgPool, id: i64) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_job(pool: &PgPool, id: i64) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn candidate_exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM candidates WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}
