use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored resume: the plain text extracted from the candidate's upload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub candidate_id: i64,
    pub full_text: String,
    pub created_at: DateTime<Utc>,
}
