//! Collaborator contracts consumed by the analysis pipeline.
//!
//! Concrete HTTP-backed implementations live in `llm_client`; tests swap in fakes.
//! `AppState` carries each as an `Arc<dyn ...>`, built once at startup.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by an external collaborator.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No credential configured for the service.
    #[error("{service}: credentials not configured")]
    MissingCredentials { service: &'static str },

    /// Credentials rejected (401/403). Not retried.
    #[error("{service}: authentication failed (status {status}): {message}")]
    Authentication {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Rate limit, model loading, transport failure or exhausted fallback chain.
    #[error("{service}: temporarily unavailable: {message}")]
    Transient {
        service: &'static str,
        message: String,
    },

    /// Success status, but the payload did not have the expected shape.
    #[error("{service}: unexpected response: {message}")]
    UnexpectedResponse {
        service: &'static str,
        message: String,
    },

    /// Any other non-success status.
    #[error("{service}: API error (status {status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },
}

impl ServiceError {
    pub fn service(&self) -> &'static str {
        match self {
            ServiceError::MissingCredentials { service }
            | ServiceError::Authentication { service, .. }
            | ServiceError::Transient { service, .. }
            | ServiceError::UnexpectedResponse { service, .. }
            | ServiceError::Api { service, .. } => service,
        }
    }
}

/// Semantic closeness of a resume to a job description, as a percentage in [0, 100].
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    async fn similarity(&self, resume: &str, jd: &str) -> Result<f64, ServiceError>;
}

/// Free-text improvement advice for a resume against a job description.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, resume: &str, jd: &str) -> Result<String, ServiceError>;
}

/// A rewritten, job-targeted version of the resume.
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    async fn rewrite(&self, resume: &str, jd: &str) -> Result<String, ServiceError>;
}
