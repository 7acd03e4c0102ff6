//! Analysis pipeline: orchestrates keyword analysis, similarity, scoring and the
//! two generative calls into one `AnalysisResult`.
//!
//! Flow: validate inputs → join(missing keywords, similarity, suggestions, rewrite)
//!       → score → assemble.
//!
//! Inputs are validated before any collaborator is touched. Similarity and rewrite
//! failures abort the analysis; suggestion failures of a recoverable kind degrade
//! to `FALLBACK_SUGGESTIONS`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::keywords::{missing_keywords, KeywordSet};
use crate::analysis::providers::{
    RewriteProvider, ServiceError, SimilarityProvider, SuggestionProvider,
};
use crate::analysis::scoring::ScoringPolicy;

/// Returned in place of generated suggestions when the suggestion service is
/// unavailable or produces nothing.
pub const FALLBACK_SUGGESTIONS: &str = "- Add role-specific keywords from the JD\n\
    - Quantify achievements with numbers/percentages\n\
    - Improve section headings and bullet clarity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Resume,
    JobDescription,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputField::Resume => f.write_str("resume text"),
            InputField::JobDescription => f.write_str("job description text"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0} is empty or could not be extracted")]
    Input(InputField),

    #[error("similarity stage failed: {0}")]
    Similarity(#[source] ServiceError),

    #[error("suggestion stage failed: {0}")]
    Suggestions(#[source] ServiceError),

    #[error("rewrite stage failed: {0}")]
    Rewrite(#[source] ServiceError),
}

impl AnalysisError {
    /// The collaborator error behind a failed stage, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            AnalysisError::Input(_) => None,
            AnalysisError::Similarity(e)
            | AnalysisError::Suggestions(e)
            | AnalysisError::Rewrite(e) => Some(e),
        }
    }
}

/// Outcome of one analysis. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub job_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub final_score: f64,
    pub similarity: f64,
    pub missing_keywords: KeywordSet,
    pub suggestions: String,
    pub rewritten_resume: String,
}

impl AnalysisResult {
    /// Missing keywords in canonical (sorted) order.
    pub fn sorted_missing_keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = self.missing_keywords.iter().cloned().collect();
        keywords.sort();
        keywords
    }
}

#[derive(Clone)]
pub struct AnalysisPipeline {
    similarity: Arc<dyn SimilarityProvider>,
    suggestions: Arc<dyn SuggestionProvider>,
    rewriter: Arc<dyn RewriteProvider>,
    policy: ScoringPolicy,
}

impl AnalysisPipeline {
    pub fn new(
        similarity: Arc<dyn SimilarityProvider>,
        suggestions: Arc<dyn SuggestionProvider>,
        rewriter: Arc<dyn RewriteProvider>,
    ) -> Self {
        Self {
            similarity,
            suggestions,
            rewriter,
            policy: ScoringPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
        job_id: Option<i64>,
        candidate_id: Option<i64>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::Input(InputField::Resume));
        }
        if jd_text.trim().is_empty() {
            return Err(AnalysisError::Input(InputField::JobDescription));
        }

        info!(
            "Starting analysis (job={:?}, candidate={:?}, resume_chars={}, jd_chars={})",
            job_id,
            candidate_id,
            resume_text.chars().count(),
            jd_text.chars().count()
        );

        let keywords = async { missing_keywords(resume_text, jd_text) };
        let (missing, similarity, suggestions, rewritten) = tokio::join!(
            keywords,
            self.similarity.similarity(resume_text, jd_text),
            self.suggestions.suggest(resume_text, jd_text),
            self.rewriter.rewrite(resume_text, jd_text),
        );

        let similarity = similarity.map_err(AnalysisError::Similarity)?;
        let suggestions = resolve_suggestions(suggestions).map_err(AnalysisError::Suggestions)?;
        let rewritten_resume = rewritten.map_err(AnalysisError::Rewrite)?;

        let final_score = self.policy.score(similarity, &missing);

        info!(
            "Analysis complete: score={}, similarity={}, missing={}",
            final_score,
            similarity,
            missing.len()
        );

        Ok(AnalysisResult {
            job_id,
            candidate_id,
            final_score,
            similarity,
            missing_keywords: missing,
            suggestions,
            rewritten_resume,
        })
    }
}

/// Applies the degraded-suggestion policy: recoverable failures and empty output
/// become `FALLBACK_SUGGESTIONS`; rejected credentials and API errors propagate.
fn resolve_suggestions(outcome: Result<String, ServiceError>) -> Result<String, ServiceError> {
    match outcome {
        Ok(text) if text.trim().is_empty() => {
            warn!("Suggestion service returned empty text, using fallback suggestions");
            Ok(FALLBACK_SUGGESTIONS.to_string())
        }
        Ok(text) => Ok(text),
        Err(
            e @ (ServiceError::Transient { .. }
            | ServiceError::UnexpectedResponse { .. }
            | ServiceError::MissingCredentials { .. }),
        ) => {
            warn!("Suggestion service unavailable ({e}), using fallback suggestions");
            Ok(FALLBACK_SUGGESTIONS.to_string())
        }
        Err(e) => Err(e),
    }
}
