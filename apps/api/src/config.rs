use anyhow::{Context, Result};

use crate::analysis::scoring::{ScoringPolicy, MISSING_KEYWORD_PENALTY};
use crate::llm_client::embeddings::DEFAULT_EMBEDDING_MODEL;

const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com";
const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 180;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing. Model-service credentials
/// are optional: a missing one surfaces when that service is first called.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub hf_api_url: String,
    pub hf_token: Option<String>,
    pub embedding_model: String,
    pub groq_api_url: String,
    pub groq_api_key: Option<String>,
    pub analysis_timeout_secs: u64,
    /// Points deducted per missing JD keyword.
    pub missing_keyword_penalty: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            hf_api_url: env_or("HF_API_URL", DEFAULT_HF_API_URL),
            hf_token: optional_env("HUGGINGFACEHUB_API_TOKEN"),
            embedding_model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            groq_api_url: env_or("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            groq_api_key: optional_env("GROQ_API_KEY"),
            analysis_timeout_secs: match std::env::var("ANALYSIS_TIMEOUT_SECS") {
                Ok(v) => v
                    .parse::<u64>()
                    .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
                Err(_) => DEFAULT_ANALYSIS_TIMEOUT_SECS,
            },
            missing_keyword_penalty: match optional_env("MISSING_KEYWORD_PENALTY") {
                Some(v) => v
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .context("MISSING_KEYWORD_PENALTY must be a non-negative number")?,
                None => MISSING_KEYWORD_PENALTY,
            },
        })
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            missing_keyword_penalty: self.missing_keyword_penalty,
            ..ScoringPolicy::default()
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::SCORE_FLOOR;

    #[test]
    fn test_scoring_policy_uses_configured_penalty() {
        let config = Config {
            database_url: "postgres://localhost/resume_match".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            hf_api_url: DEFAULT_HF_API_URL.to_string(),
            hf_token: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            groq_api_key: None,
            analysis_timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
            missing_keyword_penalty: 2.0,
        };
        let policy = config.scoring_policy();
        assert_eq!(policy.missing_keyword_penalty, 2.0);
        assert_eq!(policy.floor, SCORE_FLOOR);
        assert_eq!(policy.score_count(80.0, 3), 74.0);
    }
}
