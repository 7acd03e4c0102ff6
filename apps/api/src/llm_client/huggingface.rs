//! Hugging Face Inference API: text2text generation for resume suggestions.
//!
//! Walks a fallback chain of public models. A model that is missing (404),
//! still loading / rate limited after retries, or answers with an unexpected
//! payload is skipped; rejected credentials stop the chain immediately.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::providers::{ServiceError, SuggestionProvider};
use crate::llm_client::prompts::{render, SUGGESTION_PROMPT_TEMPLATE};
use crate::llm_client::{send_with_retry, truncate_chars, RetryPolicy, MAX_PROMPT_CHARS};

const SERVICE: &str = "huggingface-inference";

/// Tried in order.
pub const MODEL_CANDIDATES: &[&str] = &["google/flan-t5-base", "google/flan-t5-small"];
const MAX_NEW_TOKENS: u32 = 180;
const TEMPERATURE: f32 = 0.5;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    models: Vec<String>,
    retry: RetryPolicy,
}

impl HuggingFaceClient {
    pub fn new(api_url: String, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            models: MODEL_CANDIDATES.iter().map(|m| m.to_string()).collect(),
            retry: RetryPolicy::default(),
        })
    }

    /// Generates text for `prompt`, walking the model fallback chain.
    pub async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ServiceError::MissingCredentials { service: SERVICE })?;

        let payload = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                return_full_text: false,
            },
        };

        let mut failures: Vec<String> = Vec::new();

        for model in &self.models {
            let url = format!("{}/models/{}", self.api_url, model);
            debug!("Calling {} ({} prompt chars)", url, prompt.chars().count());

            let response = match send_with_retry(SERVICE, &self.retry, || {
                self.client.post(&url).bearer_auth(token).json(&payload)
            })
            .await
            {
                Ok(r) => r,
                Err(e) => {
                    failures.push(format!("{model}: {e}"));
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            match status {
                StatusCode::OK => match parse_generated_text(&body) {
                    Some(text) => {
                        info!("Suggestions generated by {}", model);
                        return Ok(text);
                    }
                    None => {
                        warn!("{} returned an unexpected payload", model);
                        failures.push(format!(
                            "{model}: unexpected payload {}",
                            body.chars().take(160).collect::<String>()
                        ));
                    }
                },
                StatusCode::NOT_FOUND => failures.push(format!("{model}: 404 (model not found)")),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(ServiceError::Authentication {
                        service: SERVICE,
                        status: status.as_u16(),
                        message: body.chars().take(200).collect(),
                    });
                }
                other => failures.push(format!(
                    "{model}: {other} {}",
                    body.chars().take(160).collect::<String>()
                )),
            }
        }

        Err(ServiceError::Transient {
            service: SERVICE,
            message: format!("fallback chain exhausted: {}", failures.join(" | ")),
        })
    }
}

#[async_trait]
impl SuggestionProvider for HuggingFaceClient {
    async fn suggest(&self, resume: &str, jd: &str) -> Result<String, ServiceError> {
        let prompt = render(
            SUGGESTION_PROMPT_TEMPLATE,
            truncate_chars(resume, MAX_PROMPT_CHARS),
            truncate_chars(jd, MAX_PROMPT_CHARS),
        );
        self.generate(&prompt).await
    }
}

/// Extracts `generated_text` from either `[{"generated_text": ...}]` or
/// `{"generated_text": ...}`. A null text counts as empty.
fn parse_generated_text(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = match &value {
        Value::Array(items) => items.first().filter(|v| v.is_object())?,
        Value::Object(map) if map.contains_key("generated_text") => &value,
        _ => return None,
    };
    let text = object
        .get("generated_text")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(text.trim().to_string())
}
