//! Semantic similarity via a sentence-embedding model (Hugging Face feature extraction).
//!
//! Requests go to the explicit feature-extraction pipeline route. The bare
//! `/models/{model}` route serves a sentence-transformers model's default
//! sentence-similarity task, which does not return vectors.
//!
//! Both texts are embedded in one request with the same model; cosine similarity
//! is computed locally and reported as a percentage clamped to [0, 100].

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::analysis::providers::{ServiceError, SimilarityProvider};
use crate::analysis::scoring::round2;
use crate::llm_client::{error_for_status, send_with_retry, RetryPolicy};

const SERVICE: &str = "huggingface-embeddings";

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    inputs: [&'a str; 2],
    options: EmbeddingOptions,
}

#[derive(Debug, Serialize)]
struct EmbeddingOptions {
    wait_for_model: bool,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    model: String,
    retry: RetryPolicy,
}

impl EmbeddingClient {
    pub fn new(api_url: String, token: Option<String>, model: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            model,
            retry: RetryPolicy::default(),
        })
    }

    async fn embed_pair(&self, first: &str, second: &str) -> Result<Vec<Vec<f32>>, ServiceError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ServiceError::MissingCredentials { service: SERVICE })?;

        let url = feature_extraction_url(&self.api_url, &self.model);
        let payload = EmbeddingRequest {
            inputs: [first, second],
            options: EmbeddingOptions {
                wait_for_model: true,
            },
        };

        let response = send_with_retry(SERVICE, &self.retry, || {
            self.client.post(&url).bearer_auth(token).json(&payload)
        })
        .await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ServiceError::Transient {
            service: SERVICE,
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(error_for_status(SERVICE, status, body));
        }

        serde_json::from_str::<Vec<Vec<f32>>>(&body).map_err(|e| {
            ServiceError::UnexpectedResponse {
                service: SERVICE,
                message: format!("expected two embedding vectors: {e}"),
            }
        })
    }
}

#[async_trait]
impl SimilarityProvider for EmbeddingClient {
    async fn similarity(&self, resume: &str, jd: &str) -> Result<f64, ServiceError> {
        let vectors = self.embed_pair(resume, jd).await?;
        let [resume_vec, jd_vec] = vectors.as_slice() else {
            return Err(ServiceError::UnexpectedResponse {
                service: SERVICE,
                message: format!("expected 2 vectors, got {}", vectors.len()),
            });
        };

        let cosine = cosine_similarity(resume_vec, jd_vec).ok_or_else(|| {
            ServiceError::UnexpectedResponse {
                service: SERVICE,
                message: "embedding vectors are empty, zero or of different length".to_string(),
            }
        })?;

        let score = similarity_percent(cosine);
        debug!("Embedding dim {}, cosine {:.4}, similarity {}", resume_vec.len(), cosine, score);
        Ok(score)
    }
}

fn feature_extraction_url(api_url: &str, model: &str) -> String {
    format!("{api_url}/pipeline/feature-extraction/{model}")
}

/// Cosine similarity of two equal-length, non-zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Cosine → percentage with two decimals, negatives clamped to 0.
pub fn similarity_percent(cosine: f64) -> f64 {
    round2(cosine * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::http::HeaderMap;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    use crate::llm_client::test_support::{fast_retry, spawn_stub};

    /// Authorization header and JSON body of the last request a stub received.
    type Captured = Arc<Mutex<Option<(String, Value)>>>;

    async fn embedding_stub(path: &str, status: u16, reply: Value, captured: Captured) -> String {
        let router = Router::new().route(
            path,
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *captured.lock().unwrap() = Some((auth, body));
                    (axum::http::StatusCode::from_u16(status).unwrap(), Json(reply))
                }
            }),
        );
        spawn_stub(router).await
    }

    fn client_for(base: String) -> EmbeddingClient {
        let mut client = EmbeddingClient::new(
            base,
            Some("hf-test-token".to_string()),
            DEFAULT_EMBEDDING_MODEL.to_string(),
        )
        .unwrap();
        client.retry = fast_retry();
        client
    }

    #[test]
    fn test_identical_vectors_are_fully_similar() {
        let v = [0.3_f32, -0.2, 0.9];
        let cos = cosine_similarity(&v, &v).unwrap();
        assert_eq!(similarity_percent(cos), 100.0);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let cos = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert_eq!(similarity_percent(cos), 0.0);
    }

    #[test]
    fn test_negative_cosine_clamped_to_zero() {
        let cos = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!(cos < 0.0);
        assert_eq!(similarity_percent(cos), 0.0);
    }

    #[test]
    fn test_percent_rounded_to_two_decimals() {
        assert_eq!(similarity_percent(0.734_567), 73.46);
    }

    #[test]
    fn test_degenerate_vectors_rejected() {
        assert!(cosine_similarity(&[], &[]).is_none());
        assert!(cosine_similarity(&[1.0, 2.0], &[1.0]).is_none());
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).is_none());
    }

    #[test]
    fn test_request_shape() {
        let payload = EmbeddingRequest {
            inputs: ["resume", "jd"],
            options: EmbeddingOptions {
                wait_for_model: true,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["inputs"][1], "jd");
        assert_eq!(json["options"]["wait_for_model"], true);
    }

    #[tokio::test]
    async fn test_missing_token_reports_missing_credentials() {
        let client = EmbeddingClient::new(
            "https://api-inference.huggingface.co".to_string(),
            None,
            DEFAULT_EMBEDDING_MODEL.to_string(),
        )
        .unwrap();
        let err = client.similarity("resume", "jd").await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingCredentials { .. }));
    }

    #[test]
    fn test_url_targets_feature_extraction_pipeline() {
        assert_eq!(
            feature_extraction_url("https://api-inference.huggingface.co", DEFAULT_EMBEDDING_MODEL),
            "https://api-inference.huggingface.co/pipeline/feature-extraction/\
             sentence-transformers/all-MiniLM-L6-v2"
        );
    }

    #[tokio::test]
    async fn test_similarity_posts_both_texts_to_feature_extraction() {
        let captured = Captured::default();
        let base = embedding_stub(
            "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2",
            200,
            json!([[1.0, 0.0], [0.6, 0.8]]),
            captured.clone(),
        )
        .await;

        let score = client_for(base).similarity("my resume", "the jd").await.unwrap();
        assert_eq!(score, 60.0);

        let (auth, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer hf-test-token");
        assert_eq!(body["inputs"], json!(["my resume", "the jd"]));
        assert_eq!(body["options"]["wait_for_model"], true);
    }

    #[tokio::test]
    async fn test_single_vector_is_unexpected_response() {
        let base = embedding_stub(
            "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2",
            200,
            json!([[1.0, 0.0]]),
            Captured::default(),
        )
        .await;

        let err = client_for(base).similarity("a", "b").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn test_bad_request_is_api_error() {
        let base = embedding_stub(
            "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2",
            400,
            json!({"error": "bad inputs"}),
            Captured::default(),
        )
        .await;

        let err = client_for(base).similarity("a", "b").await.unwrap_err();
        assert!(matches!(err, ServiceError::Api { status: 400, .. }));
    }
}
