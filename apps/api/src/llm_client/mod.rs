/// Model-service clients: the single point of entry for every outbound
/// embedding and text-generation call.
///
/// No other module may call Hugging Face or Groq directly. Each client implements
/// one of the collaborator traits in `analysis::providers`, so the pipeline never
/// depends on a concrete HTTP API.
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::warn;

use crate::analysis::providers::ServiceError;

pub mod embeddings;
pub mod groq;
pub mod huggingface;
pub mod prompts;

pub use embeddings::EmbeddingClient;
pub use groq::GroqClient;
pub use huggingface::HuggingFaceClient;

/// Upstream generation services cap prompt size; inputs are cut to this many chars.
pub const MAX_PROMPT_CHARS: usize = 4000;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry with exponential backoff for rate-limit / model-loading responses.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay before `attempt` (0-based): none for the first, then 1x, 2x, 4x base.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            Duration::ZERO
        } else {
            self.base_delay * (1 << (attempt - 1))
        }
    }
}

/// 429 and 5xx (including 503 "model loading") are worth another attempt.
pub fn is_retriable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Maps a final non-success status to a `ServiceError`.
pub fn error_for_status(service: &'static str, status: StatusCode, body: String) -> ServiceError {
    let message = snippet(&body);
    match status.as_u16() {
        401 | 403 => ServiceError::Authentication {
            service,
            status: status.as_u16(),
            message,
        },
        _ if is_retriable(status) => ServiceError::Transient {
            service,
            message: format!("status {status}: {message}"),
        },
        code => ServiceError::Api {
            service,
            status: code,
            message,
        },
    }
}

/// Sends the request built by `build`, retrying transport failures and retriable
/// statuses. Any other response (success or not) is returned to the caller.
pub(crate) async fn send_with_retry<F>(
    service: &'static str,
    policy: &RetryPolicy,
    build: F,
) -> Result<Response, ServiceError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error = String::from("no attempt made");

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.delay_before(attempt);
            warn!(
                "{} attempt {} failed, retrying after {}ms...",
                service,
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = format!("request failed: {e}");
                continue;
            }
        };

        let status = response.status();
        if is_retriable(status) {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned {}: {}", service, status, snippet(&body));
            last_error = format!("status {status}: {}", snippet(&body));
            continue;
        }

        return Ok(response);
    }

    Err(ServiceError::Transient {
        service,
        message: format!("{last_error} (after {} attempts)", policy.max_attempts),
    })
}

/// Keeps at most `max_chars` characters of the trimmed input.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Short, log-safe prefix of an upstream response body.
fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
