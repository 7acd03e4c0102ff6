//! Groq chat completions (OpenAI-compatible) for the ATS-friendly resume rewrite.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::providers::{RewriteProvider, ServiceError};
use crate::llm_client::prompts::{render, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM};
use crate::llm_client::{
    error_for_status, send_with_retry, truncate_chars, RetryPolicy, MAX_PROMPT_CHARS,
};

const SERVICE: &str = "groq";
const CHAT_COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

pub const MODEL: &str = "llama-3.1-8b-instant";
const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl GroqClient {
    pub fn new(api_url: String, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            retry: RetryPolicy::default(),
        })
    }

    /// One system + user exchange; returns the trimmed assistant message.
    pub async fn chat(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredentials { service: SERVICE })?;

        let url = format!("{}{}", self.api_url, CHAT_COMPLETIONS_PATH);
        let request = ChatRequest {
            model: MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = send_with_retry(SERVICE, &self.retry, || {
            self.client.post(&url).bearer_auth(api_key).json(&request)
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

        parse_chat_content(&body)
    }
}

#[async_trait]
impl RewriteProvider for GroqClient {
    async fn rewrite(&self, resume: &str, jd: &str) -> Result<String, ServiceError> {
        let prompt = render(
            REWRITE_PROMPT_TEMPLATE,
            truncate_chars(resume, MAX_PROMPT_CHARS),
            truncate_chars(jd, MAX_PROMPT_CHARS),
        );
        info!("Sending resume and JD to Groq for optimization");
        let rewritten = self.chat(REWRITE_SYSTEM, &prompt).await?;
        info!("Received optimized resume from Groq ({} chars)", rewritten.chars().count());
        Ok(rewritten)
    }
}

fn parse_chat_content(body: &str) -> Result<String, ServiceError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::UnexpectedResponse {
            service: SERVICE,
            message: format!("invalid chat completion payload: {e}"),
        })?;

    if let Some(usage) = &response.usage {
        debug!(
            "Groq call succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(ServiceError::UnexpectedResponse {
            service: SERVICE,
            message: "chat completion has no content".to_string(),
        });
    }

    Ok(content)
}
