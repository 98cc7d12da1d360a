/// LLM client: the single point of entry for completion-endpoint calls.
///
/// ARCHITECTURAL RULE: pipelines depend on the `Completion` trait, never on
/// `reqwest` directly. Transport problems stop here: callers only ever see
/// `Some(text)` or `None`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::AppError;

pub mod prompts;

const PING_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling options forwarded verbatim to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl CompletionOptions {
    /// Settings used for job-description field extraction.
    pub const EXTRACTION: CompletionOptions = CompletionOptions {
        temperature: 0.3,
        top_p: 0.9,
        max_tokens: 3000,
    };

    /// Settings used for interview evaluation, which needs a longer reply.
    pub const EVALUATION: CompletionOptions = CompletionOptions {
        temperature: 0.3,
        top_p: 0.9,
        max_tokens: 4000,
    };
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::EXTRACTION
    }
}

/// A text-completion backend.
///
/// `None` is the explicit "no response" signal: non-success status, network
/// failure, timeout, or an empty reply.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Option<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a CompletionOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP client for an Ollama-style `/api/generate` endpoint.
/// One attempt per call, bounded by the configured timeout; no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    url: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.ollama_url.clone(),
            model: config.model.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single raw call to the endpoint.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.send(prompt, options, None).await
    }

    /// Sends a tiny prompt and reports whether the endpoint answered.
    pub async fn is_reachable(&self) -> bool {
        let options = CompletionOptions {
            max_tokens: 10,
            ..CompletionOptions::EXTRACTION
        };
        match self.send("Hello", &options, Some(PING_TIMEOUT)).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Completion endpoint ping failed: {e}");
                false
            }
        }
    }

    async fn send(
        &self,
        prompt: &str,
        options: &CompletionOptions,
        timeout: Option<Duration>,
    ) -> Result<String, LlmError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!(
            "Completion succeeded: prompt_chars={}, reply_chars={}",
            prompt.len(),
            parsed.response.len()
        );
        Ok(parsed.response)
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Option<String> {
        match self.generate(prompt, options).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Completion call to {} failed: {e}", self.url);
                None
            }
        }
    }
}
