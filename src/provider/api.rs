use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::{debug, info};

use super::{CompletionProvider, Message, context_limit_for, safe_output_ceiling};
use crate::config::ProviderConfig;
use crate::error::{LecternError, ProviderError};
use crate::utils::estimate_tokens;

/// Hosted completion backend speaking the OpenAI-compatible chat protocol.
///
/// The credential is resolved from the environment at construction; a
/// missing credential is a configuration error here, never a call-time
/// surprise.
#[derive(Debug)]
pub struct ApiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    context_limit: u32,
    request_timeout_secs: u64,
}

impl ApiProvider {
    pub fn from_env(config: &ProviderConfig) -> crate::error::Result<Self> {
        let var = config.backend.credential_var();
        let api_key = std::env::var(var)
            .map_err(|_| LecternError::Config(format!("{var} not found in environment")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LecternError::Config(format!("HTTP client init failed: {e}")))?;

        let context_limit = config
            .custom_context_limit
            .unwrap_or_else(|| context_limit_for(&config.model));

        info!(
            model = %config.model,
            backend = ?config.backend,
            context_limit,
            "initialized completion provider"
        );

        Ok(Self {
            client,
            base_url: config.backend.base_url().to_string(),
            api_key,
            model: config.model.clone(),
            context_limit,
            request_timeout_secs: config.request_timeout_secs,
        })
    }

    fn classify_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
        if status.as_u16() == 429 {
            return ProviderError::RateLimited {
                retry_after_secs: extract_retry_after(body),
            };
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return ProviderError::Auth(snippet(body));
        }
        if status.is_server_error() {
            return ProviderError::Network(format!("{status}: {}", snippet(body)));
        }
        ProviderError::Other(format!("{status}: {}", snippet(body)))
    }

    fn classify_transport(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.request_timeout_secs)
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for ApiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, ProviderError> {
        let prompt_tokens: usize = messages.iter().map(|m| estimate_tokens(&m.content)).sum();
        let ceiling = safe_output_ceiling(self.context_limit, prompt_tokens as u32);
        let max_tokens = max_output_tokens.min(ceiling);

        debug!(
            prompt_tokens,
            max_tokens,
            requested = max_output_tokens,
            "dispatching completion request"
        );

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| ProviderError::InvalidResponse("response contained no choices".into()))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Look for a "retry after N" hint in an error body.
fn extract_retry_after(body: &str) -> Option<u64> {
    let lower = body.to_lowercase();
    for pattern in ["retry after ", "retry-after: ", "retry_after="] {
        if let Some(idx) = lower.find(pattern) {
            let digits: String = lower[idx + pattern.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(secs) = digits.parse() {
                return Some(secs);
            }
        }
    }
    None
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
