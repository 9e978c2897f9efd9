//! Completion provider abstraction and the hosted API backend.

mod api;
mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ProviderError;

pub use api::ApiProvider;
pub use retry::complete_with_retry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// External text-generation capability.
///
/// Implementations are blocking round-trips from the pipeline's point of
/// view; any timeout policy lives inside the implementation.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for Arc<P> {
    async fn complete(
        &self,
        messages: &[Message],
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, ProviderError> {
        (**self).complete(messages, temperature, max_output_tokens).await
    }
}

/// Context window sizes for known models, in tokens.
/// Unknown models fall back to a conservative 4096.
pub fn context_limit_for(model: &str) -> u32 {
    match model {
        "gpt-3.5-turbo" => 4096,
        "gpt-4" => 8192,
        "gpt-4-turbo" => 128_000,
        "gpt-4o-mini" => 8192,
        "gemini-pro" => 32_768,
        "gemini-2.0-flash-exp" => 128_000,
        _ => 4096,
    }
}

/// Largest output-token budget that safely fits the remaining context.
///
/// Reserves 10% of the headroom and clamps the result to [100, 8000].
pub fn safe_output_ceiling(context_limit: u32, prompt_tokens: u32) -> u32 {
    let available = context_limit.saturating_sub(prompt_tokens);
    ((available as f64 * 0.9) as u32).clamp(100, 8000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_limit_known_models() {
        assert_eq!(context_limit_for("gpt-4"), 8192);
        assert_eq!(context_limit_for("gemini-pro"), 32_768);
    }

    #[test]
    fn test_context_limit_unknown_model_defaults() {
        assert_eq!(context_limit_for("some-custom-model"), 4096);
    }

    #[test]
    fn test_safe_ceiling_reserves_headroom() {
        // 4096 - 1000 = 3096 available, 90% = 2786
        assert_eq!(safe_output_ceiling(4096, 1000), 2786);
    }

    #[test]
    fn test_safe_ceiling_clamps_low() {
        assert_eq!(safe_output_ceiling(4096, 4090), 100);
        // Prompt larger than the window must not underflow
        assert_eq!(safe_output_ceiling(4096, 10_000), 100);
    }

    #[test]
    fn test_safe_ceiling_clamps_high() {
        assert_eq!(safe_output_ceiling(128_000, 1000), 8000);
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::system("hi")).unwrap();
        assert!(json.contains(r#""role":"system""#));
    }
}
