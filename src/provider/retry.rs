use tracing::warn;

use super::{CompletionProvider, Message};
use crate::config::RetryConfig;
use crate::error::ProviderError;

/// Drive a completion call with retry-with-backoff on transient failures.
///
/// Permanent failures (auth, malformed responses) surface immediately.
/// The delay grows linearly with the attempt number; rate limits honor
/// the server-provided interval instead.
pub async fn complete_with_retry<P: CompletionProvider>(
    provider: &P,
    messages: &[Message],
    temperature: f32,
    max_output_tokens: u32,
    policy: &RetryConfig,
) -> Result<String, ProviderError> {
    let mut attempt: u32 = 0;
    loop {
        match provider
            .complete(messages, temperature, max_output_tokens)
            .await
        {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = e.suggested_delay(policy) * attempt;
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "transient provider error, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
