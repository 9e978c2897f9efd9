use std::time::Duration;

use thiserror::Error;

use crate::config::RetryConfig;

/// Failure of a single completion call against the external provider.
///
/// Variants are classified as transient (worth retrying) or permanent
/// (propagate immediately). Classification follows the HTTP status or
/// transport condition that produced the error, never message guessing.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("malformed provider response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_)
        )
    }

    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Delay to wait before the next attempt. Rate limits honor the
    /// server-provided interval when one was parsed from the response.
    pub fn suggested_delay(&self, config: &RetryConfig) -> Duration {
        match self {
            Self::RateLimited { retry_after_secs } => {
                Duration::from_secs(retry_after_secs.unwrap_or(config.rate_limit_delay_secs))
            }
            Self::Network(_) => Duration::from_secs(config.network_delay_secs),
            Self::Timeout(_) => Duration::from_secs(config.timeout_delay_secs),
            _ => Duration::from_secs(0),
        }
    }
}

#[derive(Debug, Error)]
pub enum LecternError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("completion provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("structure parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LecternError>;
