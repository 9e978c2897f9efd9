use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{LecternError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LecternConfig {
    pub provider: ProviderConfig,
    pub budget: BudgetConfig,
    pub planner: PlannerConfig,
    pub generation: GenerationConfig,
    pub retry: RetryConfig,
    pub validation: ValidationConfig,
}

impl LecternConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| LecternError::Config(e.to_string()))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Validate configuration values for consistency.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.provider.model.is_empty() {
            errors.push("provider model must not be empty");
        }
        if self.provider.request_timeout_secs == 0 {
            errors.push("provider request_timeout_secs must be greater than 0");
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            errors.push("provider temperature must be between 0.0 and 2.0");
        }

        if self.budget.words_per_minute == 0 {
            errors.push("budget words_per_minute must be greater than 0");
        }
        let share_sum = self.budget.intro_share
            + self.budget.main_share
            + self.budget.practical_share
            + self.budget.summary_share;
        if (share_sum - 1.0).abs() > 0.001 {
            errors.push("budget section shares must sum to 1.0");
        }

        if self.planner.structured_excerpt_chars == 0 {
            errors.push("planner structured_excerpt_chars must be greater than 0");
        }
        if self.planner.structured_max_tokens == 0 || self.planner.fallback_max_tokens == 0 {
            errors.push("planner max token budgets must be greater than 0");
        }

        if self.generation.max_output_tokens == 0 {
            errors.push("generation max_output_tokens must be greater than 0");
        }
        if self.generation.narrative_tail_chars == 0 {
            errors.push("generation narrative_tail_chars must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.validation.large_deviation_threshold) {
            errors.push("validation large_deviation_threshold must be between 0.0 and 1.0");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LecternError::Config(errors.join("; ")))
        }
    }
}

/// Hosted completion API surface to talk to. Both speak the
/// OpenAI-compatible chat completions protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiBackend {
    Openai,
    Gemini,
}

impl ApiBackend {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Openai => "https://api.openai.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    /// Environment variable holding the credential for this backend.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Self::Openai => "OPENAI_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub backend: ApiBackend,
    pub model: String,
    pub temperature: f32,
    /// Overrides the built-in context limit table for models not listed there.
    pub custom_context_limit: Option<u32>,
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: ApiBackend::Openai,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            custom_context_limit: None,
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub words_per_minute: u32,
    pub intro_share: f64,
    pub main_share: f64,
    pub practical_share: f64,
    pub summary_share: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 130,
            intro_share: 0.10,
            main_share: 0.70,
            practical_share: 0.15,
            summary_share: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Leading slice of the cleaned input shown to the structured tier.
    pub structured_excerpt_chars: usize,
    /// Leading slice shown to the line-oriented fallback tier.
    pub fallback_excerpt_chars: usize,
    pub structured_max_tokens: u32,
    pub fallback_max_tokens: u32,
    pub temperature: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            structured_excerpt_chars: 2000,
            fallback_excerpt_chars: 1000,
            structured_max_tokens: 2000,
            fallback_max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Trailing slice of generated text carried forward as the continuity cue.
    pub narrative_tail_chars: usize,
    /// Shorter tail used between the practical section and the summary.
    pub summary_tail_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 8000,
            temperature: 0.7,
            narrative_tail_chars: 1000,
            summary_tail_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub rate_limit_delay_secs: u64,
    pub network_delay_secs: u64,
    pub timeout_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            rate_limit_delay_secs: 20,
            network_delay_secs: 5,
            timeout_delay_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Deviation above which a word-count miss logs at error severity.
    pub large_deviation_threshold: f64,
    /// Key terms appearing fewer times than this draw a coherence warning.
    pub min_term_occurrences: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            large_deviation_threshold: 0.20,
            min_term_occurrences: 2,
        }
    }
}
