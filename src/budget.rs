//! Word-count budgeting: global target, acceptance band, section quotas.

use serde::{Deserialize, Serialize};

use crate::config::BudgetConfig;
use crate::structure::Topic;

/// Target word counts for a whole lecture and its sections.
///
/// The acceptance band is fixed at 95%-105% of the target; section quotas
/// are floored independently, so their sum may fall slightly short of the
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBudget {
    pub total_target: usize,
    pub min_acceptable: usize,
    pub max_acceptable: usize,
    pub quotas: SectionQuotas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionQuotas {
    pub intro: usize,
    pub main: usize,
    pub practical: usize,
    pub summary: usize,
}

impl SectionQuotas {
    pub fn sum(&self) -> usize {
        self.intro + self.main + self.practical + self.summary
    }
}

/// Converts a target duration into word quotas. Pure and stateless.
#[derive(Debug, Clone)]
pub struct WordBudgetAllocator {
    words_per_minute: u32,
    intro_share: f64,
    main_share: f64,
    practical_share: f64,
    summary_share: f64,
}

impl WordBudgetAllocator {
    pub fn new(config: &BudgetConfig) -> Self {
        Self {
            words_per_minute: config.words_per_minute,
            intro_share: config.intro_share,
            main_share: config.main_share,
            practical_share: config.practical_share,
            summary_share: config.summary_share,
        }
    }

    /// A zero duration degrades to zero quotas rather than an error.
    pub fn allocate(&self, target_duration_minutes: u32) -> WordBudget {
        let total = (self.words_per_minute as u64 * target_duration_minutes as u64) as usize;
        WordBudget {
            total_target: total,
            min_acceptable: total * 95 / 100,
            max_acceptable: (total * 105).div_ceil(100),
            quotas: SectionQuotas {
                intro: floor_share(total, self.intro_share),
                main: floor_share(total, self.main_share),
                practical: floor_share(total, self.practical_share),
                summary: floor_share(total, self.summary_share),
            },
        }
    }
}

impl Default for WordBudgetAllocator {
    fn default() -> Self {
        Self::new(&BudgetConfig::default())
    }
}

fn floor_share(total: usize, share: f64) -> usize {
    (total as f64 * share).floor() as usize
}

/// Split the main-section quota across topics in proportion to their
/// planned durations. A zero total duration (reachable through degenerate
/// fallback outlines) splits equally instead of dividing by zero.
pub fn topic_quotas(main_quota: usize, topics: &[Topic]) -> Vec<usize> {
    if topics.is_empty() {
        return Vec::new();
    }

    let total_duration: u64 = topics.iter().map(|t| t.duration_minutes as u64).sum();
    if total_duration == 0 {
        return vec![main_quota / topics.len(); topics.len()];
    }

    topics
        .iter()
        .map(|t| (main_quota as u64 * t.duration_minutes as u64 / total_duration) as usize)
        .collect()
}
