//! Post-generation quality checks. Advisory only: both validators surface
//! findings through logs and never fail a transformation.

use tracing::{debug, error, warn};

use crate::config::ValidationConfig;
use crate::structure::LectureStructure;

/// How far the assembled transcript landed from its word target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WordCountAssessment {
    WithinRange,
    SlightlyOutside { deviation: f64 },
    FarOutside { deviation: f64 },
}

/// Pure assessment of a realized word count against its budget.
pub fn assess_word_count(
    total_words: usize,
    target_words: usize,
    min_words: usize,
    max_words: usize,
    large_deviation_threshold: f64,
) -> WordCountAssessment {
    if target_words == 0 {
        return WordCountAssessment::WithinRange;
    }

    let deviation = (total_words as f64 - target_words as f64).abs() / target_words as f64;
    if deviation > large_deviation_threshold {
        WordCountAssessment::FarOutside { deviation }
    } else if total_words < min_words || total_words > max_words {
        WordCountAssessment::SlightlyOutside { deviation }
    } else {
        WordCountAssessment::WithinRange
    }
}

/// Log the assessment at the matching severity. Content is accepted
/// regardless of the outcome.
pub fn validate_word_count(
    total_words: usize,
    target_words: usize,
    min_words: usize,
    max_words: usize,
    large_deviation_threshold: f64,
) {
    match assess_word_count(
        total_words,
        target_words,
        min_words,
        max_words,
        large_deviation_threshold,
    ) {
        WordCountAssessment::FarOutside { deviation } => error!(
            total_words,
            min_words,
            max_words,
            deviation_pct = deviation * 100.0,
            "word count significantly outside target range"
        ),
        WordCountAssessment::SlightlyOutside { deviation } => warn!(
            total_words,
            min_words,
            max_words,
            deviation_pct = deviation * 100.0,
            "word count slightly outside target range"
        ),
        WordCountAssessment::WithinRange => {
            debug!(total_words, "word count within target range");
        }
    }
}

/// One coverage shortfall found by the coherence scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoherenceGap {
    /// No token of the objective appears anywhere in the text.
    ObjectiveNotCovered { objective: String },
    /// The key term occurs fewer times than the configured minimum.
    TermUnderused { term: String, occurrences: usize },
    /// None of the topic's key concepts appear in the text.
    TopicConceptsMissing { topic: String },
}

/// Scans an assembled transcript against its planned structure.
///
/// All checks are case-insensitive, independent, and cumulative; one
/// failing check never short-circuits the others.
#[derive(Debug, Clone)]
pub struct CoherenceValidator {
    min_term_occurrences: usize,
}

impl CoherenceValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            min_term_occurrences: config.min_term_occurrences,
        }
    }

    pub fn check(&self, full_text: &str, structure: &LectureStructure) -> Vec<CoherenceGap> {
        let text_lower = full_text.to_lowercase();
        let mut gaps = Vec::new();

        for objective in &structure.learning_objectives {
            let covered = objective
                .split_whitespace()
                .any(|token| text_lower.contains(&token.to_lowercase()));
            if !covered {
                gaps.push(CoherenceGap::ObjectiveNotCovered {
                    objective: objective.clone(),
                });
            }
        }

        for term in &structure.key_terms {
            let occurrences = text_lower.matches(&term.to_lowercase()).count();
            if occurrences < self.min_term_occurrences {
                gaps.push(CoherenceGap::TermUnderused {
                    term: term.clone(),
                    occurrences,
                });
            }
        }

        for topic in &structure.topics {
            let covered = topic
                .key_concepts
                .iter()
                .any(|concept| text_lower.contains(&concept.to_lowercase()));
            if !covered {
                gaps.push(CoherenceGap::TopicConceptsMissing {
                    topic: topic.title.clone(),
                });
            }
        }

        gaps
    }

    /// Run the scan and log one warning per gap.
    pub fn validate(&self, full_text: &str, structure: &LectureStructure) {
        for gap in self.check(full_text, structure) {
            match gap {
                CoherenceGap::ObjectiveNotCovered { objective } => {
                    warn!(%objective, "learning objective not well covered");
                }
                CoherenceGap::TermUnderused { term, occurrences } => {
                    warn!(%term, occurrences, "key term underutilized");
                }
                CoherenceGap::TopicConceptsMissing { topic } => {
                    warn!(%topic, "topic concepts not well covered");
                }
            }
        }
        debug!("coherence validation complete");
    }
}

impl Default for CoherenceValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}
