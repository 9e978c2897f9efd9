use std::collections::BTreeSet;

use crate::structure::{LectureStructure, Topic};

/// Rolling state threaded through section generations to keep later
/// sections coherent with earlier ones.
///
/// Transitions consume the snapshot and return the updated one, so the
/// data-flow dependency between generation steps stays explicit. One
/// context belongs to exactly one in-flight transformation.
#[derive(Debug, Clone)]
pub struct NarrativeContext {
    pub current_section: String,
    pub covered_topics: Vec<String>,
    pub pending_topics: Vec<String>,
    pub key_terms: BTreeSet<String>,
    pub current_narrative: String,
    pub learning_objectives: Vec<String>,
}

impl NarrativeContext {
    /// Seed from a freshly planned structure and the introduction's tail.
    pub fn seed(structure: &LectureStructure, intro_tail: &str) -> Self {
        Self {
            current_section: "introduction".to_string(),
            covered_topics: Vec::new(),
            pending_topics: structure.topics.iter().map(|t| t.title.clone()).collect(),
            key_terms: BTreeSet::new(),
            current_narrative: intro_tail.to_string(),
            learning_objectives: structure.learning_objectives.clone(),
        }
    }

    /// Move a topic from pending to covered and absorb its key concepts.
    ///
    /// Pending topics are seeded from the same structure the topic loop
    /// iterates, so the topic is always present; a miss would mean the
    /// loop and the seed disagree on the structure.
    pub fn begin_topic(mut self, topic: &Topic) -> Self {
        let position = self.pending_topics.iter().position(|t| t == &topic.title);
        debug_assert!(position.is_some(), "topic not in pending list: {}", topic.title);
        if let Some(idx) = position {
            self.pending_topics.remove(idx);
        }
        self.covered_topics.push(topic.title.clone());
        self.key_terms.extend(topic.key_concepts.iter().cloned());
        self
    }

    /// Replace the trailing narrative cue after a generation completes.
    pub fn with_narrative(mut self, tail: &str) -> Self {
        self.current_narrative = tail.to_string();
        self
    }

    /// Advance to the next section label with a fresh narrative tail.
    pub fn advance_section(mut self, label: &str, tail: &str) -> Self {
        self.current_section = label.to_string();
        self.current_narrative = tail.to_string();
        self
    }
}
