use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Planned outline of a lecture. Produced once per transformation and
/// treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LectureStructure {
    pub title: String,
    pub learning_objectives: Vec<String>,
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub practical_applications: Vec<String>,
    #[serde(default)]
    pub key_terms: BTreeSet<String>,
}

/// One thematic unit within the main content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Topic {
    pub title: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub subtopics: Vec<String>,
    pub duration_minutes: u32,
    /// 1-based indices into `learning_objectives`. Not validated against
    /// the objective count; dangling links are tolerated.
    #[serde(default)]
    pub objective_links: Vec<u32>,
}

impl LectureStructure {
    pub fn topic_titles(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.title.as_str()).collect()
    }

    pub fn total_topic_duration(&self) -> u32 {
        self.topics.iter().map(|t| t.duration_minutes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_structure() {
        let json = r#"{
            "title": "Distributed Consensus",
            "learning_objectives": ["Understand quorums", "Apply leader election"],
            "topics": [
                {
                    "title": "Quorums",
                    "key_concepts": ["majority", "overlap"],
                    "subtopics": ["Reads", "Writes"],
                    "duration_minutes": 10,
                    "objective_links": [1]
                }
            ],
            "practical_applications": ["Design a replicated log"],
            "key_terms": ["quorum", "epoch"]
        }"#;
        let structure: LectureStructure = serde_json::from_str(json).unwrap();
        assert_eq!(structure.title, "Distributed Consensus");
        assert_eq!(structure.topic_titles(), vec!["Quorums"]);
        assert_eq!(structure.total_topic_duration(), 10);
        assert!(structure.key_terms.contains("epoch"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_optional_fields() {
        let json = r#"{
            "title": "T",
            "learning_objectives": ["O"],
            "topics": [{"title": "A", "duration_minutes": 5}]
        }"#;
        let structure: LectureStructure = serde_json::from_str(json).unwrap();
        assert!(structure.practical_applications.is_empty());
        assert!(structure.topics[0].key_concepts.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_negative_duration() {
        let json = r#"{
            "title": "T",
            "learning_objectives": [],
            "topics": [{"title": "A", "duration_minutes": -3}]
        }"#;
        assert!(serde_json::from_str::<LectureStructure>(json).is_err());
    }

    #[test]
    fn test_key_terms_deduplicate() {
        let json = r#"{
            "title": "T",
            "learning_objectives": [],
            "topics": [{"title": "A", "duration_minutes": 1}],
            "key_terms": ["raft", "raft", "paxos"]
        }"#;
        let structure: LectureStructure = serde_json::from_str(json).unwrap();
        assert_eq!(structure.key_terms.len(), 2);
    }
}
