use std::collections::BTreeSet;

use schemars::schema_for;
use tracing::{debug, error, info, warn};

use super::{LectureStructure, Topic};
use crate::config::{PlannerConfig, RetryConfig};
use crate::error::{LecternError, Result};
use crate::provider::{CompletionProvider, Message, complete_with_retry};
use crate::utils::excerpt_chars;

/// Plans a lecture outline from cleaned transcript text.
///
/// Never fails outward: a structured-output attempt is followed by a
/// brace-extraction rescue on the same response, then a line-oriented
/// prompt, and finally a hardcoded minimal outline. Every tier
/// transition is logged.
pub struct StructurePlanner<P> {
    provider: P,
    config: PlannerConfig,
    retry: RetryConfig,
}

impl<P: CompletionProvider> StructurePlanner<P> {
    pub fn new(provider: P, config: PlannerConfig, retry: RetryConfig) -> Self {
        Self {
            provider,
            config,
            retry,
        }
    }

    pub async fn plan(&self, text: &str, target_duration_minutes: u32) -> LectureStructure {
        match self.plan_structured(text, target_duration_minutes).await {
            Ok(structure) => {
                info!(
                    title = %structure.title,
                    topics = structure.topics.len(),
                    "structure planned"
                );
                structure
            }
            Err(e) => {
                warn!(error = %e, "structured planning failed, trying line-oriented fallback");
                match self
                    .plan_line_oriented(text, target_duration_minutes)
                    .await
                {
                    Ok(structure) => {
                        info!(topics = structure.topics.len(), "fallback structure planned");
                        structure
                    }
                    Err(e) => {
                        error!(error = %e, "fallback planning failed, using minimal structure");
                        minimal_structure(target_duration_minutes)
                    }
                }
            }
        }
    }

    async fn plan_structured(
        &self,
        text: &str,
        target_duration_minutes: u32,
    ) -> Result<LectureStructure> {
        let prompt = self.structured_prompt(text, target_duration_minutes);
        let messages = [
            Message::system("You are an expert educator. Output ONLY valid JSON, no other text."),
            Message::user(prompt),
        ];

        let raw = complete_with_retry(
            &self.provider,
            &messages,
            self.config.temperature,
            self.config.structured_max_tokens,
            &self.retry,
        )
        .await?;

        parse_structure(&raw)
    }

    async fn plan_line_oriented(
        &self,
        text: &str,
        target_duration_minutes: u32,
    ) -> Result<LectureStructure> {
        let prompt = format!(
            "Analyze this text and provide:\n\
             1. A title (one line)\n\
             2. Three learning objectives (one per line)\n\
             3. Three main topics (one per line)\n\
             4. Three key terms (one per line)\n\n\
             Text: {}",
            excerpt_chars(text, self.config.fallback_excerpt_chars)
        );
        let messages = [
            Message::system(
                "You are an expert educator. Provide concise, line-by-line responses.",
            ),
            Message::user(prompt),
        ];

        let raw = complete_with_retry(
            &self.provider,
            &messages,
            self.config.temperature,
            self.config.fallback_max_tokens,
            &self.retry,
        )
        .await?;

        parse_line_response(&raw, target_duration_minutes)
    }

    fn structured_prompt(&self, text: &str, target_duration_minutes: u32) -> String {
        let schema = serde_json::to_string_pretty(&schema_for!(LectureStructure))
            .unwrap_or_default();
        format!(
            "You are an expert educator creating a detailed lecture outline.\n\
             Analyze this transcript and create a structured JSON outline with:\n\n\
             1. Title of the lecture\n\
             2. 3-5 clear learning objectives\n\
             3. 3-4 main topics, each with a title, key concepts, subtopics,\n\
                a time allocation in minutes, and 1-based links to the learning objectives\n\
             4. Practical application ideas\n\
             5. Key terms to track\n\n\
             IMPORTANT: Respond with a single JSON object matching this schema, no other text:\n\n\
             {schema}\n\n\
             Target duration: {target_duration_minutes} minutes\n\n\
             Transcript excerpt:\n{excerpt}",
            excerpt = excerpt_chars(text, self.config.structured_excerpt_chars)
        )
    }
}

/// Parse a provider response as a lecture structure.
///
/// Tries the raw text directly, then rescues a `{...}` span when the
/// object arrived wrapped in prose.
fn parse_structure(raw: &str) -> Result<LectureStructure> {
    match serde_json::from_str::<LectureStructure>(raw.trim()) {
        Ok(structure) => validate_structure(structure),
        Err(first) => {
            debug!(error = %first, "direct JSON parse failed, extracting braced span");
            let span = extract_json_span(raw)
                .ok_or_else(|| LecternError::Parse("no JSON object found in response".into()))?;
            let structure = serde_json::from_str::<LectureStructure>(span)
                .map_err(|e| LecternError::Parse(e.to_string()))?;
            validate_structure(structure)
        }
    }
}

fn validate_structure(structure: LectureStructure) -> Result<LectureStructure> {
    if structure.topics.is_empty() {
        return Err(LecternError::Parse("structure contains no topics".into()));
    }
    Ok(structure)
}

/// Outermost `{...}` span of the text, if any.
fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Assemble a structure from a line-oriented response: line 0 is the
/// title, lines 1-3 objectives, 4-6 topics, 7-9 key terms. Missing lines
/// shorten the lists; no topic lines at all fails the tier.
fn parse_line_response(raw: &str, target_duration_minutes: u32) -> Result<LectureStructure> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let title = lines.first().copied().unwrap_or("Lecture").to_string();
    let objectives = take_lines(&lines, 1, 3);
    let topic_titles = take_lines(&lines, 4, 3);
    let terms = take_lines(&lines, 7, 3);

    if topic_titles.is_empty() {
        return Err(LecternError::Parse(
            "line-oriented response contained no topic lines".into(),
        ));
    }

    let main_time = target_duration_minutes * 7 / 10;
    let topic_minutes = main_time / topic_titles.len() as u32;

    let topics = topic_titles
        .into_iter()
        .map(|title| Topic {
            key_concepts: vec![title.clone()],
            subtopics: vec![
                "Overview".to_string(),
                "Details".to_string(),
                "Examples".to_string(),
            ],
            duration_minutes: topic_minutes,
            objective_links: vec![1],
            title,
        })
        .collect();

    Ok(LectureStructure {
        title,
        learning_objectives: objectives,
        topics,
        practical_applications: vec![
            "Real-world application example".to_string(),
            "Interactive exercise".to_string(),
            "Case study".to_string(),
        ],
        key_terms: terms.into_iter().collect(),
    })
}

fn take_lines(lines: &[&str], start: usize, count: usize) -> Vec<String> {
    lines
        .iter()
        .skip(start)
        .take(count)
        .map(|l| l.to_string())
        .collect()
}

/// Last-resort outline used when every provider-backed tier failed.
fn minimal_structure(target_duration_minutes: u32) -> LectureStructure {
    LectureStructure {
        title: "Lecture Overview".to_string(),
        learning_objectives: vec![
            "Understand key concepts".to_string(),
            "Apply knowledge".to_string(),
            "Analyze examples".to_string(),
        ],
        topics: vec![Topic {
            title: "Main Topic".to_string(),
            key_concepts: vec!["Core concept".to_string()],
            subtopics: vec!["Overview".to_string()],
            duration_minutes: target_duration_minutes / 2,
            objective_links: vec![1],
        }],
        practical_applications: vec!["Practical example".to_string()],
        key_terms: BTreeSet::from(["Key term".to_string()]),
    }
}
