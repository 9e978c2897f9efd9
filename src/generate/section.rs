use tracing::{debug, info};

use super::NarrativeContext;
use crate::config::{GenerationConfig, RetryConfig};
use crate::error::Result;
use crate::preprocess::TextPreprocessor;
use crate::provider::{CompletionProvider, Message, complete_with_retry};
use crate::structure::LectureStructure;

/// Which part of the lecture a generation call is producing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRole {
    Introduction,
    Main,
    MainTopic(String),
    Practical,
    Summary,
}

impl SectionRole {
    pub fn label(&self) -> String {
        match self {
            Self::Introduction => "introduction".to_string(),
            Self::Main => "main".to_string(),
            Self::MainTopic(title) => format!("main_topic_{title}"),
            Self::Practical => "practical".to_string(),
            Self::Summary => "summary".to_string(),
        }
    }

    /// Role-specific guidance checklist. Per-topic roles carry none; the
    /// context block and requirements do the steering there.
    fn guidance(&self, structure: &LectureStructure) -> Option<String> {
        match self {
            Self::Introduction => Some(
                "- Start with an engaging hook\n\
                 - Present clear learning objectives\n\
                 - Preview main topics\n\
                 - Set expectations for the lecture"
                    .to_string(),
            ),
            Self::Main => Some(format!(
                "- Cover these topics: {}\n\
                 - Build progressively on concepts\n\
                 - Include clear transitions\n\
                 - Reference previous concepts",
                structure.topic_titles().join(", ")
            )),
            Self::Practical => Some(
                "- Apply concepts to real-world scenarios\n\
                 - Connect to previous topics\n\
                 - Include interactive elements\n\
                 - Reinforce key learning points"
                    .to_string(),
            ),
            Self::Summary => Some(
                "- Reinforce key takeaways\n\
                 - Connect back to objectives\n\
                 - Provide next steps\n\
                 - End with a strong conclusion"
                    .to_string(),
            ),
            Self::MainTopic(_) => None,
        }
    }
}

/// Position of a section within the lecture sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionPosition {
    pub is_first: bool,
    pub is_last: bool,
}

impl SectionPosition {
    pub fn first() -> Self {
        Self {
            is_first: true,
            is_last: false,
        }
    }

    pub fn middle() -> Self {
        Self::default()
    }

    pub fn last() -> Self {
        Self {
            is_first: false,
            is_last: true,
        }
    }
}

/// Generates one lecture section per call through the completion provider.
///
/// The word quota is advisory: it is stated in the prompt but the response
/// comes back verbatim, never trimmed locally.
pub struct SectionGenerator<P> {
    provider: P,
    config: GenerationConfig,
    retry: RetryConfig,
    preprocessor: TextPreprocessor,
}

impl<P: CompletionProvider> SectionGenerator<P> {
    pub fn new(provider: P, config: GenerationConfig, retry: RetryConfig) -> Self {
        Self {
            provider,
            config,
            retry,
            preprocessor: TextPreprocessor::new(),
        }
    }

    pub async fn generate(
        &self,
        role: &SectionRole,
        structure: &LectureStructure,
        quota_words: usize,
        include_examples: bool,
        context: Option<&NarrativeContext>,
        position: SectionPosition,
    ) -> Result<String> {
        let label = role.label();
        debug!(
            section = %label,
            quota_words,
            is_first = position.is_first,
            is_last = position.is_last,
            "generating section"
        );

        let prompt = build_prompt(role, structure, quota_words, include_examples, context);
        let messages = [
            Message::system("You are an expert educator creating a coherent lecture transcript."),
            Message::user(prompt),
        ];

        let content = complete_with_retry(
            &self.provider,
            &messages,
            self.config.temperature,
            self.config.max_output_tokens,
            &self.retry,
        )
        .await?;

        let realized_words = self.preprocessor.count_words(&content);
        info!(
            section = %label,
            words = realized_words,
            target = quota_words,
            "section generated"
        );

        Ok(content)
    }
}

fn build_prompt(
    role: &SectionRole,
    structure: &LectureStructure,
    quota_words: usize,
    include_examples: bool,
    context: Option<&NarrativeContext>,
) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "You are an expert educator creating a detailed lecture transcript.\n\
         Generate the {label} section with EXACTLY {quota_words} words.\n\n\
         Lecture Title: {title}\n\
         Learning Objectives: {objectives}",
        label = role.label(),
        title = structure.title,
        objectives = structure.learning_objectives.join(", ")
    ));

    if let Some(guidance) = role.guidance(structure) {
        parts.push(format!("Current section purpose:\n{guidance}"));
    }

    if let Some(ctx) = context {
        let terms: Vec<&str> = ctx.key_terms.iter().map(String::as_str).collect();
        parts.push(format!(
            "Context:\n\
             - Covered topics: {}\n\
             - Pending topics: {}\n\
             - Key terms used: {}\n\
             - Recent narrative: {}",
            ctx.covered_topics.join(", "),
            ctx.pending_topics.join(", "),
            terms.join(", "),
            ctx.current_narrative
        ));
    }

    parts.push(format!(
        "Requirements:\n\
         1. STRICT word count: Generate EXACTLY {quota_words} words\n\
         2. Include practical examples: {include_examples}\n\
         3. Use clear transitions\n\
         4. Include engagement points\n\
         5. Use time markers [MM:SS]\n\
         6. Reference specific content from transcript\n\
         7. Maintain narrative flow\n\
         8. Use key terms consistently"
    ));

    parts.join("\n\n")
}
