//! The end-to-end transcript-to-lecture pipeline.

use std::sync::Arc;

use tracing::{info, warn};

use crate::budget::{WordBudget, WordBudgetAllocator, topic_quotas};
use crate::config::LecternConfig;
use crate::error::Result;
use crate::generate::{NarrativeContext, SectionGenerator, SectionPosition, SectionRole};
use crate::preprocess::TextPreprocessor;
use crate::provider::CompletionProvider;
use crate::structure::{LectureStructure, StructurePlanner};
use crate::utils::tail_chars;
use crate::validate::{CoherenceValidator, validate_word_count};

pub const DEFAULT_TARGET_DURATION_MINUTES: u32 = 30;

/// Transforms a conversational transcript into a structured lecture
/// transcript of a target spoken duration.
///
/// Stages run strictly in sequence: plan, introduction, one generation
/// per main topic, practical applications, summary, then advisory
/// validation. Once the introduction exists the pipeline is best-effort:
/// a later failure logs a warning and returns whatever sections
/// completed, so callers must tolerate transcripts shorter than the full
/// four-section lecture.
pub struct LectureTransformer<P> {
    planner: StructurePlanner<Arc<P>>,
    generator: SectionGenerator<Arc<P>>,
    allocator: WordBudgetAllocator,
    preprocessor: TextPreprocessor,
    validator: CoherenceValidator,
    config: LecternConfig,
}

impl<P: CompletionProvider + 'static> LectureTransformer<P> {
    pub fn new(provider: P, config: LecternConfig) -> Self {
        let provider = Arc::new(provider);
        Self {
            planner: StructurePlanner::new(
                Arc::clone(&provider),
                config.planner.clone(),
                config.retry.clone(),
            ),
            generator: SectionGenerator::new(
                provider,
                config.generation.clone(),
                config.retry.clone(),
            ),
            allocator: WordBudgetAllocator::new(&config.budget),
            preprocessor: TextPreprocessor::new(),
            validator: CoherenceValidator::new(&config.validation),
            config,
        }
    }

    /// Transform with the default duration and examples enabled.
    pub async fn transform(&self, text: &str) -> Result<String> {
        self.transform_to_lecture(text, DEFAULT_TARGET_DURATION_MINUTES, true)
            .await
    }

    pub async fn transform_to_lecture(
        &self,
        text: &str,
        target_duration_minutes: u32,
        include_examples: bool,
    ) -> Result<String> {
        info!(target_duration_minutes, "starting lecture transformation");

        let cleaned = self.preprocessor.clean(text);
        let input_words = self.preprocessor.count_words(&cleaned);
        info!(input_words, "input text cleaned");

        let structure = self.planner.plan(&cleaned, target_duration_minutes).await;
        info!(
            title = %structure.title,
            topics = ?structure.topic_titles(),
            "lecture structure ready"
        );

        let budget = self.allocator.allocate(target_duration_minutes);
        info!(
            total_target = budget.total_target,
            min = budget.min_acceptable,
            max = budget.max_acceptable,
            "word budget allocated"
        );

        // The introduction must exist before anything can be returned;
        // a failure here propagates to the caller.
        let intro = self
            .generator
            .generate(
                &SectionRole::Introduction,
                &structure,
                budget.quotas.intro,
                include_examples,
                None,
                SectionPosition::first(),
            )
            .await?;

        let context = NarrativeContext::seed(
            &structure,
            tail_chars(&intro, self.config.generation.narrative_tail_chars),
        );
        let mut pieces = vec![intro];

        match self
            .generate_remaining(&structure, &budget, include_examples, context, &mut pieces)
            .await
        {
            Ok(()) => {
                let full_content = pieces.join("\n\n");
                let total_words = self.preprocessor.count_words(&full_content);
                info!(total_words, "transcript assembled");

                validate_word_count(
                    total_words,
                    budget.total_target,
                    budget.min_acceptable,
                    budget.max_acceptable,
                    self.config.validation.large_deviation_threshold,
                );
                self.validator.validate(&full_content, &structure);

                Ok(full_content)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    completed_pieces = pieces.len(),
                    "generation failed mid-run, returning partial transcript"
                );
                Ok(pieces.join("\n\n"))
            }
        }
    }

    /// Everything after the introduction. Completed sections accumulate
    /// in `pieces` so the caller can salvage them when a stage fails.
    async fn generate_remaining(
        &self,
        structure: &LectureStructure,
        budget: &WordBudget,
        include_examples: bool,
        mut context: NarrativeContext,
        pieces: &mut Vec<String>,
    ) -> Result<()> {
        let tail_len = self.config.generation.narrative_tail_chars;

        // Main content: one generation per topic, in structure order.
        let quotas = topic_quotas(budget.quotas.main, &structure.topics);
        for (topic, quota) in structure.topics.iter().zip(quotas) {
            context = context.begin_topic(topic);
            let topic_text = self
                .generator
                .generate(
                    &SectionRole::MainTopic(topic.title.clone()),
                    structure,
                    quota,
                    include_examples,
                    Some(&context),
                    SectionPosition::middle(),
                )
                .await?;
            context = context.with_narrative(tail_chars(&topic_text, tail_len));
            pieces.push(topic_text);
        }

        let main_tail = pieces
            .last()
            .map(|text| tail_chars(text, tail_len).to_string())
            .unwrap_or_default();
        context = context.advance_section("main", &main_tail);

        let practical = self
            .generator
            .generate(
                &SectionRole::Practical,
                structure,
                budget.quotas.practical,
                include_examples,
                Some(&context),
                SectionPosition::middle(),
            )
            .await?;
        context = context.advance_section(
            "practical",
            tail_chars(&practical, self.config.generation.summary_tail_chars),
        );
        pieces.push(practical);

        let summary = self
            .generator
            .generate(
                &SectionRole::Summary,
                structure,
                budget.quotas.summary,
                include_examples,
                Some(&context),
                SectionPosition::last(),
            )
            .await?;
        pieces.push(summary);

        Ok(())
    }
}
