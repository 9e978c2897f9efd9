//! lectern: turn raw conversational transcripts into structured lecture
//! transcripts of a target spoken duration, using an external completion
//! provider for the generation itself.
//!
//! The pipeline plans an outline, allocates word quotas from the target
//! duration, generates each section with a rolling narrative context,
//! and finishes with advisory word-count and coherence checks.

pub mod budget;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod preprocess;
pub mod provider;
pub mod structure;
pub mod transformer;
pub mod utils;
pub mod validate;

pub use budget::{SectionQuotas, WordBudget, WordBudgetAllocator, topic_quotas};
pub use config::LecternConfig;
pub use error::{LecternError, ProviderError, Result};
pub use generate::{NarrativeContext, SectionGenerator, SectionPosition, SectionRole};
pub use preprocess::TextPreprocessor;
pub use provider::{ApiProvider, CompletionProvider, Message, Role};
pub use structure::{LectureStructure, StructurePlanner, Topic};
pub use transformer::{DEFAULT_TARGET_DURATION_MINUTES, LectureTransformer};
pub use validate::{CoherenceGap, CoherenceValidator};
