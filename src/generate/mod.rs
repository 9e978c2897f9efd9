//! Section generation: rolling narrative context and prompt assembly.

mod context;
mod section;

pub use context::NarrativeContext;
pub use section::{SectionGenerator, SectionPosition, SectionRole};
