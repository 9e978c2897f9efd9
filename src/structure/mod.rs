//! Lecture outline types and the tiered structure planner.

mod planner;
mod types;

pub use planner::StructurePlanner;
pub use types::{LectureStructure, Topic};
