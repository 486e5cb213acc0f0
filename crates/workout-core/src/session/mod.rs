//! Session generation: selection, time allocation, duration limits and
//! ordering.

pub mod allocator;
pub mod arranger;
pub mod constraints;
pub mod generator;
pub mod plan;
pub mod selector;

pub use allocator::{
    allocate, allocate_with_multiplier, distribute_largest_remainder, SIDED_MULTIPLIER,
};
pub use arranger::{
    arrange, body_part_tags, progressive_difficulty, vary_tags, DEFAULT_CATEGORY_TAGS,
};
pub use constraints::{apply_minimum, enforce, split_long, ConstraintReport, DurationLimits};
pub use generator::{generate_session, SessionGenerator};
pub use plan::{SessionPlan, SessionSegment};
pub use selector::{exercise_count, next_cycle, select};
