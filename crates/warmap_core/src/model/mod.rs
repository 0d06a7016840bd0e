//! Planner domain model for task/goal/color projections.
//!
//! # Responsibility
//! - Define canonical data structures used by the planner stores.
//! - Own the wire naming shared with the UI layer.
//!
//! # Invariants
//! - Every task and goal is identified by a stable string ID.
//! - Tasks are bucketed by `YYYY-MM-DD` date keys, goals by quarter.

pub mod color;
pub mod goal;
pub mod task;
