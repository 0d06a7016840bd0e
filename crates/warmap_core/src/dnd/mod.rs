//! Drag-and-drop reorder and move protocol.
//!
//! # Responsibility
//! - Classify drop container ids into task lanes, date lists and goal lists.
//! - Translate one drop descriptor into one store command (pure).
//! - Apply a resolved command to the task and goal stores.
//!
//! # Invariants
//! - Resolution never mutates state; each drop is handled independently.
//! - A move into an occupied power slot resolves to a rejection.

pub mod container;
pub mod resolve;

pub use container::{Container, GOAL_CONTAINER_PREFIX, POWER_LANE_ID, PRIMARY_LANE_ID};
pub use resolve::{
    apply_drop, resolve_drop, DropCommand, DropError, DropLocation, DropOutcome, DropRejection,
    DropResult, DropView,
};
