//! In-memory planner state containers.
//!
//! # Responsibility
//! - Own task, goal and color state and expose their mutation APIs.
//! - Report rejected mutations as `Rejection` values instead of panicking.
//!
//! # Invariants
//! - A rejected mutation leaves the store exactly as it was.
//! - Each store is mutated only through its own `&mut self` API.

pub mod color_store;
pub mod goal_store;
pub mod ordering;
pub mod rejection;
pub mod task_store;

pub use color_store::ColorStore;
pub use goal_store::GoalStore;
pub use rejection::{Rejection, StoreResult};
pub use task_store::TaskStore;
