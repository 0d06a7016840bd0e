//! Core domain logic for War Map.
//! This crate is the single source of truth for planner invariants.

pub mod db;
pub mod dnd;
pub mod ids;
pub mod logging;
pub mod model;
pub mod planner;
pub mod storage;
pub mod store;

pub use dnd::{
    apply_drop, resolve_drop, DropCommand, DropError, DropLocation, DropOutcome, DropRejection,
    DropResult, DropView,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::color::{ColorDefinition, DayColorMap, MonthDayColors};
pub use model::goal::{Goal, GoalId, Quarter};
pub use model::task::{DateKey, Task, TaskId, TaskType};
pub use planner::Planner;
pub use storage::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};
pub use store::{ColorStore, GoalStore, Rejection, StoreResult, TaskStore};

/// Minimal health-check API for the bridge.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
