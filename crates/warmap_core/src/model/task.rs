//! Daily task model.
//!
//! # Responsibility
//! - Define the task record rendered by daily and monthly views.
//! - Validate calendar date keys used to bucket tasks.
//!
//! # Invariants
//! - `title` is non-blank and stored trimmed.
//! - `date` matches `YYYY-MM-DD` with month `01..12` and day `01..31`.
//! - At most one `TaskType::Power` task exists per date (enforced by
//!   `TaskStore`, not by this record).

use crate::ids::new_id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DATE_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date key regex")
});

/// Stable identifier for a task.
pub type TaskId = String;

/// Calendar date key in `YYYY-MM-DD` form.
pub type DateKey = String;

/// Prefix used when generating task IDs.
pub const TASK_ID_PREFIX: &str = "task";

/// Task priority lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// The single most important task of a day.
    Power,
    /// Any other task of the day.
    Primary,
}

impl TaskType {
    /// Stable string id shared with the UI layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Primary => "primary",
        }
    }

    /// Parses a lane label; surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "power" => Some(Self::Power),
            "primary" => Some(Self::Primary),
            _ => None,
        }
    }
}

/// One task scheduled on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Date bucket that owns this task.
    pub date: DateKey,
    pub completed: bool,
    pub task_type: TaskType,
}

impl Task {
    /// Creates an open task with a freshly generated ID.
    ///
    /// Callers are expected to pass an already normalized title and a
    /// validated date key.
    pub fn new(date: impl Into<DateKey>, title: impl Into<String>, task_type: TaskType) -> Self {
        Self::with_id(new_id(TASK_ID_PREFIX), date, title, task_type)
    }

    /// Creates an open task with a caller-provided ID.
    ///
    /// Used for seeded demo data where identity is fixed up front.
    pub fn with_id(
        id: impl Into<TaskId>,
        date: impl Into<DateKey>,
        title: impl Into<String>,
        task_type: TaskType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            completed: false,
            task_type,
        }
    }

    pub fn is_power(&self) -> bool {
        self.task_type == TaskType::Power
    }
}

/// Returns whether `value` is a well-formed `YYYY-MM-DD` date key.
pub fn is_valid_date_key(value: &str) -> bool {
    DATE_KEY_RE.is_match(value)
}

/// Trims a display title, returning `None` when nothing is left.
pub fn normalize_title(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
