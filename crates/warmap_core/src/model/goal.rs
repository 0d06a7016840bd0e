//! Quarterly goal model.
//!
//! # Invariants
//! - `title` is non-blank and stored trimmed.
//! - Every goal belongs to exactly one `Quarter`.

use crate::ids::new_id;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier for a goal.
pub type GoalId = String;

/// Prefix used when generating goal IDs.
pub const GOAL_ID_PREFIX: &str = "goal";

/// One of the four fixed yearly goal buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// All quarters in calendar order.
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Stable id used in container ids and storage (`q1`..`q4`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Q1 => "q1",
            Self::Q2 => "q2",
            Self::Q3 => "q3",
            Self::Q4 => "q4",
        }
    }

    /// Parses `q1`..`q4`, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "q1" => Some(Self::Q1),
            "q2" => Some(Self::Q2),
            "q3" => Some(Self::Q3),
            "q4" => Some(Self::Q4),
            _ => None,
        }
    }

    /// Month identifiers rendered in this quarter's section.
    pub fn months(self) -> [&'static str; 3] {
        match self {
            Self::Q1 => ["Jan", "Feb", "Mar"],
            Self::Q2 => ["Apr", "May", "Jun"],
            Self::Q3 => ["Jul", "Aug", "Sep"],
            Self::Q4 => ["Oct", "Nov", "Dec"],
        }
    }
}

impl Display for Quarter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One goal tracked inside a quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub completed: bool,
}

impl Goal {
    /// Creates an open goal with a freshly generated ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(GOAL_ID_PREFIX),
            title: title.into(),
            completed: false,
        }
    }
}
