//! Drop container identifiers.

use crate::model::goal::Quarter;
use crate::model::task::{is_valid_date_key, DateKey, TaskType};

/// Container id of the daily view's power lane.
pub const POWER_LANE_ID: &str = "power-tasks";
/// Container id of the daily view's primary lane.
pub const PRIMARY_LANE_ID: &str = "primary-tasks";
/// Prefix of quarter goal list container ids (`goals-q1`).
pub const GOAL_CONTAINER_PREFIX: &str = "goals-";

/// Semantic meaning of a drop container id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// Daily view lane over the focused date; filters tasks by type.
    Lane(TaskType),
    /// Monthly view list of one calendar date.
    Date(DateKey),
    /// Macro view goal list of one quarter.
    Goals(Quarter),
    /// Id this protocol does not know about.
    Unknown(String),
}

impl Container {
    /// Classifies a container id reported by the drag engine.
    pub fn parse(container_id: &str) -> Self {
        match container_id {
            POWER_LANE_ID => Self::Lane(TaskType::Power),
            PRIMARY_LANE_ID => Self::Lane(TaskType::Primary),
            id if is_valid_date_key(id) => Self::Date(id.to_string()),
            id => id
                .strip_prefix(GOAL_CONTAINER_PREFIX)
                .and_then(Quarter::parse)
                .map(Self::Goals)
                .unwrap_or_else(|| Self::Unknown(id.to_string())),
        }
    }

    /// Container id the UI should use for this container.
    pub fn id(&self) -> String {
        match self {
            Self::Lane(TaskType::Power) => POWER_LANE_ID.to_string(),
            Self::Lane(TaskType::Primary) => PRIMARY_LANE_ID.to_string(),
            Self::Date(date) => date.clone(),
            Self::Goals(quarter) => format!("{GOAL_CONTAINER_PREFIX}{quarter}"),
            Self::Unknown(id) => id.clone(),
        }
    }
}
