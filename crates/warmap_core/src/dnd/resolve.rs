//! Drop resolution and application.

use crate::dnd::container::Container;
use crate::model::goal::Quarter;
use crate::model::task::{DateKey, Task, TaskId, TaskType};
use crate::store::{GoalStore, Rejection, TaskStore};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One end of a drag: a container and an index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub container_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(container_id: impl Into<String>, index: usize) -> Self {
        Self {
            container_id: container_id.into(),
            index,
        }
    }
}

/// Drag-end event reported by the UI drag engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub source: DropLocation,
    /// `None` when the item was released outside every container.
    pub destination: Option<DropLocation>,
    pub dragged_id: String,
}

/// Read-only planner state a drop is resolved against.
#[derive(Debug, Clone, Copy)]
pub struct DropView<'a> {
    pub tasks: &'a TaskStore,
    pub goals: &'a GoalStore,
    /// Date shown by the daily view; lanes have no meaning without it.
    pub focused_date: Option<&'a str>,
}

/// Store mutation a drop translates into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropCommand {
    NoOp,
    ReorderTasks {
        date: DateKey,
        from: usize,
        to: usize,
    },
    RetypeTask {
        task_id: TaskId,
        task_type: TaskType,
    },
    MoveTask {
        task_id: TaskId,
        date: DateKey,
        index: usize,
    },
    ReorderGoals {
        quarter: Quarter,
        from: usize,
        to: usize,
    },
    Reject(DropRejection),
}

/// Why a drop does not change any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropRejection {
    /// The destination date already has its power task.
    PowerLaneOccupied(DateKey),
    /// Both containers are known but this move is not offered.
    Unsupported,
    /// Source and destination are containers of different kinds.
    IncompatibleContainers,
    UnknownContainer(String),
    /// A lane drop arrived while no date is focused.
    NoFocusedDate,
    /// The dragged id is not at the reported source position.
    UnknownItem(String),
}

impl DropRejection {
    /// Stable snake_case code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PowerLaneOccupied(_) => "power_lane_occupied",
            Self::Unsupported => "unsupported",
            Self::IncompatibleContainers => "incompatible_containers",
            Self::UnknownContainer(_) => "unknown_container",
            Self::NoFocusedDate => "no_focused_date",
            Self::UnknownItem(_) => "unknown_item",
        }
    }
}

impl Display for DropRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PowerLaneOccupied(date) => {
                write!(f, "can't add more than one power task to {date}")
            }
            Self::Unsupported => write!(f, "moving items between these lists is not supported"),
            Self::IncompatibleContainers => {
                write!(f, "source and destination lists hold different items")
            }
            Self::UnknownContainer(id) => write!(f, "unknown drop container: {id}"),
            Self::NoFocusedDate => write!(f, "no date is focused"),
            Self::UnknownItem(id) => write!(f, "dragged item not found: {id}"),
        }
    }
}

impl Error for DropRejection {}

/// Failure of a drop to take effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    /// Resolution refused the drop.
    Rejected(DropRejection),
    /// The store refused the resolved command.
    Store(Rejection),
}

impl Display for DropError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DropError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<Rejection> for DropError {
    fn from(value: Rejection) -> Self {
        Self::Store(value)
    }
}

/// Whether an applied drop changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Unchanged,
    Applied,
}

/// Translates a drop into the command that realizes it.
///
/// Pure; the stores in `view` are only read.
pub fn resolve_drop(drop: &DropResult, view: &DropView<'_>) -> DropCommand {
    let command = resolve(drop, view);
    if let DropCommand::Reject(rejection) = &command {
        info!(
            "event=drop_resolve module=dnd status=rejected reason={} source={} destination={} dragged_id={}",
            rejection.code(),
            drop.source.container_id,
            drop
                .destination
                .as_ref()
                .map_or("-", |location| location.container_id.as_str()),
            drop.dragged_id
        );
    }
    command
}

fn resolve(drop: &DropResult, view: &DropView<'_>) -> DropCommand {
    let source = &drop.source;
    let Some(destination) = drop.destination.as_ref() else {
        return DropCommand::NoOp;
    };
    if source == destination {
        return DropCommand::NoOp;
    }

    match (
        Container::parse(&source.container_id),
        Container::parse(&destination.container_id),
    ) {
        (Container::Unknown(id), _) | (_, Container::Unknown(id)) => {
            DropCommand::Reject(DropRejection::UnknownContainer(id))
        }
        (Container::Lane(from_lane), Container::Lane(to_lane)) => {
            resolve_lane_drop(drop, view, from_lane, to_lane, destination.index)
        }
        (Container::Date(from_date), Container::Date(to_date)) if from_date == to_date => {
            match checked_task_at(view.tasks.tasks_for_date(&from_date), source.index, drop) {
                Ok(_) => DropCommand::ReorderTasks {
                    date: from_date,
                    from: source.index,
                    to: destination.index,
                },
                Err(rejection) => DropCommand::Reject(rejection),
            }
        }
        (Container::Date(from_date), Container::Date(to_date)) => {
            let listed = view.tasks.tasks_for_date(&from_date);
            let task = match checked_task_at(listed, source.index, drop) {
                Ok(task) => task,
                Err(rejection) => return DropCommand::Reject(rejection),
            };
            if task.is_power() && view.tasks.has_date_power_task(&to_date) {
                return DropCommand::Reject(DropRejection::PowerLaneOccupied(to_date));
            }
            DropCommand::MoveTask {
                task_id: task.id.clone(),
                date: to_date,
                index: destination.index,
            }
        }
        (Container::Goals(from_quarter), Container::Goals(to_quarter)) => {
            if from_quarter != to_quarter {
                return DropCommand::Reject(DropRejection::Unsupported);
            }
            let known = view
                .goals
                .goals(from_quarter)
                .get(source.index)
                .is_some_and(|goal| goal.id == drop.dragged_id);
            if !known {
                return DropCommand::Reject(DropRejection::UnknownItem(drop.dragged_id.clone()));
            }
            DropCommand::ReorderGoals {
                quarter: from_quarter,
                from: source.index,
                to: destination.index,
            }
        }
        _ => DropCommand::Reject(DropRejection::IncompatibleContainers),
    }
}

/// Lanes are filtered views over the focused date's list, so lane indices
/// are translated into positions of that list.
fn resolve_lane_drop(
    drop: &DropResult,
    view: &DropView<'_>,
    from_lane: TaskType,
    to_lane: TaskType,
    to_index: usize,
) -> DropCommand {
    let Some(date) = view.focused_date else {
        return DropCommand::Reject(DropRejection::NoFocusedDate);
    };
    let lane = view.tasks.lane(date, from_lane);
    let task = match lane.get(drop.source.index) {
        Some(task) if task.id == drop.dragged_id => *task,
        _ => return DropCommand::Reject(DropRejection::UnknownItem(drop.dragged_id.clone())),
    };

    if from_lane != to_lane {
        if to_lane == TaskType::Power && view.tasks.has_date_power_task(date) {
            return DropCommand::Reject(DropRejection::PowerLaneOccupied(date.to_string()));
        }
        return DropCommand::RetypeTask {
            task_id: task.id.clone(),
            task_type: to_lane,
        };
    }

    let full = view.tasks.tasks_for_date(date);
    let position_of = |id: &str| full.iter().position(|candidate| candidate.id == id);
    let (Some(from), Some(last)) = (position_of(&task.id), full.len().checked_sub(1)) else {
        return DropCommand::Reject(DropRejection::UnknownItem(drop.dragged_id.clone()));
    };
    let to = lane
        .get(to_index)
        .and_then(|target| position_of(&target.id))
        .unwrap_or(last);
    DropCommand::ReorderTasks {
        date: date.to_string(),
        from,
        to,
    }
}

fn checked_task_at<'a>(
    tasks: &'a [Task],
    index: usize,
    drop: &DropResult,
) -> Result<&'a Task, DropRejection> {
    tasks
        .get(index)
        .filter(|task| task.id == drop.dragged_id)
        .ok_or_else(|| DropRejection::UnknownItem(drop.dragged_id.clone()))
}

/// Applies a resolved command to the stores.
pub fn apply_drop(
    command: &DropCommand,
    tasks: &mut TaskStore,
    goals: &mut GoalStore,
) -> Result<DropOutcome, DropError> {
    match command {
        DropCommand::NoOp => return Ok(DropOutcome::Unchanged),
        DropCommand::Reject(rejection) => return Err(DropError::Rejected(rejection.clone())),
        DropCommand::ReorderTasks { date, from, to } => tasks.reorder_tasks(date, *from, *to)?,
        DropCommand::RetypeTask { task_id, task_type } => {
            tasks.update_task_type(task_id, *task_type)?
        }
        DropCommand::MoveTask {
            task_id,
            date,
            index,
        } => {
            tasks.move_task(task_id, date, *index)?;
        }
        DropCommand::ReorderGoals { quarter, from, to } => {
            goals.reorder_goals(*quarter, *from, *to)?
        }
    }
    debug!("event=drop_apply module=dnd status=ok command={:?}", command);
    Ok(DropOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::{resolve_drop, DropCommand, DropLocation, DropRejection, DropResult, DropView};
    use crate::model::task::TaskType;
    use crate::store::{GoalStore, TaskStore};

    fn drop(from: (&str, usize), to: Option<(&str, usize)>, id: &str) -> DropResult {
        DropResult {
            source: DropLocation::new(from.0, from.1),
            destination: to.map(|(container, index)| DropLocation::new(container, index)),
            dragged_id: id.to_string(),
        }
    }

    #[test]
    fn release_outside_or_in_place_is_noop() {
        let tasks = TaskStore::with_demo_tasks();
        let goals = GoalStore::new();
        let view = DropView {
            tasks: &tasks,
            goals: &goals,
            focused_date: Some("2025-05-01"),
        };
        assert_eq!(
            resolve_drop(&drop(("primary-tasks", 0), None, "task_2"), &view),
            DropCommand::NoOp
        );
        assert_eq!(
            resolve_drop(
                &drop(("primary-tasks", 0), Some(("primary-tasks", 0)), "task_2"),
                &view
            ),
            DropCommand::NoOp
        );
    }

    #[test]
    fn primary_lane_indices_map_to_date_positions() {
        let tasks = TaskStore::with_demo_tasks();
        let goals = GoalStore::new();
        let view = DropView {
            tasks: &tasks,
            goals: &goals,
            focused_date: Some("2025-05-01"),
        };
        // Lane index 0 is task_2 at date position 1; lane index 2 is task_4.
        assert_eq!(
            resolve_drop(
                &drop(("primary-tasks", 0), Some(("primary-tasks", 2)), "task_2"),
                &view
            ),
            DropCommand::ReorderTasks {
                date: "2025-05-01".to_string(),
                from: 1,
                to: 3,
            }
        );
    }

    #[test]
    fn promoting_into_occupied_power_lane_is_rejected() {
        let tasks = TaskStore::with_demo_tasks();
        let goals = GoalStore::new();
        let view = DropView {
            tasks: &tasks,
            goals: &goals,
            focused_date: Some("2025-05-01"),
        };
        assert_eq!(
            resolve_drop(
                &drop(("primary-tasks", 1), Some(("power-tasks", 0)), "task_3"),
                &view
            ),
            DropCommand::Reject(DropRejection::PowerLaneOccupied("2025-05-01".to_string()))
        );
        assert_eq!(
            resolve_drop(
                &drop(("power-tasks", 0), Some(("primary-tasks", 0)), "task_1"),
                &view
            ),
            DropCommand::RetypeTask {
                task_id: "task_1".to_string(),
                task_type: TaskType::Primary,
            }
        );
    }

    #[test]
    fn lane_drop_requires_focused_date() {
        let tasks = TaskStore::with_demo_tasks();
        let goals = GoalStore::new();
        let view = DropView {
            tasks: &tasks,
            goals: &goals,
            focused_date: None,
        };
        assert_eq!(
            resolve_drop(
                &drop(("primary-tasks", 0), Some(("primary-tasks", 1)), "task_2"),
                &view
            ),
            DropCommand::Reject(DropRejection::NoFocusedDate)
        );
    }

    #[test]
    fn mixed_and_unknown_containers_are_rejected() {
        let tasks = TaskStore::with_demo_tasks();
        let goals = GoalStore::with_demo_goals();
        let view = DropView {
            tasks: &tasks,
            goals: &goals,
            focused_date: Some("2025-05-01"),
        };
        assert_eq!(
            resolve_drop(
                &drop(("2025-05-01", 0), Some(("goals-q1", 0)), "task_1"),
                &view
            ),
            DropCommand::Reject(DropRejection::IncompatibleContainers)
        );
        assert_eq!(
            resolve_drop(&drop(("backlog", 0), Some(("2025-05-01", 0)), "x"), &view),
            DropCommand::Reject(DropRejection::UnknownContainer("backlog".to_string()))
        );
    }

    #[test]
    fn stale_source_position_is_rejected() {
        let tasks = TaskStore::with_demo_tasks();
        let goals = GoalStore::new();
        let view = DropView {
            tasks: &tasks,
            goals: &goals,
            focused_date: None,
        };
        assert_eq!(
            resolve_drop(
                &drop(("2025-05-01", 0), Some(("2025-05-01", 2)), "task_4"),
                &view
            ),
            DropCommand::Reject(DropRejection::UnknownItem("task_4".to_string()))
        );
    }
}
