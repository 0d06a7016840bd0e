//! Planner facade bundling the three stores.
//!
//! The UI bridge owns exactly one `Planner`; tests build their own with
//! injected state.

use crate::dnd::{apply_drop, resolve_drop, DropError, DropOutcome, DropResult, DropView};
use crate::store::{ColorStore, GoalStore, TaskStore};
use log::info;

/// Daily tasks, quarter goals and day colors of one planner session.
#[derive(Debug, Default)]
pub struct Planner {
    pub tasks: TaskStore,
    pub goals: GoalStore,
    pub colors: ColorStore,
}

impl Planner {
    pub fn new(tasks: TaskStore, goals: GoalStore, colors: ColorStore) -> Self {
        Self {
            tasks,
            goals,
            colors,
        }
    }

    /// Planner with the demo day and demo yearly plan, and no painted days.
    pub fn demo() -> Self {
        Self::new(
            TaskStore::with_demo_tasks(),
            GoalStore::with_demo_goals(),
            ColorStore::new(),
        )
    }

    /// Resolves one drag-end event and applies it to the stores.
    ///
    /// `focused_date` is the date the daily view currently shows; lane drops
    /// are rejected without it.
    pub fn handle_drop(
        &mut self,
        drop: &DropResult,
        focused_date: Option<&str>,
    ) -> Result<DropOutcome, DropError> {
        let command = resolve_drop(
            drop,
            &DropView {
                tasks: &self.tasks,
                goals: &self.goals,
                focused_date,
            },
        );
        let outcome = apply_drop(&command, &mut self.tasks, &mut self.goals);
        match &outcome {
            Ok(result) => info!(
                "event=drop_handle module=planner status=ok dragged_id={} outcome={:?}",
                drop.dragged_id, result
            ),
            Err(err) => info!(
                "event=drop_handle module=planner status=rejected dragged_id={} error={}",
                drop.dragged_id, err
            ),
        }
        outcome
    }
}
