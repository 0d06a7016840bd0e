//! Date-bucketed task store.
//!
//! # Responsibility
//! - Own the `date -> ordered task list` mapping for daily/monthly views.
//! - Provide add, remove, retitle, complete, retype, move and reorder APIs.
//!
//! # Invariants
//! - At most one `TaskType::Power` task per date after any mutation.
//! - A date key is present only while its list is non-empty.
//! - `Task::date` always equals the key of the list holding the task.
//! - Rejected calls never mutate state.

use crate::model::task::{
    is_valid_date_key, normalize_title, DateKey, Task, TaskId, TaskType,
};
use crate::store::ordering::{insert_clamped, move_within};
use crate::store::rejection::{Rejection, StoreResult};
use log::{debug, info};
use std::collections::BTreeMap;

const DEMO_DATE: &str = "2025-05-01";

/// In-memory task state keyed by `YYYY-MM-DD` date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks_by_date: BTreeMap<DateKey, Vec<Task>>,
}

impl TaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from caller-provided initial state.
    ///
    /// Empty lists are dropped and each task's `date` is aligned with the key
    /// of the list that holds it. Only the first power task of a date keeps
    /// its type; later ones are stored as `TaskType::Primary`.
    pub fn with_tasks(tasks_by_date: BTreeMap<DateKey, Vec<Task>>) -> Self {
        let tasks_by_date = tasks_by_date
            .into_iter()
            .filter(|(_, tasks)| !tasks.is_empty())
            .map(|(date, mut tasks)| {
                let mut has_power = false;
                for task in &mut tasks {
                    task.date.clone_from(&date);
                    if !task.is_power() {
                        continue;
                    }
                    if has_power {
                        debug!(
                            "event=task_seed module=tasks status=downgraded date={} task_id={} stored=primary",
                            date, task.id
                        );
                        task.task_type = TaskType::Primary;
                    }
                    has_power = true;
                }
                (date, tasks)
            })
            .collect();
        Self { tasks_by_date }
    }

    /// Creates a store seeded with the demo day shown on first launch.
    pub fn with_demo_tasks() -> Self {
        let titles = [
            ("Finalize launch plan", TaskType::Power),
            ("Reply to supplier emails", TaskType::Primary),
            ("Review packaging proofs", TaskType::Primary),
            ("Book photographer", TaskType::Primary),
            ("Update product listing", TaskType::Primary),
            ("Call accountant", TaskType::Primary),
        ];
        let tasks = titles
            .iter()
            .enumerate()
            .map(|(offset, (title, task_type))| {
                Task::with_id(format!("task_{}", offset + 1), DEMO_DATE, *title, *task_type)
            })
            .collect::<Vec<_>>();

        let mut tasks_by_date = BTreeMap::new();
        tasks_by_date.insert(DEMO_DATE.to_string(), tasks);
        Self::with_tasks(tasks_by_date)
    }

    /// Adds a task on `date`, returning its new ID.
    ///
    /// # Contract
    /// - Blank titles and malformed dates are rejected.
    /// - A power task requested for a date that already has one is stored as
    ///   `TaskType::Primary` instead.
    /// - `position` is clamped to the list length; `None` appends.
    pub fn add_task(
        &mut self,
        date: &str,
        title: &str,
        task_type: TaskType,
        position: Option<usize>,
    ) -> StoreResult<TaskId> {
        let title =
            normalize_title(title).ok_or_else(|| reject("task_add", Rejection::BlankTitle))?;
        ensure_date_key("task_add", date)?;

        let final_type = if task_type == TaskType::Power && self.has_date_power_task(date) {
            debug!(
                "event=task_add module=tasks status=downgraded date={} requested=power stored=primary",
                date
            );
            TaskType::Primary
        } else {
            task_type
        };

        let task = Task::new(date, title, final_type);
        let task_id = task.id.clone();
        let list = self.tasks_by_date.entry(date.to_string()).or_default();
        let index = match position {
            Some(position) => insert_clamped(list, position, task),
            None => {
                list.push(task);
                list.len() - 1
            }
        };

        info!(
            "event=task_add module=tasks status=ok date={} task_id={} task_type={} index={}",
            date,
            task_id,
            final_type.as_str(),
            index
        );
        Ok(task_id)
    }

    /// Removes a task wherever it is scheduled and returns it.
    ///
    /// The date entry disappears once its last task is removed.
    pub fn remove_task(&mut self, task_id: &str) -> StoreResult<Task> {
        let (date, index) = self
            .locate(task_id)
            .ok_or_else(|| reject("task_remove", Rejection::TaskNotFound(task_id.to_string())))?;
        let task = self
            .take(&date, index)
            .ok_or_else(|| reject("task_remove", Rejection::TaskNotFound(task_id.to_string())))?;

        info!(
            "event=task_remove module=tasks status=ok date={} task_id={}",
            date, task_id
        );
        Ok(task)
    }

    /// Sets the completion flag of a task.
    pub fn update_task_completion(&mut self, task_id: &str, completed: bool) -> StoreResult<()> {
        let task = self.find_mut(task_id).ok_or_else(|| {
            reject("task_complete", Rejection::TaskNotFound(task_id.to_string()))
        })?;
        task.completed = completed;
        debug!(
            "event=task_complete module=tasks status=ok task_id={} completed={}",
            task_id, completed
        );
        Ok(())
    }

    /// Replaces a task title; blank titles are rejected.
    pub fn update_task_title(&mut self, task_id: &str, title: &str) -> StoreResult<()> {
        let title =
            normalize_title(title).ok_or_else(|| reject("task_retitle", Rejection::BlankTitle))?;
        let task = self.find_mut(task_id).ok_or_else(|| {
            reject("task_retitle", Rejection::TaskNotFound(task_id.to_string()))
        })?;
        task.title = title;
        debug!("event=task_retitle module=tasks status=ok task_id={}", task_id);
        Ok(())
    }

    /// Changes a task's lane in place, without reordering.
    ///
    /// Promoting to power is rejected while another task on the same date is
    /// already the power task.
    pub fn update_task_type(&mut self, task_id: &str, new_type: TaskType) -> StoreResult<()> {
        let date = self
            .task(task_id)
            .map(|task| task.date.clone())
            .ok_or_else(|| reject("task_retype", Rejection::TaskNotFound(task_id.to_string())))?;

        if new_type == TaskType::Power && self.has_other_power_task(&date, task_id) {
            return Err(reject("task_retype", Rejection::PowerTaskTaken(date)));
        }

        let task = self
            .find_mut(task_id)
            .ok_or_else(|| reject("task_retype", Rejection::TaskNotFound(task_id.to_string())))?;
        task.task_type = new_type;
        info!(
            "event=task_retype module=tasks status=ok date={} task_id={} task_type={}",
            date,
            task_id,
            new_type.as_str()
        );
        Ok(())
    }

    /// Moves a task to `new_date` at `new_index` and returns the final index.
    ///
    /// # Contract
    /// - `new_index` is clamped to the destination list.
    /// - `task_type` is kept as is, so a power task cannot land on another
    ///   date that already has a power task.
    /// - An emptied source date is removed from the mapping.
    pub fn move_task(
        &mut self,
        task_id: &str,
        new_date: &str,
        new_index: usize,
    ) -> StoreResult<usize> {
        ensure_date_key("task_move", new_date)?;
        let (old_date, index) = self
            .locate(task_id)
            .ok_or_else(|| reject("task_move", Rejection::TaskNotFound(task_id.to_string())))?;

        let is_power = self
            .tasks_for_date(&old_date)
            .get(index)
            .is_some_and(Task::is_power);
        if is_power && old_date != new_date && self.has_date_power_task(new_date) {
            return Err(reject(
                "task_move",
                Rejection::PowerTaskTaken(new_date.to_string()),
            ));
        }

        let mut task = self
            .take(&old_date, index)
            .ok_or_else(|| reject("task_move", Rejection::TaskNotFound(task_id.to_string())))?;
        task.date = new_date.to_string();
        let list = self.tasks_by_date.entry(new_date.to_string()).or_default();
        let final_index = insert_clamped(list, new_index, task);

        info!(
            "event=task_move module=tasks status=ok task_id={} from={} to={} index={}",
            task_id, old_date, new_date, final_index
        );
        Ok(final_index)
    }

    /// Moves the task at `start_index` to `end_index` within one date list.
    ///
    /// `end_index` is clamped to the last position.
    pub fn reorder_tasks(
        &mut self,
        date: &str,
        start_index: usize,
        end_index: usize,
    ) -> StoreResult<()> {
        let list = self
            .tasks_by_date
            .get_mut(date)
            .ok_or_else(|| reject("task_reorder", Rejection::DateNotFound(date.to_string())))?;
        move_within(list, start_index, end_index).map_err(|err| reject("task_reorder", err))?;
        debug!(
            "event=task_reorder module=tasks status=ok date={} from={} to={}",
            date, start_index, end_index
        );
        Ok(())
    }

    /// Returns whether `date` already has a power task.
    pub fn has_date_power_task(&self, date: &str) -> bool {
        self.tasks_for_date(date).iter().any(Task::is_power)
    }

    /// Tasks scheduled on `date` in display order (empty when none).
    pub fn tasks_for_date(&self, date: &str) -> &[Task] {
        self.tasks_by_date
            .get(date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tasks of one lane on `date`, in display order.
    pub fn lane(&self, date: &str, task_type: TaskType) -> Vec<&Task> {
        self.tasks_for_date(date)
            .iter()
            .filter(|task| task.task_type == task_type)
            .collect()
    }

    pub fn power_task(&self, date: &str) -> Option<&Task> {
        self.tasks_for_date(date).iter().find(|task| task.is_power())
    }

    /// Looks up a task by ID across all dates.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks_by_date
            .values()
            .flat_map(|tasks| tasks.iter())
            .find(|task| task.id == task_id)
    }

    /// Dates that currently hold tasks, ascending.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.tasks_by_date.keys().map(String::as_str)
    }

    /// Read-only view of the whole mapping for rendering.
    pub fn tasks_by_date(&self) -> &BTreeMap<DateKey, Vec<Task>> {
        &self.tasks_by_date
    }

    /// Total number of tasks across all dates.
    pub fn len(&self) -> usize {
        self.tasks_by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks_by_date.is_empty()
    }

    fn has_other_power_task(&self, date: &str, task_id: &str) -> bool {
        self.tasks_for_date(date)
            .iter()
            .any(|task| task.is_power() && task.id != task_id)
    }

    fn locate(&self, task_id: &str) -> Option<(DateKey, usize)> {
        self.tasks_by_date.iter().find_map(|(date, tasks)| {
            tasks
                .iter()
                .position(|task| task.id == task_id)
                .map(|index| (date.clone(), index))
        })
    }

    fn find_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks_by_date
            .values_mut()
            .flat_map(|tasks| tasks.iter_mut())
            .find(|task| task.id == task_id)
    }

    fn take(&mut self, date: &str, index: usize) -> Option<Task> {
        let tasks = self.tasks_by_date.get_mut(date)?;
        if index >= tasks.len() {
            return None;
        }
        let task = tasks.remove(index);
        if tasks.is_empty() {
            self.tasks_by_date.remove(date);
        }
        Some(task)
    }
}

fn ensure_date_key(event: &str, date: &str) -> StoreResult<()> {
    if is_valid_date_key(date) {
        Ok(())
    } else {
        Err(reject(event, Rejection::InvalidDateKey(date.to_string())))
    }
}

fn reject(event: &str, rejection: Rejection) -> Rejection {
    debug!(
        "event={} module=tasks status=rejected reason={}",
        event,
        rejection.code()
    );
    rejection
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::model::task::TaskType;
    use crate::store::rejection::Rejection;

    #[test]
    fn demo_day_has_exactly_one_power_task() {
        let store = TaskStore::with_demo_tasks();
        let tasks = store.tasks_for_date("2025-05-01");
        assert_eq!(tasks.len(), 6);
        assert_eq!(tasks.iter().filter(|task| task.is_power()).count(), 1);
        assert_eq!(tasks[0].id, "task_1");
    }

    #[test]
    fn with_tasks_drops_empty_lists() {
        let mut initial = std::collections::BTreeMap::new();
        initial.insert("2025-05-02".to_string(), Vec::new());
        let store = TaskStore::with_tasks(initial);
        assert!(store.is_empty());
        assert_eq!(store.dates().count(), 0);
    }

    #[test]
    fn take_out_of_range_keeps_state() {
        let mut store = TaskStore::with_demo_tasks();
        assert!(store.take("2025-05-01", 42).is_none());
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn add_rejects_malformed_date_before_touching_state() {
        let mut store = TaskStore::new();
        let err = store
            .add_task("05/01/2025", "Plan launch", TaskType::Primary, None)
            .unwrap_err();
        assert_eq!(err, Rejection::InvalidDateKey("05/01/2025".to_string()));
        assert!(store.is_empty());
    }
}
