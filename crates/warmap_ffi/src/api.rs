//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose planner operations to Dart via FRB as sync calls.
//! - Own the single process-wide `Planner` session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every rejected operation returns `ok = false` and leaves state unchanged.
//! - Calls are serialized through one mutex.

use log::warn;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use warmap_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ColorDefinition, ColorStore, DropLocation, DropOutcome, DropResult, Goal, GoalStore,
    KeyValueStorage, MemoryKeyValueStorage, Planner, Quarter, SqliteKeyValueStorage, Task,
    TaskStore, TaskType,
};

const DB_FILE_NAME: &str = "warmap.sqlite3";
const DB_PATH_ENV: &str = "WARMAP_DB_PATH";
static PLANNER: OnceLock<Mutex<Planner>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&level, &log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task row for the daily and monthly views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub completed: bool,
    /// `power|primary`.
    pub task_type: String,
}

/// Goal row for the macro view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorItem {
    pub name: String,
    pub color: String,
}

/// One painted day of a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColorItem {
    pub day: u32,
    pub color: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerActionResponse {
    /// Whether the operation changed state as requested.
    pub ok: bool,
    /// Created or affected item, when the operation has one.
    pub item_id: Option<String>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl PlannerActionResponse {
    fn success(message: impl Into<String>, item_id: Option<String>) -> Self {
        Self {
            ok: true,
            item_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Adds a task on `date`; `task_type` is `power|primary`.
///
/// A power task requested for a date that already has one is stored as a
/// primary task. `position = None` appends.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    date: String,
    title: String,
    task_type: String,
    position: Option<u32>,
) -> PlannerActionResponse {
    let task_type = match parse_task_type("task_add", &task_type) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("task_add", "Task added.", |planner| {
        planner
            .tasks
            .add_task(&date, &title, task_type, position.map(|value| value as usize))
            .map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(task_id: String) -> PlannerActionResponse {
    run_action("task_remove", "Task removed.", |planner| {
        planner.tasks.remove_task(&task_id).map(|task| Some(task.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_completed(task_id: String, completed: bool) -> PlannerActionResponse {
    run_action("task_set_completed", "Task updated.", |planner| {
        planner
            .tasks
            .update_task_completion(&task_id, completed)
            .map(|()| Some(task_id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_title(task_id: String, title: String) -> PlannerActionResponse {
    run_action("task_set_title", "Task renamed.", |planner| {
        planner
            .tasks
            .update_task_title(&task_id, &title)
            .map(|()| Some(task_id.clone()))
    })
}

/// Changes a task's lane; promotion fails while the date has a power task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_type(task_id: String, task_type: String) -> PlannerActionResponse {
    let task_type = match parse_task_type("task_set_type", &task_type) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("task_set_type", "Task type updated.", |planner| {
        planner
            .tasks
            .update_task_type(&task_id, task_type)
            .map(|()| Some(task_id.clone()))
    })
}

/// Moves a task to another date; the index is clamped to the target list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_move(task_id: String, new_date: String, new_index: u32) -> PlannerActionResponse {
    run_action("task_move", "Task moved.", |planner| {
        planner
            .tasks
            .move_task(&task_id, &new_date, new_index as usize)
            .map(|_| Some(task_id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_reorder(date: String, start_index: u32, end_index: u32) -> PlannerActionResponse {
    run_action("task_reorder", "Tasks reordered.", |planner| {
        planner
            .tasks
            .reorder_tasks(&date, start_index as usize, end_index as usize)
            .map(|()| None)
    })
}

/// Tasks of `date` in display order; empty on any failure.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_for_date(date: String) -> Vec<TaskItem> {
    read_planner(|planner| {
        planner
            .tasks
            .tasks_for_date(&date)
            .iter()
            .map(to_task_item)
            .collect()
    })
}

/// Adds a goal; `quarter` is `q1..q4`.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(quarter: String, title: String) -> PlannerActionResponse {
    let quarter = match parse_quarter("goal_add", &quarter) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("goal_add", "Goal added.", |planner| {
        planner.goals.add_goal(quarter, &title).map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_remove(quarter: String, goal_id: String) -> PlannerActionResponse {
    let quarter = match parse_quarter("goal_remove", &quarter) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("goal_remove", "Goal removed.", |planner| {
        planner
            .goals
            .remove_goal(quarter, &goal_id)
            .map(|goal| Some(goal.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_set_completed(
    quarter: String,
    goal_id: String,
    completed: bool,
) -> PlannerActionResponse {
    let quarter = match parse_quarter("goal_set_completed", &quarter) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("goal_set_completed", "Goal updated.", |planner| {
        planner
            .goals
            .update_goal_completion(quarter, &goal_id, completed)
            .map(|()| Some(goal_id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_set_title(quarter: String, goal_id: String, title: String) -> PlannerActionResponse {
    let quarter = match parse_quarter("goal_set_title", &quarter) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("goal_set_title", "Goal renamed.", |planner| {
        planner
            .goals
            .update_goal_title(quarter, &goal_id, &title)
            .map(|()| Some(goal_id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_reorder(quarter: String, from_index: u32, to_index: u32) -> PlannerActionResponse {
    let quarter = match parse_quarter("goal_reorder", &quarter) {
        Ok(value) => value,
        Err(response) => return response,
    };
    run_action("goal_reorder", "Goals reordered.", |planner| {
        planner
            .goals
            .reorder_goals(quarter, from_index as usize, to_index as usize)
            .map(|()| None)
    })
}

/// Goals of `quarter` in display order; empty for unknown quarters.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_for_quarter(quarter: String) -> Vec<GoalItem> {
    let Some(quarter) = Quarter::parse(quarter.trim()) else {
        return Vec::new();
    };
    read_planner(|planner| {
        planner
            .goals
            .goals(quarter)
            .iter()
            .map(to_goal_item)
            .collect()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn color_list() -> Vec<ColorItem> {
    read_planner(|planner| {
        planner
            .colors
            .palette()
            .iter()
            .map(|definition| ColorItem {
                name: definition.name.clone(),
                color: definition.color.clone(),
            })
            .collect()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn color_add(name: String, color: String) -> PlannerActionResponse {
    run_action("color_add", "Color added.", |planner| {
        planner
            .colors
            .add_color(ColorDefinition::new(name.as_str(), color.as_str()))
            .map(|()| None)
    })
}

/// Selects `color` as the paint color, or clears it when already active.
///
/// `item_id` carries the active color after the toggle.
#[flutter_rust_bridge::frb(sync)]
pub fn color_toggle_active(color: String) -> PlannerActionResponse {
    match with_planner(|planner| planner.colors.toggle_active_color(&color).map(str::to_string)) {
        Ok(Some(active)) => PlannerActionResponse::success("Color selected.", Some(active)),
        Ok(None) => PlannerActionResponse::success("Color cleared.", None),
        Err(err) => PlannerActionResponse::failure(format!("color_toggle_active failed: {err}")),
    }
}

/// Applies one day click; `extend` is the shift-click modifier.
#[flutter_rust_bridge::frb(sync)]
pub fn day_select(month: String, day: u32, extend: bool) -> PlannerActionResponse {
    run_action("day_select", "Selection updated.", |planner| {
        planner.colors.select_day(&month, day, extend).map(|()| None)
    })
}

/// Paints the pending selection with the active color.
#[flutter_rust_bridge::frb(sync)]
pub fn paint_commit() -> PlannerActionResponse {
    run_action("paint_commit", "Days painted.", |planner| {
        planner
            .colors
            .commit_paint()
            .map(|count| Some(count.to_string()))
    })
}

/// Painted days of `month` in ascending day order.
#[flutter_rust_bridge::frb(sync)]
pub fn day_colors_for_month(month: String) -> Vec<DayColorItem> {
    read_planner(|planner| {
        planner
            .colors
            .day_colors_for_month(&month)
            .into_iter()
            .map(|(day, color)| DayColorItem { day, color })
            .collect()
    })
}

/// Applies one drag-end event.
///
/// `destination_container = None` means the item was released outside every
/// list. `focused_date` is the date the daily view shows.
#[flutter_rust_bridge::frb(sync)]
pub fn drop_apply(
    source_container: String,
    source_index: u32,
    destination_container: Option<String>,
    destination_index: u32,
    dragged_id: String,
    focused_date: Option<String>,
) -> PlannerActionResponse {
    let drop = DropResult {
        source: DropLocation::new(source_container, source_index as usize),
        destination: destination_container
            .map(|container| DropLocation::new(container, destination_index as usize)),
        dragged_id,
    };
    match with_planner(|planner| planner.handle_drop(&drop, focused_date.as_deref())) {
        Ok(Ok(DropOutcome::Applied)) => {
            PlannerActionResponse::success("Drop applied.", Some(drop.dragged_id.clone()))
        }
        Ok(Ok(DropOutcome::Unchanged)) => PlannerActionResponse::success("Nothing to do.", None),
        Ok(Err(err)) => PlannerActionResponse::failure(format!("drop_apply failed: {err}")),
        Err(err) => PlannerActionResponse::failure(format!("drop_apply failed: {err}")),
    }
}

fn run_action<E: Display>(
    operation: &str,
    success_message: &str,
    action: impl FnOnce(&mut Planner) -> Result<Option<String>, E>,
) -> PlannerActionResponse {
    match with_planner(|planner| action(planner).map_err(|err| err.to_string())) {
        Ok(Ok(item_id)) => PlannerActionResponse::success(success_message, item_id),
        Ok(Err(err)) | Err(err) => {
            PlannerActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn read_planner<T: Default>(read: impl FnOnce(&Planner) -> T) -> T {
    with_planner(|planner| read(planner)).unwrap_or_default()
}

fn with_planner<T>(f: impl FnOnce(&mut Planner) -> T) -> Result<T, String> {
    let session = PLANNER.get_or_init(|| Mutex::new(bootstrap_planner()));
    let mut planner = session
        .lock()
        .map_err(|_| "planner session is unavailable".to_string())?;
    Ok(f(&mut planner))
}

fn bootstrap_planner() -> Planner {
    Planner::new(
        TaskStore::with_demo_tasks(),
        GoalStore::with_demo_goals(),
        ColorStore::restore(open_color_storage()),
    )
}

fn open_color_storage() -> Box<dyn KeyValueStorage> {
    let db_path = resolve_db_path();
    match SqliteKeyValueStorage::open(&db_path) {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            warn!(
                "event=storage_open module=ffi status=fallback path={} error={}",
                db_path.display(),
                err
            );
            Box::new(MemoryKeyValueStorage::new())
        }
    }
}

fn resolve_db_path() -> PathBuf {
    std::env::var(DB_PATH_ENV)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

fn parse_task_type(operation: &str, value: &str) -> Result<TaskType, PlannerActionResponse> {
    TaskType::parse(value.trim()).ok_or_else(|| {
        PlannerActionResponse::failure(format!(
            "{operation} failed: unknown task type `{value}`; expected power|primary"
        ))
    })
}

fn parse_quarter(operation: &str, value: &str) -> Result<Quarter, PlannerActionResponse> {
    Quarter::parse(value.trim()).ok_or_else(|| {
        PlannerActionResponse::failure(format!(
            "{operation} failed: unknown quarter `{value}`; expected q1|q2|q3|q4"
        ))
    })
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        date: task.date.clone(),
        completed: task.completed,
        task_type: task.task_type.as_str().to_string(),
    }
}

fn to_goal_item(goal: &Goal) -> GoalItem {
    GoalItem {
        id: goal.id.clone(),
        title: goal.title.clone(),
        completed: goal.completed,
    }
}
