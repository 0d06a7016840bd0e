//! Rejection reasons shared by all planner stores.

use crate::model::goal::{GoalId, Quarter};
use crate::model::task::{DateKey, TaskId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by store mutations.
pub type StoreResult<T> = Result<T, Rejection>;

/// Why a store mutation did not happen.
///
/// The UI treats every variant the same way (nothing visibly changes); the
/// variant exists so callers and tests can tell rejections apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Title is blank after trim.
    BlankTitle,
    /// Color token is blank after trim.
    BlankColor,
    /// Date key is not `YYYY-MM-DD`.
    InvalidDateKey(String),
    /// Month id is not one of `Jan`..`Dec`.
    UnknownMonth(String),
    /// Day-of-month outside the month's grid.
    InvalidDay(u32),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Target goal does not exist in the given quarter.
    GoalNotFound { quarter: Quarter, goal_id: GoalId },
    /// No task list exists for the date.
    DateNotFound(DateKey),
    /// Index does not address an item of the list.
    IndexOutOfRange { index: usize, len: usize },
    /// Another task on the date is already the power task.
    PowerTaskTaken(DateKey),
    /// Painting requires an active color.
    NoActiveColor,
    /// Painting requires a month with a pending selection.
    NoPendingMonth,
    /// The pending month has no selected days.
    EmptySelection(String),
}

impl Rejection {
    /// Stable snake_case code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankTitle => "blank_title",
            Self::BlankColor => "blank_color",
            Self::InvalidDateKey(_) => "invalid_date_key",
            Self::UnknownMonth(_) => "unknown_month",
            Self::InvalidDay(_) => "invalid_day",
            Self::TaskNotFound(_) => "task_not_found",
            Self::GoalNotFound { .. } => "goal_not_found",
            Self::DateNotFound(_) => "date_not_found",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::PowerTaskTaken(_) => "power_task_taken",
            Self::NoActiveColor => "no_active_color",
            Self::NoPendingMonth => "no_pending_month",
            Self::EmptySelection(_) => "empty_selection",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::BlankColor => write!(f, "color must not be blank"),
            Self::InvalidDateKey(value) => {
                write!(f, "date key must be YYYY-MM-DD, got `{value}`")
            }
            Self::UnknownMonth(month) => write!(f, "unknown month: {month}"),
            Self::InvalidDay(day) => write!(f, "day of month out of range: {day}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::GoalNotFound { quarter, goal_id } => {
                write!(f, "goal not found in {quarter}: {goal_id}")
            }
            Self::DateNotFound(date) => write!(f, "no tasks scheduled on {date}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of {len}")
            }
            Self::PowerTaskTaken(date) => write!(f, "{date} already has a power task"),
            Self::NoActiveColor => write!(f, "no active color selected"),
            Self::NoPendingMonth => write!(f, "no month is waiting for paint"),
            Self::EmptySelection(month) => write!(f, "no days selected in {month}"),
        }
    }
}

impl Error for Rejection {}
