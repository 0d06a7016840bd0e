//! Quarter-bucketed goal store.
//!
//! # Responsibility
//! - Own the `quarter -> ordered goal list` mapping for the macro view.
//! - Provide add, remove, retitle, complete and reorder APIs.
//!
//! # Invariants
//! - Goal order inside a quarter is the display and drag order.
//! - Rejected calls never mutate state.

use crate::model::goal::{Goal, GoalId, Quarter};
use crate::model::task::normalize_title;
use crate::store::ordering::move_within;
use crate::store::rejection::{Rejection, StoreResult};
use log::{debug, info};
use std::collections::BTreeMap;

/// In-memory goal state keyed by quarter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalStore {
    goals_by_quarter: BTreeMap<Quarter, Vec<Goal>>,
}

impl GoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from caller-provided initial state.
    pub fn with_goals(goals_by_quarter: BTreeMap<Quarter, Vec<Goal>>) -> Self {
        Self { goals_by_quarter }
    }

    /// Creates a store seeded with the demo yearly plan.
    pub fn with_demo_goals() -> Self {
        let seed = [
            (
                Quarter::Q1,
                vec!["Register cosmetic formula", "Launch new product line"],
            ),
            (Quarter::Q2, vec!["Expand to international markets"]),
            (Quarter::Q3, vec!["Review first half performance"]),
            (
                Quarter::Q4,
                vec!["Prepare annual report", "Plan next year strategy"],
            ),
        ];
        let goals_by_quarter = seed
            .into_iter()
            .map(|(quarter, titles)| {
                let goals = titles.iter().map(|title| Goal::new(*title)).collect();
                (quarter, goals)
            })
            .collect();
        Self::with_goals(goals_by_quarter)
    }

    /// Appends an open goal to `quarter`, returning its new ID.
    pub fn add_goal(&mut self, quarter: Quarter, title: &str) -> StoreResult<GoalId> {
        let title =
            normalize_title(title).ok_or_else(|| reject("goal_add", Rejection::BlankTitle))?;
        let goal = Goal::new(title);
        let goal_id = goal.id.clone();
        self.goals_by_quarter.entry(quarter).or_default().push(goal);
        info!(
            "event=goal_add module=goals status=ok quarter={} goal_id={}",
            quarter, goal_id
        );
        Ok(goal_id)
    }

    /// Removes a goal from `quarter` and returns it.
    pub fn remove_goal(&mut self, quarter: Quarter, goal_id: &str) -> StoreResult<Goal> {
        let goals = self
            .goals_by_quarter
            .get_mut(&quarter)
            .ok_or_else(|| reject("goal_remove", not_found(quarter, goal_id)))?;
        let index = goals
            .iter()
            .position(|goal| goal.id == goal_id)
            .ok_or_else(|| reject("goal_remove", not_found(quarter, goal_id)))?;
        let goal = goals.remove(index);
        info!(
            "event=goal_remove module=goals status=ok quarter={} goal_id={}",
            quarter, goal_id
        );
        Ok(goal)
    }

    /// Replaces the quarter's list wholesale with a caller-computed order.
    pub fn update_goal_order(&mut self, quarter: Quarter, reordered: Vec<Goal>) {
        debug!(
            "event=goal_order module=goals status=ok quarter={} count={}",
            quarter,
            reordered.len()
        );
        self.goals_by_quarter.insert(quarter, reordered);
    }

    /// Moves the goal at `from` to `to` inside `quarter`.
    ///
    /// Uses the same splice semantics as task reordering; `to` is clamped.
    pub fn reorder_goals(&mut self, quarter: Quarter, from: usize, to: usize) -> StoreResult<()> {
        let mut reordered = self.goals(quarter).to_vec();
        move_within(&mut reordered, from, to).map_err(|err| reject("goal_reorder", err))?;
        self.update_goal_order(quarter, reordered);
        Ok(())
    }

    /// Sets the completion flag of a goal.
    pub fn update_goal_completion(
        &mut self,
        quarter: Quarter,
        goal_id: &str,
        completed: bool,
    ) -> StoreResult<()> {
        let goal = self
            .find_mut(quarter, goal_id)
            .ok_or_else(|| reject("goal_complete", not_found(quarter, goal_id)))?;
        goal.completed = completed;
        debug!(
            "event=goal_complete module=goals status=ok quarter={} goal_id={} completed={}",
            quarter, goal_id, completed
        );
        Ok(())
    }

    /// Replaces a goal title; blank titles are rejected.
    pub fn update_goal_title(
        &mut self,
        quarter: Quarter,
        goal_id: &str,
        title: &str,
    ) -> StoreResult<()> {
        let title =
            normalize_title(title).ok_or_else(|| reject("goal_retitle", Rejection::BlankTitle))?;
        let goal = self
            .find_mut(quarter, goal_id)
            .ok_or_else(|| reject("goal_retitle", not_found(quarter, goal_id)))?;
        goal.title = title;
        Ok(())
    }

    /// Goals of `quarter` in display order (empty when none).
    pub fn goals(&self, quarter: Quarter) -> &[Goal] {
        self.goals_by_quarter
            .get(&quarter)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn goal(&self, quarter: Quarter, goal_id: &str) -> Option<&Goal> {
        self.goals(quarter).iter().find(|goal| goal.id == goal_id)
    }

    /// Read-only view of the whole mapping for rendering.
    pub fn goals_by_quarter(&self) -> &BTreeMap<Quarter, Vec<Goal>> {
        &self.goals_by_quarter
    }

    fn find_mut(&mut self, quarter: Quarter, goal_id: &str) -> Option<&mut Goal> {
        self.goals_by_quarter
            .get_mut(&quarter)?
            .iter_mut()
            .find(|goal| goal.id == goal_id)
    }
}

fn not_found(quarter: Quarter, goal_id: &str) -> Rejection {
    Rejection::GoalNotFound {
        quarter,
        goal_id: goal_id.to_string(),
    }
}

fn reject(event: &str, rejection: Rejection) -> Rejection {
    debug!(
        "event={} module=goals status=rejected reason={}",
        event,
        rejection.code()
    );
    rejection
}

#[cfg(test)]
mod tests {
    use super::GoalStore;
    use crate::model::goal::Quarter;

    #[test]
    fn demo_plan_covers_every_quarter() {
        let store = GoalStore::with_demo_goals();
        let counts = Quarter::ALL
            .iter()
            .map(|quarter| store.goals(*quarter).len())
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![2, 1, 1, 2]);
        assert!(store
            .goals_by_quarter()
            .values()
            .flatten()
            .all(|goal| !goal.completed));
    }

    #[test]
    fn reorder_rejection_keeps_order() {
        let mut store = GoalStore::with_demo_goals();
        let before = store.goals(Quarter::Q1).to_vec();
        assert!(store.reorder_goals(Quarter::Q1, 5, 0).is_err());
        assert_eq!(store.goals(Quarter::Q1), before.as_slice());
    }
}
