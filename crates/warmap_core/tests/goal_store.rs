use std::collections::BTreeMap;
use warmap_core::{Goal, GoalStore, Quarter, Rejection};

fn titles(store: &GoalStore, quarter: Quarter) -> Vec<String> {
    store
        .goals(quarter)
        .iter()
        .map(|goal| goal.title.clone())
        .collect()
}

#[test]
fn add_appends_trimmed_open_goal() {
    let mut store = GoalStore::with_demo_goals();
    let id = store.add_goal(Quarter::Q2, "  Hire designer ").unwrap();

    let goals = store.goals(Quarter::Q2);
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[1].id, id);
    assert_eq!(goals[1].title, "Hire designer");
    assert!(!goals[1].completed);
    assert!(id.starts_with("goal_"));
}

#[test]
fn add_rejects_blank_title() {
    let mut store = GoalStore::new();
    assert_eq!(store.add_goal(Quarter::Q1, " "), Err(Rejection::BlankTitle));
    assert!(store.goals(Quarter::Q1).is_empty());
}

#[test]
fn remove_is_scoped_to_quarter() {
    let mut store = GoalStore::with_demo_goals();
    let q1_goal = store.goals(Quarter::Q1)[0].id.clone();

    assert_eq!(
        store.remove_goal(Quarter::Q2, &q1_goal),
        Err(Rejection::GoalNotFound {
            quarter: Quarter::Q2,
            goal_id: q1_goal.clone(),
        })
    );
    assert_eq!(store.goals(Quarter::Q1).len(), 2);

    let removed = store.remove_goal(Quarter::Q1, &q1_goal).unwrap();
    assert_eq!(removed.title, "Register cosmetic formula");
    assert_eq!(titles(&store, Quarter::Q1), vec!["Launch new product line"]);
    assert!(store.remove_goal(Quarter::Q1, &q1_goal).is_err());
}

#[test]
fn update_goal_order_replaces_list_wholesale() {
    let mut store = GoalStore::with_demo_goals();
    let mut reversed = store.goals(Quarter::Q4).to_vec();
    reversed.reverse();

    store.update_goal_order(Quarter::Q4, reversed.clone());
    assert_eq!(store.goals(Quarter::Q4), reversed.as_slice());
}

#[test]
fn reorder_goals_moves_and_clamps() {
    let mut initial = BTreeMap::new();
    initial.insert(
        Quarter::Q3,
        vec![Goal::new("A"), Goal::new("B"), Goal::new("C")],
    );
    let mut store = GoalStore::with_goals(initial);

    store.reorder_goals(Quarter::Q3, 0, 2).unwrap();
    assert_eq!(titles(&store, Quarter::Q3), vec!["B", "C", "A"]);
    store.reorder_goals(Quarter::Q3, 2, 0).unwrap();
    assert_eq!(titles(&store, Quarter::Q3), vec!["A", "B", "C"]);
    store.reorder_goals(Quarter::Q3, 1, 50).unwrap();
    assert_eq!(titles(&store, Quarter::Q3), vec!["A", "C", "B"]);

    assert_eq!(
        store.reorder_goals(Quarter::Q1, 0, 1),
        Err(Rejection::IndexOutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn completion_and_title_updates() {
    let mut store = GoalStore::with_demo_goals();
    let id = store.goals(Quarter::Q3)[0].id.clone();

    store.update_goal_completion(Quarter::Q3, &id, true).unwrap();
    store
        .update_goal_title(Quarter::Q3, &id, "Review H1 numbers")
        .unwrap();
    let goal = store.goal(Quarter::Q3, &id).unwrap();
    assert!(goal.completed);
    assert_eq!(goal.title, "Review H1 numbers");

    assert_eq!(
        store.update_goal_title(Quarter::Q3, &id, "\t"),
        Err(Rejection::BlankTitle)
    );
    assert!(store
        .update_goal_completion(Quarter::Q4, &id, false)
        .is_err());
    assert!(store.goal(Quarter::Q3, &id).unwrap().completed);
}

#[test]
fn demo_goal_ids_are_unique() {
    let store = GoalStore::with_demo_goals();
    let mut ids = store
        .goals_by_quarter()
        .values()
        .flatten()
        .map(|goal| goal.id.clone())
        .collect::<Vec<_>>();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
