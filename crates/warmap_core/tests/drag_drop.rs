use std::collections::BTreeMap;
use warmap_core::{
    resolve_drop, DropCommand, DropError, DropLocation, DropOutcome, DropRejection, DropResult,
    DropView, GoalStore, Planner, Quarter, Rejection, Task, TaskStore, TaskType,
};

const DAY: &str = "2025-05-01";

fn drop_event(from: (&str, usize), to: Option<(&str, usize)>, dragged_id: &str) -> DropResult {
    DropResult {
        source: DropLocation::new(from.0, from.1),
        destination: to.map(|(container, index)| DropLocation::new(container, index)),
        dragged_id: dragged_id.to_string(),
    }
}

fn ids(planner: &Planner, date: &str) -> Vec<String> {
    planner
        .tasks
        .tasks_for_date(date)
        .iter()
        .map(|task| task.id.clone())
        .collect()
}

#[test]
fn same_position_drop_makes_no_store_call() {
    let mut planner = Planner::demo();
    let before = planner.tasks.clone();

    let outcome = planner.handle_drop(&drop_event((DAY, 0), Some((DAY, 0)), "task_1"), None);
    assert_eq!(outcome, Ok(DropOutcome::Unchanged));
    assert_eq!(planner.tasks, before);
}

#[test]
fn drop_outside_every_list_is_ignored() {
    let mut planner = Planner::demo();
    let outcome = planner.handle_drop(&drop_event((DAY, 2), None, "task_3"), Some(DAY));
    assert_eq!(outcome, Ok(DropOutcome::Unchanged));
}

#[test]
fn date_list_drop_reorders_in_place() {
    let mut planner = Planner::demo();
    let outcome = planner.handle_drop(&drop_event((DAY, 5), Some((DAY, 0)), "task_6"), None);

    assert_eq!(outcome, Ok(DropOutcome::Applied));
    assert_eq!(
        ids(&planner, DAY),
        vec!["task_6", "task_1", "task_2", "task_3", "task_4", "task_5"]
    );
}

#[test]
fn primary_lane_drop_keeps_power_task_in_place() {
    let mut planner = Planner::demo();
    // Primary lane: task_2..task_6. Move the last one to the lane's top.
    let outcome = planner.handle_drop(
        &drop_event(("primary-tasks", 4), Some(("primary-tasks", 0)), "task_6"),
        Some(DAY),
    );

    assert_eq!(outcome, Ok(DropOutcome::Applied));
    assert_eq!(
        ids(&planner, DAY),
        vec!["task_1", "task_6", "task_2", "task_3", "task_4", "task_5"]
    );
    let lane = planner
        .tasks
        .lane(DAY, TaskType::Primary)
        .into_iter()
        .map(|task| task.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(lane[0], "task_6");
}

#[test]
fn lane_drop_past_the_end_moves_to_lane_bottom() {
    let mut planner = Planner::demo();
    planner.handle_drop(
        &drop_event(("primary-tasks", 0), Some(("primary-tasks", 9)), "task_2"),
        Some(DAY),
    )
    .unwrap();
    assert_eq!(ids(&planner, DAY).last().map(String::as_str), Some("task_2"));
}

#[test]
fn demoting_power_task_then_promoting_another() {
    let mut planner = Planner::demo();
    planner
        .handle_drop(
            &drop_event(("power-tasks", 0), Some(("primary-tasks", 2)), "task_1"),
            Some(DAY),
        )
        .unwrap();
    assert!(planner.tasks.power_task(DAY).is_none());
    // Retyping keeps the position in the date list.
    assert_eq!(ids(&planner, DAY)[0], "task_1");

    planner
        .handle_drop(
            &drop_event(("primary-tasks", 3), Some(("power-tasks", 0)), "task_4"),
            Some(DAY),
        )
        .unwrap();
    assert_eq!(planner.tasks.power_task(DAY).unwrap().id, "task_4");
}

#[test]
fn promotion_into_occupied_power_lane_snaps_back() {
    let mut planner = Planner::demo();
    let before = planner.tasks.clone();

    let outcome = planner.handle_drop(
        &drop_event(("primary-tasks", 0), Some(("power-tasks", 0)), "task_2"),
        Some(DAY),
    );
    assert_eq!(
        outcome,
        Err(DropError::Rejected(DropRejection::PowerLaneOccupied(
            DAY.to_string()
        )))
    );
    assert_eq!(planner.tasks, before);
}

#[test]
fn cross_date_drop_moves_task_at_index() {
    let mut planner = Planner::demo();
    planner
        .tasks
        .add_task("2025-05-02", "Existing", TaskType::Primary, None)
        .unwrap();

    planner
        .handle_drop(
            &drop_event((DAY, 2), Some(("2025-05-02", 0)), "task_3"),
            None,
        )
        .unwrap();
    assert_eq!(ids(&planner, "2025-05-02")[0], "task_3");
    assert_eq!(planner.tasks.task("task_3").unwrap().date, "2025-05-02");
    assert_eq!(planner.tasks.tasks_for_date(DAY).len(), 5);
}

#[test]
fn cross_date_power_drop_onto_date_with_power_is_rejected() {
    let mut initial = BTreeMap::new();
    initial.insert(
        "2025-05-01".to_string(),
        vec![Task::with_id("p1", "2025-05-01", "One", TaskType::Power)],
    );
    initial.insert(
        "2025-05-02".to_string(),
        vec![Task::with_id("p2", "2025-05-02", "Two", TaskType::Power)],
    );
    let tasks = TaskStore::with_tasks(initial);
    let goals = GoalStore::new();
    let view = DropView {
        tasks: &tasks,
        goals: &goals,
        focused_date: None,
    };

    assert_eq!(
        resolve_drop(
            &drop_event(("2025-05-01", 0), Some(("2025-05-02", 1)), "p1"),
            &view
        ),
        DropCommand::Reject(DropRejection::PowerLaneOccupied("2025-05-02".to_string()))
    );
}

#[test]
fn goal_drop_reorders_within_quarter_only() {
    let mut planner = Planner::demo();
    let q1 = planner.goals.goals(Quarter::Q1).to_vec();

    planner
        .handle_drop(
            &drop_event(("goals-q1", 1), Some(("goals-q1", 0)), &q1[1].id),
            None,
        )
        .unwrap();
    assert_eq!(planner.goals.goals(Quarter::Q1)[0].id, q1[1].id);

    let cross = planner.handle_drop(
        &drop_event(("goals-q1", 0), Some(("goals-q2", 0)), &q1[1].id),
        None,
    );
    assert_eq!(cross, Err(DropError::Rejected(DropRejection::Unsupported)));
    assert_eq!(planner.goals.goals(Quarter::Q2).len(), 1);
}

#[test]
fn store_refusal_surfaces_as_store_error() {
    let mut tasks = TaskStore::with_demo_tasks();
    let mut goals = GoalStore::new();
    let command = DropCommand::ReorderTasks {
        date: "2025-05-09".to_string(),
        from: 0,
        to: 1,
    };

    assert_eq!(
        warmap_core::apply_drop(&command, &mut tasks, &mut goals),
        Err(DropError::Store(Rejection::DateNotFound(
            "2025-05-09".to_string()
        )))
    );
}

#[test]
fn drop_result_reads_drag_engine_json() {
    let json = r#"{
        "source": { "containerId": "2025-05-01", "index": 1 },
        "destination": null,
        "draggedId": "task_2"
    }"#;
    let event: DropResult = serde_json::from_str(json).unwrap();
    assert_eq!(event.source, DropLocation::new("2025-05-01", 1));
    assert_eq!(event.destination, None);
    assert_eq!(event.dragged_id, "task_2");
}
