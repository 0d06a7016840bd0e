//! CLI smoke entry point.
//!
//! Prints the demo planner so core linkage can be checked without the
//! Flutter runtime. Output is deterministic apart from generated goal IDs,
//! which are not printed.

use warmap_core::{Planner, Quarter};

fn main() {
    println!("warmap_core ping={}", warmap_core::ping());
    println!("warmap_core version={}", warmap_core::core_version());

    let planner = Planner::demo();
    for date in planner.tasks.dates() {
        let tasks = planner.tasks.tasks_for_date(date);
        let power = planner
            .tasks
            .power_task(date)
            .map_or("-", |task| task.title.as_str());
        println!("tasks date={} count={} power={}", date, tasks.len(), power);
    }
    for quarter in Quarter::ALL {
        println!(
            "goals quarter={} months={} count={}",
            quarter,
            quarter.months().join(","),
            planner.goals.goals(quarter).len()
        );
    }
    println!("palette colors={}", planner.colors.palette().len());
}
