use super::WorkloadScheduler;
use crate::domain::capacity::{ResourceCapacity, WeeklyCeiling};
use crate::domain::task::MaintenanceTask;
use crate::engine::error::ErrorKind;

// ==========================================
// 测试辅助函数
// ==========================================

fn task(id: &str, frequency_months: f64, hours: f64, executors: u32, start_week: u32) -> MaintenanceTask {
    MaintenanceTask {
        id: id.to_string(),
        asset_id: format!("A-{}", id),
        frequency_months,
        estimated_duration_hours: hours,
        executor_count: executors,
        start_week,
        trade: None,
    }
}

// ==========================================
// 负荷预测
// ==========================================

#[test]
fn test_project_monthly_task() {
    let scheduler = WorkloadScheduler::new();
    let profile = scheduler.project(&[task("T1", 1.0, 10.0, 2, 1)]).unwrap();

    assert_eq!(profile.weeks.len(), 52);
    let loaded: Vec<u32> = profile
        .weeks
        .iter()
        .filter(|w| w.hours > 0.0)
        .map(|w| w.week)
        .collect();
    assert_eq!(loaded, (1..=49).step_by(4).collect::<Vec<u32>>());
    assert_eq!(loaded.len(), 13);
    for w in &profile.weeks {
        if loaded.contains(&w.week) {
            assert_eq!(w.hours, 20.0);
            assert_eq!(w.task_count, 1);
        } else {
            assert_eq!(w.hours, 0.0);
            assert_eq!(w.task_count, 0);
        }
    }
    assert_eq!(profile.total_hours, 260.0);
}

#[test]
fn test_project_rejects_invalid_tasks() {
    let scheduler = WorkloadScheduler::new();
    let cases = vec![
        task("F0", 0.0, 1.0, 1, 1),
        task("FN", -2.0, 1.0, 1, 1),
        task("DN", 1.0, -1.0, 1, 1),
        task("E0", 1.0, 1.0, 0, 1),
        task("W0", 1.0, 1.0, 1, 0),
        task("W53", 1.0, 1.0, 1, 53),
    ];
    for t in cases {
        let err = scheduler.project(&[t]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}

#[test]
fn test_project_does_not_mutate_tasks() {
    let scheduler = WorkloadScheduler::new();
    let tasks = vec![task("T1", 3.0, 4.0, 1, 7)];
    let snapshot = tasks.clone();
    let _ = scheduler.project(&tasks).unwrap();
    let _ = scheduler.level(&tasks, &WeeklyCeiling(100.0)).unwrap();
    assert_eq!(tasks, snapshot);
}

// ==========================================
// 负荷平衡
// ==========================================

#[test]
fn test_level_separates_conflicting_annual_tasks() {
    let scheduler = WorkloadScheduler::new();
    let tasks = vec![task("A", 12.0, 10.0, 2, 1), task("B", 12.0, 20.0, 1, 1)];

    let result = scheduler.level(&tasks, &WeeklyCeiling(15.0)).unwrap();
    let a = result.assignment("A").unwrap().start_week;
    let b = result.assignment("B").unwrap().start_week;
    assert_ne!(a, b);
    assert_eq!(result.profile.peak_hours, 20.0);

    // 单次 20h > 15h: 两个任务都无法平衡
    let mut ids = result.unschedulable_task_ids();
    ids.sort();
    assert_eq!(ids, vec!["A", "B"]);
    assert!(result.ensure_within_capacity().is_err());
}

#[test]
fn test_level_reports_overload_when_no_free_offset() {
    let scheduler = WorkloadScheduler::new();
    // 频率 0.1 月 -> 周期 1 周,每周都执行
    let tasks = vec![task("A", 0.1, 10.0, 1, 1), task("B", 0.1, 10.0, 1, 1)];

    let result = scheduler.level(&tasks, &WeeklyCeiling(15.0)).unwrap();
    assert_eq!(result.overloaded_weeks().len(), 52);
    assert!(result.unschedulable_task_ids().is_empty());
    let err = result.ensure_within_capacity().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
}

#[test]
fn test_level_reduces_peak() {
    let scheduler = WorkloadScheduler::new();
    let tasks: Vec<MaintenanceTask> = (0..4)
        .map(|i| task(&format!("T{}", i), 1.0, 5.0, 1, 1))
        .collect();

    let result = scheduler.level(&tasks, &WeeklyCeiling(8.0)).unwrap();
    assert_eq!(result.baseline.peak_hours, 20.0);
    assert_eq!(result.profile.peak_hours, 5.0);
    assert!(result.is_within_capacity());
    assert!(result.profile.peak_to_average < result.baseline.peak_to_average);

    let mut weeks: Vec<u32> = result.assignments.iter().map(|a| a.start_week).collect();
    weeks.sort();
    assert_eq!(weeks, vec![1, 2, 3, 4]);
}

#[test]
fn test_level_is_reproducible() {
    let scheduler = WorkloadScheduler::new();
    let tasks = vec![
        task("P1", 1.0, 6.0, 2, 3),
        task("P2", 3.0, 8.0, 1, 1),
        task("P3", 6.0, 4.0, 3, 10),
        task("P4", 0.5, 2.0, 1, 1),
        task("P5", 12.0, 16.0, 2, 20),
    ];
    let first = scheduler.level(&tasks, &WeeklyCeiling(40.0)).unwrap();
    let second = scheduler.level(&tasks, &WeeklyCeiling(40.0)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_level_keeps_current_week_on_tie() {
    let scheduler = WorkloadScheduler::new();
    let tasks = vec![task("ONLY", 12.0, 4.0, 1, 30)];
    let result = scheduler.level(&tasks, &WeeklyCeiling(10.0)).unwrap();
    assert_eq!(result.assignment("ONLY").unwrap().start_week, 30);
    assert!(!result.assignment("ONLY").unwrap().moved());
}

#[test]
fn test_apply_assignments_returns_new_tasks() {
    let scheduler = WorkloadScheduler::new();
    let tasks = vec![task("A", 12.0, 10.0, 1, 1), task("B", 12.0, 10.0, 1, 1)];
    let result = scheduler.level(&tasks, &WeeklyCeiling(15.0)).unwrap();
    let updated = scheduler.apply_assignments(&tasks, &result);

    assert_eq!(tasks[1].start_week, 1);
    assert_ne!(updated[0].start_week, updated[1].start_week);
    let reprojected = scheduler.project(&updated).unwrap();
    assert_eq!(reprojected, result.profile);
}

#[test]
fn test_level_by_trade_isolates_failures() {
    let scheduler = WorkloadScheduler::new();
    let mut mech = task("M1", 1.0, 4.0, 1, 1);
    mech.trade = Some("MECH".to_string());
    let mut elec = task("E1", 1.0, 4.0, 1, 1);
    elec.trade = Some("ELEC".to_string());

    let capacities = vec![ResourceCapacity {
        trade: "MECH".to_string(),
        headcount: 2,
        weekly_hours_per_person: 40.0,
        utilization_rate: 0.5,
    }];

    let results = scheduler.level_by_trade(&[mech, elec], &capacities);
    assert!(results["MECH"].is_ok());
    assert_eq!(
        results["ELEC"].as_ref().unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}
