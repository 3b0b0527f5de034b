use crate::domain::task::{LoadProfile, MaintenanceTask, HORIZON_WEEKS};
use crate::engine::error::{ReliabilityError, ReliabilityResult};

/// 任务数值校验（入口处一次性完成）
pub fn validate_tasks(tasks: &[MaintenanceTask]) -> ReliabilityResult<()> {
    for task in tasks {
        let field = |name: &str| format!("task[{}].{}", task.id, name);

        if !task.frequency_months.is_finite() || task.frequency_months <= 0.0 {
            return Err(ReliabilityError::invalid_input(
                field("frequency_months"),
                format!("频率必须为正, 实际 {}", task.frequency_months),
            ));
        }
        if !task.estimated_duration_hours.is_finite() || task.estimated_duration_hours < 0.0 {
            return Err(ReliabilityError::invalid_input(
                field("estimated_duration_hours"),
                format!("时长必须为非负, 实际 {}", task.estimated_duration_hours),
            ));
        }
        if task.executor_count < 1 {
            return Err(ReliabilityError::invalid_input(
                field("executor_count"),
                "执行人数至少为 1",
            ));
        }
        if task.start_week < 1 || task.start_week > HORIZON_WEEKS {
            return Err(ReliabilityError::invalid_input(
                field("start_week"),
                format!("起始周必须在 1..={}, 实际 {}", HORIZON_WEEKS, task.start_week),
            ));
        }
    }
    Ok(())
}

/// 逐周累加器
pub(super) struct WeekBuckets {
    pub hours: Vec<f64>,
    pub counts: Vec<u32>,
}

impl WeekBuckets {
    pub fn new() -> Self {
        Self {
            hours: vec![0.0; HORIZON_WEEKS as usize],
            counts: vec![0; HORIZON_WEEKS as usize],
        }
    }

    pub fn add(&mut self, task: &MaintenanceTask, start_week: u32) {
        let load = task.occurrence_load_hours();
        for week in task.occurrence_weeks_from(start_week) {
            let i = (week - 1) as usize;
            self.hours[i] += load;
            self.counts[i] += 1;
        }
    }

    pub fn into_profile(self) -> LoadProfile {
        LoadProfile::from_buckets(&self.hours, &self.counts)
    }
}

/// 由 (任务, 起始周) 整体构建负荷剖面
pub(super) fn build_profile<'a, I>(placements: I) -> LoadProfile
where
    I: IntoIterator<Item = (&'a MaintenanceTask, u32)>,
{
    let mut buckets = WeekBuckets::new();
    for (task, start_week) in placements {
        buckets.add(task, start_week);
    }
    buckets.into_profile()
}
