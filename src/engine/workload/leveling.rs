use super::projection::{build_profile, WeekBuckets};
use crate::domain::capacity::CapacityConstraint;
use crate::domain::task::{LoadProfile, MaintenanceTask, HORIZON_WEEKS};
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// 浮点比较容差（工时）
const EPS: f64 = 1e-9;

// ==========================================
// 平衡结果
// ==========================================

/// 单任务起始周分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub task_id: String,
    pub previous_start_week: u32,
    pub start_week: u32,
    pub interval_weeks: u32,
    pub occurrence_load_hours: f64,
}

impl TaskAssignment {
    pub fn moved(&self) -> bool {
        self.previous_start_week != self.start_week
    }
}

/// 产能违规
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityViolation {
    /// 单次执行负荷即超过周上限,无法平衡
    UnschedulableTask {
        task_id: String,
        load_hours: f64,
        capacity_hours: f64,
    },
    /// 平衡后仍超过周上限的周
    OverloadedWeek {
        week: u32,
        load_hours: f64,
        capacity_hours: f64,
    },
}

impl CapacityViolation {
    pub fn to_error(&self) -> ReliabilityError {
        match self {
            CapacityViolation::UnschedulableTask {
                task_id,
                load_hours,
                capacity_hours,
            } => ReliabilityError::CapacityExceeded {
                subject: format!("task {}", task_id),
                load_hours: *load_hours,
                capacity_hours: *capacity_hours,
            },
            CapacityViolation::OverloadedWeek {
                week,
                load_hours,
                capacity_hours,
            } => ReliabilityError::CapacityExceeded {
                subject: format!("week {}", week),
                load_hours: *load_hours,
                capacity_hours: *capacity_hours,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelingResult {
    /// 按输入顺序
    pub assignments: Vec<TaskAssignment>,
    /// 平衡前（原起始周）
    pub baseline: LoadProfile,
    /// 平衡后
    pub profile: LoadProfile,
    pub weekly_capacity_hours: f64,
    pub violations: Vec<CapacityViolation>,
}

impl LevelingResult {
    pub fn assignment(&self, task_id: &str) -> Option<&TaskAssignment> {
        self.assignments.iter().find(|a| a.task_id == task_id)
    }

    pub fn is_within_capacity(&self) -> bool {
        self.violations.is_empty()
    }

    /// 存在违规时返回第一条 CapacityExceeded
    pub fn ensure_within_capacity(&self) -> ReliabilityResult<()> {
        match self.violations.first() {
            Some(violation) => Err(violation.to_error()),
            None => Ok(()),
        }
    }

    pub fn unschedulable_task_ids(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                CapacityViolation::UnschedulableTask { task_id, .. } => Some(task_id.as_str()),
                CapacityViolation::OverloadedWeek { .. } => None,
            })
            .collect()
    }

    pub fn overloaded_weeks(&self) -> Vec<u32> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                CapacityViolation::OverloadedWeek { week, .. } => Some(*week),
                CapacityViolation::UnschedulableTask { .. } => None,
            })
            .collect()
    }
}

// ==========================================
// 贪心平衡
// ==========================================

/// 候选起始周评分
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start_week: u32,
    peak: f64,
    variance: f64,
    keeps_current: bool,
}

impl Candidate {
    /// 峰值 -> 方差 -> 保留原起始周 -> 最早周
    fn better_than(&self, other: &Candidate) -> bool {
        match cmp_eps(self.peak, other.peak) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        match cmp_eps(self.variance, other.variance) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        if self.keeps_current != other.keeps_current {
            return self.keeps_current;
        }
        self.start_week < other.start_week
    }
}

fn cmp_eps(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0) {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

pub(super) fn level_tasks<C>(tasks: &[MaintenanceTask], capacity: &C) -> LevelingResult
where
    C: CapacityConstraint,
{
    let limit = capacity.weekly_limit_hours();
    let baseline = build_profile(tasks.iter().map(|t| (t, t.start_week)));

    // 单次负荷降序; sort_by 稳定,同负荷保持输入顺序
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by(|&a, &b| {
        tasks[b]
            .occurrence_load_hours()
            .total_cmp(&tasks[a].occurrence_load_hours())
    });

    let mut buckets = WeekBuckets::new();
    let mut chosen = vec![0_u32; tasks.len()];

    for &idx in &order {
        let task = &tasks[idx];
        let best = best_start_week(&buckets.hours, task);
        debug!(
            task_id = %task.id,
            start_week = best.start_week,
            peak = best.peak,
            "任务起始周已确定"
        );
        buckets.add(task, best.start_week);
        chosen[idx] = best.start_week;
    }

    let mut violations = Vec::new();
    for task in tasks {
        let load = task.occurrence_load_hours();
        if !capacity.can_absorb(0.0, load) {
            warn!(task_id = %task.id, load, limit, "单次负荷超过周产能,无法平衡");
            violations.push(CapacityViolation::UnschedulableTask {
                task_id: task.id.clone(),
                load_hours: load,
                capacity_hours: limit,
            });
        }
    }

    let profile = buckets.into_profile();
    for week in &profile.weeks {
        if capacity.overflow_hours(week.hours) > EPS {
            violations.push(CapacityViolation::OverloadedWeek {
                week: week.week,
                load_hours: week.hours,
                capacity_hours: limit,
            });
        }
    }

    let assignments = tasks
        .iter()
        .zip(&chosen)
        .map(|(task, &start_week)| TaskAssignment {
            task_id: task.id.clone(),
            previous_start_week: task.start_week,
            start_week,
            interval_weeks: task.interval_weeks(),
            occurrence_load_hours: task.occurrence_load_hours(),
        })
        .collect();

    LevelingResult {
        assignments,
        baseline,
        profile,
        weekly_capacity_hours: limit,
        violations,
    }
}

/// 在当前累计负荷上为单个任务挑选起始周
///
/// 候选范围为第一个周期（1..=min(周期, 52)）,更晚的起始周只会减少视野内的执行次数
fn best_start_week(hours: &[f64], task: &MaintenanceTask) -> Candidate {
    let load = task.occurrence_load_hours();
    let last_candidate = task.interval_weeks().min(HORIZON_WEEKS);
    let base_peak = hours.iter().copied().fold(0.0_f64, f64::max);
    let base_sum: f64 = hours.iter().sum();
    let base_sum_sq: f64 = hours.iter().map(|h| h * h).sum();
    let n = hours.len() as f64;

    let mut best: Option<Candidate> = None;
    for start_week in 1..=last_candidate {
        let mut peak = base_peak;
        let mut sum = base_sum;
        let mut sum_sq = base_sum_sq;
        for week in task.occurrence_weeks_from(start_week) {
            let before = hours[(week - 1) as usize];
            let after = before + load;
            peak = peak.max(after);
            sum += load;
            sum_sq += after * after - before * before;
        }
        let mean = sum / n;
        let candidate = Candidate {
            start_week,
            peak,
            variance: (sum_sq / n - mean * mean).max(0.0),
            keeps_current: start_week == task.start_week,
        };
        best = match best {
            Some(current) if !candidate.better_than(&current) => Some(current),
            _ => Some(candidate),
        };
    }

    // last_candidate >= 1,循环至少执行一次
    best.unwrap_or(Candidate {
        start_week: task.start_week,
        peak: base_peak,
        variance: 0.0,
        keeps_current: true,
    })
}
