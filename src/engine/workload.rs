// ==========================================
// 设备可靠性分析系统 - PM 工作量排程引擎
// ==========================================
// 职责: 周期性 PM 任务 -> 52 周负荷剖面; 在周产能上限下平衡起始周
// 输入: PM 任务列表 + 工种产能
// 输出: LoadProfile / LevelingResult（均为新对象,输入任务不被修改）
// 红线: 负荷剖面只能整体重算,不暴露中间状态
// 红线: 单次执行即超过周产能的任务无法被平衡,必须显式上报
// ==========================================
// 注: 平衡算法为贪心启发式,保证相同输入得到相同结果,不保证最优
// ==========================================

mod leveling;
mod projection;

#[cfg(test)]
mod tests;

pub use leveling::{CapacityViolation, LevelingResult, TaskAssignment};
pub use projection::validate_tasks;

use crate::domain::capacity::{CapacityConstraint, ResourceCapacity};
use crate::domain::task::{LoadProfile, MaintenanceTask};
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// 未指定工种的任务归入该分组
pub const UNASSIGNED_TRADE: &str = "UNASSIGNED";

// ==========================================
// WorkloadScheduler - 工作量排程引擎
// ==========================================
pub struct WorkloadScheduler {
    // 无状态引擎，不需要注入依赖
}

impl Default for WorkloadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadScheduler {
    pub fn new() -> Self {
        Self {}
    }

    /// 负荷预测：按当前起始周计算 52 周负荷
    ///
    /// 复杂度 O(任务数 * 单任务执行次数)
    #[instrument(skip(self, tasks), fields(tasks_count = tasks.len()))]
    pub fn project(&self, tasks: &[MaintenanceTask]) -> ReliabilityResult<LoadProfile> {
        validate_tasks(tasks)?;
        Ok(projection::build_profile(
            tasks.iter().map(|t| (t, t.start_week)),
        ))
    }

    /// 负荷平衡：为每个任务选择起始周,降低峰均比
    ///
    /// 规则:
    /// 1) 按单次负荷降序处理（同负荷保持输入顺序）
    /// 2) 每个任务尝试第一个周期内的全部起始周
    /// 3) 取结果峰值最低者; 同峰值取方差最低; 再同则保留原起始周,否则取最早周
    /// 4) 单次负荷超过周上限的任务、平衡后仍超限的周均记录为违规
    #[instrument(skip(self, tasks, capacity), fields(
        tasks_count = tasks.len(),
        weekly_limit = capacity.weekly_limit_hours()
    ))]
    pub fn level<C>(&self, tasks: &[MaintenanceTask], capacity: &C) -> ReliabilityResult<LevelingResult>
    where
        C: CapacityConstraint,
    {
        validate_tasks(tasks)?;
        if let Some((field, value)) = capacity.invalid_parameter() {
            return Err(ReliabilityError::invalid_input(
                format!("capacity.{}", field),
                format!("产能参数越界, 实际 {}", value),
            ));
        }

        let result = leveling::level_tasks(tasks, capacity);
        info!(
            peak_before = result.baseline.peak_hours,
            peak_after = result.profile.peak_hours,
            violations = result.violations.len(),
            "负荷平衡完成"
        );
        Ok(result)
    }

    /// 按工种分组平衡
    ///
    /// 各工种独立计算,某工种失败（缺少产能定义/输入无效）不影响其他工种
    pub fn level_by_trade(
        &self,
        tasks: &[MaintenanceTask],
        capacities: &[ResourceCapacity],
    ) -> BTreeMap<String, ReliabilityResult<LevelingResult>> {
        let mut grouped: BTreeMap<String, Vec<MaintenanceTask>> = BTreeMap::new();
        for task in tasks {
            let trade = task
                .trade
                .clone()
                .unwrap_or_else(|| UNASSIGNED_TRADE.to_string());
            grouped.entry(trade).or_default().push(task.clone());
        }

        grouped
            .into_iter()
            .map(|(trade, trade_tasks)| {
                let outcome = match capacities.iter().find(|c| c.trade == trade) {
                    Some(capacity) => self.level(&trade_tasks, capacity),
                    None => Err(ReliabilityError::invalid_input(
                        "capacity",
                        format!("工种 {} 未定义产能", trade),
                    )),
                };
                (trade, outcome)
            })
            .collect()
    }

    /// 应用平衡结果,返回新的任务列表（原列表不变）
    pub fn apply_assignments(
        &self,
        tasks: &[MaintenanceTask],
        result: &LevelingResult,
    ) -> Vec<MaintenanceTask> {
        tasks
            .iter()
            .map(|task| {
                let mut updated = task.clone();
                if let Some(assignment) = result.assignment(&task.id) {
                    updated.start_week = assignment.start_week;
                }
                updated
            })
            .collect()
    }
}
