// ==========================================
// 设备可靠性分析系统 - 维修资源产能模型
// ==========================================
// 红线: 单次任务负荷超过周产能时不可被"平衡"掉,必须显式上报
// ==========================================

use crate::domain::task::HORIZON_WEEKS;
use serde::{Deserialize, Serialize};

// ==========================================
// ResourceCapacity - 工种产能
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCapacity {
    pub trade: String,
    pub headcount: u32,
    pub weekly_hours_per_person: f64,
    pub utilization_rate: f64, // 0..=1
}

impl ResourceCapacity {
    /// 年产能（工时）
    pub fn annual_capacity_hours(&self) -> f64 {
        self.weekly_capacity_hours() * f64::from(HORIZON_WEEKS)
    }

    /// 周产能（工时）= 人数 * 周工时 * 利用率
    pub fn weekly_capacity_hours(&self) -> f64 {
        f64::from(self.headcount) * self.weekly_hours_per_person * self.utilization_rate
    }

    /// 第一个越界的参数（利用率须在 [0, 1],周工时须为非负有限值）
    pub fn first_invalid_parameter(&self) -> Option<(&'static str, f64)> {
        if !self.weekly_hours_per_person.is_finite() || self.weekly_hours_per_person < 0.0 {
            return Some(("weekly_hours_per_person", self.weekly_hours_per_person));
        }
        if !(0.0..=1.0).contains(&self.utilization_rate) {
            return Some(("utilization_rate", self.utilization_rate));
        }
        None
    }
}

/// 固定周上限（工时）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCeiling(pub f64);

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: WorkloadScheduler 约束检查接口
pub trait CapacityConstraint {
    /// 周上限（工时）
    fn weekly_limit_hours(&self) -> f64;

    /// 约束参数越界时返回 (参数名, 取值); 缺省只检查周上限
    fn invalid_parameter(&self) -> Option<(&'static str, f64)> {
        let limit = self.weekly_limit_hours();
        if !limit.is_finite() || limit < 0.0 {
            return Some(("weekly_limit_hours", limit));
        }
        None
    }

    /// 在已有负荷上追加 extra 工时是否仍不超限
    fn can_absorb(&self, used_hours: f64, extra_hours: f64) -> bool {
        used_hours + extra_hours <= self.weekly_limit_hours()
    }

    /// 超限工时
    fn overflow_hours(&self, used_hours: f64) -> f64 {
        (used_hours - self.weekly_limit_hours()).max(0.0)
    }

    /// 超限比例,相对于周上限
    fn overflow_ratio(&self, used_hours: f64) -> f64 {
        let limit = self.weekly_limit_hours();
        if limit <= 0.0 {
            return 0.0;
        }
        ((used_hours - limit) / limit).max(0.0)
    }
}

impl CapacityConstraint for ResourceCapacity {
    fn weekly_limit_hours(&self) -> f64 {
        self.weekly_capacity_hours()
    }

    fn invalid_parameter(&self) -> Option<(&'static str, f64)> {
        self.first_invalid_parameter()
    }
}

impl CapacityConstraint for WeeklyCeiling {
    fn weekly_limit_hours(&self) -> f64 {
        self.0
    }
}
