// ==========================================
// 设备可靠性分析系统 - 预防性维护任务领域模型
// ==========================================
// 职责: PM 任务、周负荷、52 周负荷剖面
// 红线: 周负荷为派生数据,只能整体重算,不得单独修改
// ==========================================

use serde::{Deserialize, Serialize};

/// 计划视野（周）
pub const HORIZON_WEEKS: u32 = 52;

/// 月 -> 周换算系数
pub const WEEKS_PER_MONTH: f64 = 4.33;

// ==========================================
// MaintenanceTask - 周期性 PM 任务
// ==========================================
// start_week 为可变排程状态,其余为任务固定元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: String,
    pub asset_id: String,
    pub frequency_months: f64,        // > 0
    pub estimated_duration_hours: f64, // >= 0
    pub executor_count: u32,          // >= 1
    pub start_week: u32,              // 1..=52
    #[serde(default)]
    pub trade: Option<String>,        // 工种（机械/电气/...）
}

impl MaintenanceTask {
    /// 周期（周）= round(frequency_months * 4.33),最小 1 周
    pub fn interval_weeks(&self) -> u32 {
        interval_weeks(self.frequency_months)
    }

    /// 单次执行负荷（工时）= 时长 * 人数
    pub fn occurrence_load_hours(&self) -> f64 {
        self.estimated_duration_hours * f64::from(self.executor_count)
    }

    /// 指定起始周下在视野内的全部执行周
    pub fn occurrence_weeks_from(&self, start_week: u32) -> impl Iterator<Item = u32> {
        let step = self.interval_weeks() as usize;
        (start_week..=HORIZON_WEEKS).step_by(step)
    }
}

/// 频率（月）换算为整数周期（周）
pub fn interval_weeks(frequency_months: f64) -> u32 {
    let weeks = (frequency_months * WEEKS_PER_MONTH).round();
    if !weeks.is_finite() || weeks < 1.0 {
        return 1;
    }
    weeks as u32
}

// ==========================================
// WeeklyLoad - 周负荷
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyLoad {
    pub week: u32,       // 1..=52
    pub hours: f64,      // >= 0
    pub task_count: u32,
}

// ==========================================
// LoadProfile - 52 周负荷剖面
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    pub weeks: Vec<WeeklyLoad>,
    pub total_hours: f64,
    pub peak_hours: f64,
    pub peak_week: u32,
    pub average_hours: f64,
    /// 峰均比; 全零负荷时为 0
    pub peak_to_average: f64,
}

impl LoadProfile {
    /// 由逐周工时/任务数整体构建剖面（唯一构造入口）
    pub fn from_buckets(hours: &[f64], counts: &[u32]) -> Self {
        let weeks: Vec<WeeklyLoad> = hours
            .iter()
            .zip(counts.iter())
            .enumerate()
            .map(|(i, (&h, &c))| WeeklyLoad {
                week: i as u32 + 1,
                hours: h,
                task_count: c,
            })
            .collect();

        let total_hours: f64 = hours.iter().sum();
        let (peak_week, peak_hours) = weeks
            .iter()
            .fold((1, 0.0_f64), |(pw, ph), w| if w.hours > ph { (w.week, w.hours) } else { (pw, ph) });
        let average_hours = if weeks.is_empty() {
            0.0
        } else {
            total_hours / weeks.len() as f64
        };
        let peak_to_average = if average_hours > 0.0 {
            peak_hours / average_hours
        } else {
            0.0
        };

        Self {
            weeks,
            total_hours,
            peak_hours,
            peak_week,
            average_hours,
            peak_to_average,
        }
    }

    /// 指定周（1 起）的负荷
    pub fn week(&self, week: u32) -> Option<&WeeklyLoad> {
        week.checked_sub(1).and_then(|i| self.weeks.get(i as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_weeks_rounding() {
        assert_eq!(interval_weeks(1.0), 4);
        assert_eq!(interval_weeks(3.0), 13);
        assert_eq!(interval_weeks(12.0), 52);
        assert_eq!(interval_weeks(0.1), 1);
    }

    #[test]
    fn test_profile_statistics() {
        let mut hours = vec![0.0; 52];
        let mut counts = vec![0; 52];
        hours[9] = 52.0;
        counts[9] = 1;
        let profile = LoadProfile::from_buckets(&hours, &counts);
        assert_eq!(profile.peak_week, 10);
        assert!((profile.average_hours - 1.0).abs() < 1e-12);
        assert!((profile.peak_to_average - 52.0).abs() < 1e-12);
    }
}
