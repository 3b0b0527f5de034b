// ==========================================
// 设备可靠性分析系统 - 停机事件领域模型
// ==========================================
// 职责: 原始事件记录（导入层交付）与规范化后的故障事件
// 红线: 规范化后的事件不可变,核心只读消费
// ==========================================

use crate::domain::types::{EventCategory, TimeUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 未分类故障模式的统一标签
pub const UNCATEGORIZED_MODE: &str = "uncategorized";

// ==========================================
// RawEventRecord - 原始事件记录
// ==========================================
// 来源: 导入/列映射层（或外部生成式服务给出的标签建议）
// 字段均可能缺失,由 EventNormalizer 在入口处校验
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEventRecord {
    pub id: String,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,       // 文本时间戳
    #[serde(default)]
    pub duration_minutes: Option<f64>,    // 停机时长（分钟）
    #[serde(default)]
    pub category: Option<String>,         // PLANNED / UNPLANNED / EXTERNAL
    #[serde(default)]
    pub failure_mode: Option<String>,
}

// ==========================================
// FailureEvent - 规范化停机事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEvent {
    pub id: String,
    pub asset_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: f64,     // >= 0
    pub category: EventCategory,
    pub failure_mode: String,      // 缺失时为 "uncategorized"
}

impl FailureEvent {
    /// 停机时长换算到指定时间单位
    pub fn duration_in(&self, unit: TimeUnit) -> f64 {
        unit.minutes_to_unit(self.duration_minutes)
    }
}

// ==========================================
// EventFilter - 事件过滤条件
// ==========================================
// 用途: 前端切换设备/类别/时间窗后重新计算
// 空条件表示不过滤
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub asset_ids: Option<BTreeSet<String>>,
    #[serde(default)]
    pub categories: Option<Vec<EventCategory>>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// 判断事件是否命中过滤条件
    pub fn matches(&self, event: &FailureEvent) -> bool {
        if let Some(assets) = &self.asset_ids {
            if !assets.contains(&event.asset_id) {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&event.category) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if event.start_time < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if event.start_time > to {
                return false;
            }
        }
        true
    }
}

// ==========================================
// UnusableEvent - 不可用事件
// ==========================================
// 红线: 单条坏数据不得导致整体计算失败,只计数并给出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnusableReason {
    MissingAssetId,
    MissingTimestamp,
    UnparsableTimestamp,
    InvalidDuration,
    UnknownCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusableEvent {
    pub record_id: String,
    pub reason: UnusableReason,
    pub detail: String,
}

// ==========================================
// AssetEventSeries - 单设备时间有序事件序列
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEventSeries {
    pub asset_id: String,
    pub events: Vec<FailureEvent>, // 按 start_time 升序（同时刻保持输入顺序）
}

impl AssetEventSeries {
    /// 按类别派生子序列（仍保持时间顺序）
    pub fn of_categories(&self, categories: &[EventCategory]) -> AssetEventSeries {
        AssetEventSeries {
            asset_id: self.asset_id.clone(),
            events: self
                .events
                .iter()
                .filter(|e| categories.contains(&e.category))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
