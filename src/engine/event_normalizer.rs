// ==========================================
// 设备可靠性分析系统 - 事件规范化引擎
// ==========================================
// 职责: 原始事件 -> 按设备分组、按时间排序的事件序列
// 输入: 导入层交付的原始记录 / 已类型化事件 + 过滤条件
// 输出: NormalizedEvents（新对象,输入不被修改）
// 红线: 单条坏记录只计入 unusable,不得使整体计算失败
// ==========================================

use crate::domain::event::{
    AssetEventSeries, EventFilter, FailureEvent, RawEventRecord, UnusableEvent, UnusableReason,
    UNCATEGORIZED_MODE,
};
use crate::domain::types::EventCategory;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// 支持的无时区时间格式（按 UTC 解释）
const NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

// ==========================================
// NormalizedEvents - 规范化结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedEvents {
    /// 设备 -> 时间有序事件序列（BTreeMap 保证遍历顺序确定）
    pub assets: BTreeMap<String, AssetEventSeries>,
    pub unusable: Vec<UnusableEvent>,
    pub total_records: usize,
    /// 可用但未命中过滤条件的事件数
    pub filtered_out: usize,
}

impl NormalizedEvents {
    pub fn series(&self, asset_id: &str) -> Option<&AssetEventSeries> {
        self.assets.get(asset_id)
    }

    /// 全部事件（按设备、时间顺序）
    pub fn events(&self) -> impl Iterator<Item = &FailureEvent> {
        self.assets.values().flat_map(|s| s.events.iter())
    }

    pub fn event_count(&self) -> usize {
        self.assets.values().map(|s| s.len()).sum()
    }
}

// ==========================================
// EventNormalizer - 事件规范化引擎
// ==========================================
pub struct EventNormalizer {
    // 无状态引擎，不需要注入依赖
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNormalizer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 规范化原始记录
    ///
    /// 规则：
    /// 1) 缺少设备号 / 时间戳缺失或无法解析 / 时长为负或非有限 / 类别无法识别 -> unusable
    /// 2) 类别缺失按 UNPLANNED 处理,时长缺失按 0 处理
    /// 3) 故障模式缺失或为空 -> "uncategorized"
    ///
    /// # 参数
    /// - `records`: 原始记录（只读）
    /// - `filter`: 过滤条件
    #[instrument(skip(self, records, filter), fields(records_count = records.len()))]
    pub fn normalize_raw(&self, records: &[RawEventRecord], filter: &EventFilter) -> NormalizedEvents {
        let mut events = Vec::with_capacity(records.len());
        let mut unusable = Vec::new();

        for record in records {
            match self.parse_record(record) {
                Ok(event) => events.push(event),
                Err(bad) => {
                    debug!(record_id = %bad.record_id, reason = ?bad.reason, "事件不可用");
                    unusable.push(bad);
                }
            }
        }

        if !unusable.is_empty() {
            warn!(
                unusable_count = unusable.len(),
                total = records.len(),
                "部分事件不可用,已排除"
            );
        }

        let mut normalized = self.normalize_events(&events, filter);
        normalized.unusable = unusable;
        normalized.total_records = records.len();
        normalized
    }

    /// 规范化已类型化事件：过滤、按设备分组、按时间稳定排序
    #[instrument(skip(self, events, filter), fields(events_count = events.len()))]
    pub fn normalize_events(&self, events: &[FailureEvent], filter: &EventFilter) -> NormalizedEvents {
        let mut grouped: BTreeMap<String, Vec<FailureEvent>> = BTreeMap::new();
        let mut filtered_out = 0;

        for event in events {
            if !filter.matches(event) {
                filtered_out += 1;
                continue;
            }
            grouped
                .entry(event.asset_id.clone())
                .or_default()
                .push(event.clone());
        }

        let assets = grouped
            .into_iter()
            .map(|(asset_id, mut events)| {
                // 稳定排序：同一时刻的事件保持输入顺序
                events.sort_by(|a, b| a.start_time.cmp(&b.start_time));
                (asset_id.clone(), AssetEventSeries { asset_id, events })
            })
            .collect::<BTreeMap<_, _>>();

        debug!(assets_count = assets.len(), filtered_out, "事件分组完成");

        NormalizedEvents {
            assets,
            unusable: Vec::new(),
            total_records: events.len(),
            filtered_out,
        }
    }

    /// 单条原始记录校验 + 类型转换
    pub fn parse_record(&self, record: &RawEventRecord) -> Result<FailureEvent, UnusableEvent> {
        let unusable = |reason: UnusableReason, detail: String| UnusableEvent {
            record_id: record.id.clone(),
            reason,
            detail,
        };

        let asset_id = match non_empty(record.asset_id.as_deref()) {
            Some(id) => id.to_string(),
            None => {
                return Err(unusable(
                    UnusableReason::MissingAssetId,
                    "asset_id 为空".to_string(),
                ))
            }
        };

        let raw_time = match non_empty(record.start_time.as_deref()) {
            Some(t) => t,
            None => {
                return Err(unusable(
                    UnusableReason::MissingTimestamp,
                    "start_time 为空".to_string(),
                ))
            }
        };
        let start_time = parse_timestamp(raw_time).ok_or_else(|| {
            unusable(
                UnusableReason::UnparsableTimestamp,
                format!("无法解析时间戳: {}", raw_time),
            )
        })?;

        let duration_minutes = record.duration_minutes.unwrap_or(0.0);
        if !duration_minutes.is_finite() || duration_minutes < 0.0 {
            return Err(unusable(
                UnusableReason::InvalidDuration,
                format!("停机时长无效: {}", duration_minutes),
            ));
        }

        let category = match non_empty(record.category.as_deref()) {
            None => EventCategory::Unplanned,
            Some(text) => EventCategory::parse(text).ok_or_else(|| {
                unusable(
                    UnusableReason::UnknownCategory,
                    format!("无法识别的事件类别: {}", text),
                )
            })?,
        };

        let failure_mode = non_empty(record.failure_mode.as_deref())
            .unwrap_or(UNCATEGORIZED_MODE)
            .to_string();

        Ok(FailureEvent {
            id: record.id.clone(),
            asset_id,
            start_time,
            duration_minutes,
            category,
            failure_mode,
        })
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 解析时间戳
///
/// 依次尝试 RFC 3339、常见无时区格式、纯日期（按 UTC 零点）
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
