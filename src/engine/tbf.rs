// ==========================================
// 设备可靠性分析系统 - 故障间隔 (TBF) 提取引擎
// ==========================================
// 职责: 时间有序事件序列 -> 相邻事件开始时刻之差
// 红线: 零间隔（同一时刻）丢弃并计数,不得产生负值或零值
// ==========================================

use crate::domain::event::AssetEventSeries;
use crate::domain::reliability::TbfSample;
use crate::domain::types::{EventCategory, TimeUnit};
use tracing::{debug, instrument};

// ==========================================
// TbfExtractor - 故障间隔提取引擎
// ==========================================
pub struct TbfExtractor {
    // 无状态引擎，不需要注入依赖
}

impl Default for TbfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TbfExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// 提取 TBF 样本
    ///
    /// 序列已由 EventNormalizer 按时间排序；此处仍按相邻差值判断,
    /// 非正差值（同一时刻）一律视为合并,不进入样本。
    ///
    /// # 参数
    /// - `series`: 单设备时间有序事件
    /// - `unit`: 输出单位（小时/天）
    #[instrument(skip(self, series), fields(asset_id = %series.asset_id, events_count = series.len()))]
    pub fn extract(&self, series: &AssetEventSeries, unit: TimeUnit) -> TbfSample {
        let mut values = Vec::with_capacity(series.len().saturating_sub(1));
        let mut coalesced_gaps = 0;

        for pair in series.events.windows(2) {
            let gap = pair[1].start_time - pair[0].start_time;
            // 毫秒精度足以覆盖停机记录
            let seconds = gap.num_milliseconds() as f64 / 1000.0;
            if seconds <= 0.0 {
                coalesced_gaps += 1;
                continue;
            }
            values.push(unit.seconds_to_unit(seconds));
        }

        debug!(tbf_count = values.len(), coalesced_gaps, "TBF 提取完成");

        TbfSample {
            asset_id: series.asset_id.clone(),
            unit,
            values,
            coalesced_gaps,
        }
    }

    /// 修复时长样本（事件停机时长,换算到 TBF 同一单位）
    ///
    /// # 参数
    /// - `categories`: 计入修复时间的事件类别（通常仅 UNPLANNED）
    pub fn repair_durations(
        &self,
        series: &AssetEventSeries,
        categories: &[EventCategory],
        unit: TimeUnit,
    ) -> Vec<f64> {
        series
            .events
            .iter()
            .filter(|e| categories.contains(&e.category))
            .map(|e| e.duration_in(unit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::FailureEvent;
    use chrono::{Duration, TimeZone, Utc};

    fn series(offsets_hours: &[i64]) -> AssetEventSeries {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        AssetEventSeries {
            asset_id: "C-7".to_string(),
            events: offsets_hours
                .iter()
                .enumerate()
                .map(|(i, h)| FailureEvent {
                    id: format!("E{}", i),
                    asset_id: "C-7".to_string(),
                    start_time: base + Duration::hours(*h),
                    duration_minutes: 90.0,
                    category: if i % 2 == 0 {
                        EventCategory::Unplanned
                    } else {
                        EventCategory::Planned
                    },
                    failure_mode: "bearing".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_gaps_in_hours_and_days() {
        let extractor = TbfExtractor::new();
        let s = series(&[0, 24, 72, 168]);

        let hours = extractor.extract(&s, TimeUnit::Hours);
        assert_eq!(hours.values, vec![24.0, 48.0, 96.0]);
        assert_eq!(hours.coalesced_gaps, 0);

        let days = extractor.extract(&s, TimeUnit::Days);
        assert_eq!(days.values, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_zero_gaps_are_coalesced() {
        let extractor = TbfExtractor::new();
        let s = series(&[0, 10, 10, 10, 30]);
        let sample = extractor.extract(&s, TimeUnit::Hours);
        assert_eq!(sample.values, vec![10.0, 20.0]);
        assert_eq!(sample.coalesced_gaps, 2);
        assert!(sample.values.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_short_series() {
        let extractor = TbfExtractor::new();
        assert!(extractor.extract(&series(&[]), TimeUnit::Hours).is_empty());
        assert!(extractor.extract(&series(&[5]), TimeUnit::Hours).is_empty());
    }

    #[test]
    fn test_repair_durations_by_category() {
        let extractor = TbfExtractor::new();
        let s = series(&[0, 10, 20]);
        let repairs = extractor.repair_durations(&s, &[EventCategory::Unplanned], TimeUnit::Hours);
        assert_eq!(repairs, vec![1.5, 1.5]);
    }
}
