// ==========================================
// 设备可靠性分析系统 - 帕累托 / ABC 排序引擎
// ==========================================
// 职责: 按类别汇总贡献量,降序排序,计算累计百分比
// 红线: 同值保持首次出现顺序（稳定排序）,重复运行结果必须一致
// 红线: 排序口径（次数/停机时长）由调用方指定
// ==========================================

use crate::domain::event::FailureEvent;
use crate::domain::reliability::ParetoRow;
use crate::domain::types::{AbcClass, ParetoBasis, ParetoDimension};
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// ABC 分档阈值（累计百分比）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcThresholds {
    pub a_percent: f64,
    pub b_percent: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self {
            a_percent: 80.0,
            b_percent: 95.0,
        }
    }
}

// ==========================================
// ParetoRanker - 帕累托排序引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ParetoRanker {
    thresholds: AbcThresholds,
}

impl ParetoRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: AbcThresholds) -> Self {
        Self { thresholds }
    }

    /// 对 (类别, 数值) 多重集排序
    ///
    /// 步骤:
    /// 1) 按类别汇总（保留首次出现顺序）
    /// 2) 按汇总值稳定降序
    /// 3) 累计百分比; 行的 ABC 分档按"本行之前"的累计占比判定
    #[instrument(skip(self, pairs))]
    pub fn rank<K, I>(&self, pairs: I) -> ReliabilityResult<Vec<ParetoRow>>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut totals: Vec<(String, f64)> = Vec::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            if !value.is_finite() || value < 0.0 {
                return Err(ReliabilityError::invalid_input(
                    format!("pareto[{}]", key),
                    format!("贡献量必须为非负有限值, 实际 {}", value),
                ));
            }
            match index.get(key) {
                Some(&i) => totals[i].1 += value,
                None => {
                    index.insert(key.to_string(), totals.len());
                    totals.push((key.to_string(), value));
                }
            }
        }

        // Vec::sort_by 为稳定排序
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));

        // 合计与累计按同一顺序求和,累计值不会越过 100
        let grand_total: f64 = totals.iter().map(|(_, v)| v).sum();
        if totals.is_empty() || grand_total <= 0.0 {
            return Err(ReliabilityError::data_insufficient(
                "pareto",
                format!("无可排序的贡献量 (类别数 {}, 合计 {})", totals.len(), grand_total),
            ));
        }

        let mut running = 0.0;
        let mut rows: Vec<ParetoRow> = totals
            .into_iter()
            .map(|(key, value)| {
                let before = running / grand_total * 100.0;
                running += value;
                ParetoRow {
                    key,
                    value,
                    share_percent: value / grand_total * 100.0,
                    cumulative_percent: (running / grand_total * 100.0).min(100.0),
                    abc_class: self.classify(before),
                }
            })
            .collect();

        // 末行累计固定为 100,消除浮点累加误差
        if let Some(last) = rows.last_mut() {
            last.cumulative_percent = 100.0;
        }

        debug!(rows = rows.len(), grand_total, "帕累托排序完成");
        Ok(rows)
    }

    /// 对事件按维度/口径排序
    ///
    /// # 参数
    /// - `dimension`: 按设备或故障模式分组
    /// - `basis`: 次数（每条事件计 1）或停机时长（分钟）
    pub fn rank_events<'a, I>(
        &self,
        events: I,
        dimension: ParetoDimension,
        basis: ParetoBasis,
    ) -> ReliabilityResult<Vec<ParetoRow>>
    where
        I: IntoIterator<Item = &'a FailureEvent>,
    {
        let pairs = events.into_iter().map(|e| {
            let key = match dimension {
                ParetoDimension::Asset => e.asset_id.as_str(),
                ParetoDimension::FailureMode => e.failure_mode.as_str(),
            };
            let value = match basis {
                ParetoBasis::Count => 1.0,
                ParetoBasis::Downtime => e.duration_minutes,
            };
            (key, value)
        });
        self.rank(pairs)
    }

    fn classify(&self, cumulative_before: f64) -> AbcClass {
        if cumulative_before < self.thresholds.a_percent {
            AbcClass::A
        } else if cumulative_before < self.thresholds.b_percent {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}
