// ==========================================
// 设备可靠性分析系统 - 可靠性指标计算引擎
// ==========================================
// 职责: MTBF / MTTR / 可用度 / 故障间隔变异系数
// 口径:
// - MTBF = TBF 算术平均
// - MTTR = 修复时长算术平均（无修复记录时为 0）
// - 可用度 = MTBF / (MTBF + MTTR),截断到 [0, 1]; 分母为 0 时不可定义
// - CoV = 总体标准差 / 均值
// 红线: 无缓存,每次调用按输入重新计算
// ==========================================

use crate::domain::reliability::{ReliabilityMetrics, TbfSample, WeibullParams};
use crate::domain::types::VariabilityClass;
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use crate::engine::life_model::WeibullModel;
use crate::engine::numeric::{mean, population_std_dev};
use tracing::{debug, instrument};

// ==========================================
// MetricsCalculator - 可靠性指标计算引擎
// ==========================================
pub struct MetricsCalculator {
    // 无状态引擎，不需要注入依赖
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算可靠性指标
    ///
    /// # 参数
    /// - `tbf`: TBF 样本（不可为空）
    /// - `repair_durations`: 修复时长,与 TBF 同单位
    /// - `weibull`: 可选的 Weibull 参数,用于给出模型平均寿命
    #[instrument(skip(self, tbf, repair_durations, weibull), fields(
        asset_id = %tbf.asset_id,
        tbf_count = tbf.len(),
        repair_count = repair_durations.len()
    ))]
    pub fn compute(
        &self,
        tbf: &TbfSample,
        repair_durations: &[f64],
        weibull: Option<&WeibullParams>,
    ) -> ReliabilityResult<ReliabilityMetrics> {
        if let Some((i, v)) = repair_durations
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ReliabilityError::invalid_input(
                format!("repair_durations[{}]", i),
                format!("修复时长必须为非负有限值, 实际 {}", v),
            ));
        }

        let mtbf = mean(&tbf.values).ok_or_else(|| {
            ReliabilityError::data_insufficient("metrics", "TBF 样本为空,无法计算 MTBF")
        })?;
        let mttr = mean(repair_durations).unwrap_or(0.0);
        let mtbf_cov = coefficient_of_variation(&tbf.values)?;

        let weibull_mtbf = match weibull {
            Some(params) => Some(WeibullModel::new(*params)?.mean_life()),
            None => None,
        };

        let metrics = ReliabilityMetrics {
            unit: tbf.unit,
            mtbf,
            mttr,
            availability: availability(mtbf, mttr),
            mtbf_cov,
            variability: VariabilityClass::from_cov(mtbf_cov),
            tbf_count: tbf.len(),
            repair_count: repair_durations.len(),
            weibull_mtbf,
        };

        debug!(
            mtbf = metrics.mtbf,
            mttr = metrics.mttr,
            availability = ?metrics.availability,
            cov = metrics.mtbf_cov,
            "可靠性指标计算完成"
        );
        Ok(metrics)
    }
}

/// 可用度 = MTBF / (MTBF + MTTR)
///
/// # 返回
/// - Some: 截断到 [0, 1] 的可用度
/// - None: MTBF + MTTR == 0（不可定义）
pub fn availability(mtbf: f64, mttr: f64) -> Option<f64> {
    let total = mtbf + mttr;
    if total == 0.0 || !total.is_finite() {
        return None;
    }
    Some((mtbf / total).clamp(0.0, 1.0))
}

/// 变异系数 = 总体标准差 / 均值
pub fn coefficient_of_variation(values: &[f64]) -> ReliabilityResult<f64> {
    let m = mean(values).ok_or_else(|| {
        ReliabilityError::data_insufficient("metrics", "样本为空,无法计算变异系数")
    })?;
    if m <= 0.0 {
        return Err(ReliabilityError::invalid_input(
            "tbf",
            format!("样本均值必须为正, 实际 {}", m),
        ));
    }
    let sd = population_std_dev(values).unwrap_or(0.0);
    Ok(sd / m)
}
