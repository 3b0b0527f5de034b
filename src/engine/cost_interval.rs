// ==========================================
// 设备可靠性分析系统 - 成本最优预防更换周期求解引擎
// ==========================================
// 模型: 寿命更换策略（更新过程）长期成本率
//   g(T) = [Cp * R(T) + Cc * (1 - R(T))] / ∫₀ᵀ R(t) dt
// 方法: (0, k*eta] 网格搜索 + 网格极小点邻域黄金分割细化
// 红线: beta <= 1 时预防更换不能降低成本,必须明确报告"不存在有益周期"
// 红线: Cp >= Cc 或成本为负时拒绝,并说明原因
// ==========================================

use crate::domain::cost::{CostComponents, CostModel};
use crate::domain::reliability::{CostRatePoint, OptimalInterval, WeibullParams};
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use crate::engine::life_model::WeibullModel;
use crate::engine::numeric::{golden_section_min, simpson};
use tracing::{debug, instrument};

/// 搜索参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostSearchSettings {
    /// 搜索上界 = search_multiplier * eta
    pub search_multiplier: f64,
    /// 网格点数
    pub grid_points: usize,
    /// Simpson 积分分段数
    pub integration_panels: usize,
    /// 黄金分割收敛阈值（相对 eta）
    pub relative_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for CostSearchSettings {
    fn default() -> Self {
        Self {
            search_multiplier: 4.0,
            grid_points: 400,
            integration_panels: 200,
            relative_tolerance: 1e-7,
            max_iterations: 200,
        }
    }
}

// ==========================================
// CostIntervalSolver - 最优周期求解引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CostIntervalSolver {
    settings: CostSearchSettings,
}

impl CostIntervalSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CostSearchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CostSearchSettings {
        &self.settings
    }

    /// 求解成本最优预防更换周期 T*
    ///
    /// 校验顺序:
    /// 1) 成本分项为负或非有限 -> InvalidInput
    /// 2) Cp >= Cc -> InvalidInput
    /// 3) Weibull 参数非法 -> InvalidInput
    /// 4) beta <= 1 -> ModelNotApplicable
    /// 5) 极小点落在搜索上界 -> ModelNotApplicable（事后维修在搜索范围内近似最优）
    /// 6) 成本率向 0 持续下降 -> ModelNotApplicable（Cp 相对 Cc 可忽略,无有限最优周期）
    #[instrument(skip(self, cost_model), fields(beta = params.beta, eta = params.eta))]
    pub fn solve(&self, params: &WeibullParams, cost_model: &CostModel) -> ReliabilityResult<OptimalInterval> {
        let (cp, cc) = validate_costs(cost_model)?;
        let model = WeibullModel::new(*params)?;

        if params.beta <= 1.0 {
            return Err(ReliabilityError::ModelNotApplicable(format!(
                "beta = {:.3} <= 1, 故障率不随时间增加, 预防更换无法降低成本, 不存在有益的预防周期",
                params.beta
            )));
        }

        let settings = self.settings;
        let grid_points = settings.grid_points.max(3);
        let upper = settings.search_multiplier.max(1.0) * params.eta;
        let step = upper / grid_points as f64;

        let rate = |t: f64| cost_rate_with(&model, cp, cc, t, settings.integration_panels);

        let curve: Vec<CostRatePoint> = (1..=grid_points)
            .map(|i| {
                let interval = step * i as f64;
                CostRatePoint {
                    interval,
                    cost_rate: rate(interval),
                }
            })
            .collect();

        let (best_index, best_point) = curve
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cost_rate.total_cmp(&b.cost_rate))
            .map(|(i, p)| (i, *p))
            .ok_or_else(|| ReliabilityError::data_insufficient("cost_interval", "搜索网格为空"))?;

        if best_index + 1 == curve.len() {
            return Err(ReliabilityError::ModelNotApplicable(format!(
                "成本率在搜索上界 {:.3} ({} * eta) 处仍在下降, 事后维修近似最优, 不推荐预防周期",
                upper, settings.search_multiplier
            )));
        }

        // 邻域细化; 极小点在首个网格点时向 0 逐级加密
        let (lo, hi) = if best_index == 0 {
            bracket_near_zero(&rate, step, grid_points, settings.relative_tolerance * params.eta)?
        } else {
            (curve[best_index - 1].interval, curve[best_index + 1].interval)
        };
        let (refined_t, refined_g) = golden_section_min(
            rate,
            lo,
            hi,
            settings.relative_tolerance * params.eta,
            settings.max_iterations,
        );

        let (interval, cost_rate) = if refined_g <= best_point.cost_rate {
            (refined_t, refined_g)
        } else {
            (best_point.interval, best_point.cost_rate)
        };

        let run_to_failure_cost_rate = cc / model.mean_life();
        let savings_ratio = if run_to_failure_cost_rate > 0.0 {
            (1.0 - cost_rate / run_to_failure_cost_rate).max(0.0)
        } else {
            0.0
        };

        debug!(interval, cost_rate, run_to_failure_cost_rate, "最优预防周期求解完成");

        Ok(OptimalInterval {
            interval,
            cost_rate,
            run_to_failure_cost_rate,
            savings_ratio,
            reliability_at_interval: model.reliability(interval),
            curve,
        })
    }

    /// 指定周期下的长期成本率 g(T)（供假设分析）
    pub fn cost_rate(
        &self,
        params: &WeibullParams,
        cost_model: &CostModel,
        interval: f64,
    ) -> ReliabilityResult<f64> {
        let (cp, cc) = validate_costs(cost_model)?;
        let model = WeibullModel::new(*params)?;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ReliabilityError::invalid_input(
                "interval",
                format!("周期必须为正的有限值, 实际 {}", interval),
            ));
        }
        Ok(cost_rate_with(&model, cp, cc, interval, self.settings.integration_panels))
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn validate_costs(cost_model: &CostModel) -> ReliabilityResult<(f64, f64)> {
    check_components("preventive", &cost_model.preventive)?;
    check_components("corrective", &cost_model.corrective)?;

    let cp = cost_model.preventive_cost();
    let cc = cost_model.corrective_cost();
    if cp >= cc {
        return Err(ReliabilityError::invalid_input(
            "cost_model",
            format!(
                "预防成本 Cp={:.2} 不低于事后维修成本 Cc={:.2}, 预防方案不可能最优",
                cp, cc
            ),
        ));
    }
    Ok((cp, cc))
}

fn check_components(prefix: &str, components: &CostComponents) -> ReliabilityResult<()> {
    match components.first_invalid_component() {
        Some((name, value)) => Err(ReliabilityError::invalid_input(
            format!("{}.{}", prefix, name),
            format!("成本必须为非负有限值, 实际 {}", value),
        )),
        None => Ok(()),
    }
}

/// 在 (0, window] 内逐级加密网格,直到极小点离开首个网格点
///
/// # 返回
/// 包含极小点的区间 (lo, hi)
fn bracket_near_zero<F>(rate: &F, window: f64, grid_points: usize, floor: f64) -> ReliabilityResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let floor = floor.max(window * f64::EPSILON);
    let mut window = window;
    while window > floor {
        let fine_step = window / grid_points as f64;
        let best_index = (1..=grid_points)
            .map(|i| rate(fine_step * i as f64))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        if best_index > 0 {
            debug!(window, best_index, "极小点位于搜索下界附近, 已加密定位");
            return Ok((fine_step * best_index as f64, fine_step * (best_index + 2) as f64));
        }
        window = fine_step;
    }
    Err(ReliabilityError::ModelNotApplicable(format!(
        "成本率在周期趋近 0 时仍在下降 (已加密至 {:.3e}), 预防成本相对事后维修可忽略, 不存在有限的最优周期",
        window
    )))
}

fn cost_rate_with(model: &WeibullModel, cp: f64, cc: f64, t: f64, panels: usize) -> f64 {
    if t <= 0.0 {
        return f64::INFINITY;
    }
    let r = model.reliability(t);
    let f = model.unreliability(t);
    let expected_cycle_length = simpson(|x| model.reliability(x), 0.0, t, panels);
    (cp * r + cc * f) / expected_cycle_length
}
