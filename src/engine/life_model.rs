// ==========================================
// 设备可靠性分析系统 - Weibull 寿命模型
// ==========================================
// 职责: 由已拟合参数计算 R(t)、故障率、平均寿命、B 寿命
// R(t)      = exp(-(t/eta)^beta)
// h(t)      = (beta/eta) * (t/eta)^(beta-1)
// MTTF      = eta * Gamma(1 + 1/beta)
// ==========================================

use crate::domain::reliability::WeibullParams;
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use statrs::function::gamma::gamma;

/// 已校验参数的 Weibull 寿命模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeibullModel {
    params: WeibullParams,
}

impl WeibullModel {
    /// 参数非正或非有限时拒绝
    pub fn new(params: WeibullParams) -> ReliabilityResult<Self> {
        if !params.is_valid() {
            return Err(ReliabilityError::invalid_input(
                "weibull_params",
                format!(
                    "beta/eta 必须为正的有限值, 实际 beta={}, eta={}",
                    params.beta, params.eta
                ),
            ));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> WeibullParams {
        self.params
    }

    /// 可靠度; t <= 0 时为 1
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.params.eta).powf(self.params.beta)).exp()
    }

    /// 不可靠度 F(t) = 1 - R(t); 以 exp_m1 计算,t 很小时不丢精度
    pub fn unreliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        -(-(t / self.params.eta).powf(self.params.beta)).exp_m1()
    }

    /// 故障率; t <= 0 时为 0
    ///
    /// - beta < 1: 早期失效（故障率递减）
    /// - beta = 1: 随机失效（指数分布）
    /// - beta > 1: 耗损失效（故障率递增）
    pub fn hazard_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let WeibullParams { beta, eta } = self.params;
        (beta / eta) * (t / eta).powf(beta - 1.0)
    }

    /// 平均寿命（平均故障间隔）
    pub fn mean_life(&self) -> f64 {
        self.params.eta * gamma(1.0 + 1.0 / self.params.beta)
    }

    /// R(t) = p 时的 t; p 须在 (0, 1)
    pub fn time_to_reliability(&self, p: f64) -> Option<f64> {
        if p <= 0.0 || p >= 1.0 {
            return None;
        }
        Some(self.params.eta * (-p.ln()).powf(1.0 / self.params.beta))
    }

    /// B 寿命: 失效比例达到 fraction_failed 的时间（B10 = b_life(0.10)）
    pub fn b_life(&self, fraction_failed: f64) -> Option<f64> {
        if fraction_failed <= 0.0 || fraction_failed >= 1.0 {
            return None;
        }
        self.time_to_reliability(1.0 - fraction_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(beta: f64, eta: f64) -> WeibullModel {
        WeibullModel::new(WeibullParams::new(beta, eta)).expect("valid parameters")
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(WeibullModel::new(WeibullParams::new(0.0, 10.0)).is_err());
        assert!(WeibullModel::new(WeibullParams::new(2.0, -1.0)).is_err());
        assert!(WeibullModel::new(WeibullParams::new(f64::NAN, 10.0)).is_err());
    }

    #[test]
    fn test_reliability_at_scale_is_exp_minus_one() {
        for beta in [0.5, 1.0, 2.0, 3.5] {
            let m = model(beta, 100.0);
            assert!((m.reliability(100.0) - (-1.0_f64).exp()).abs() < 1e-12);
        }
        assert_eq!(model(2.0, 100.0).reliability(-5.0), 1.0);
    }

    #[test]
    fn test_hazard_shape_regimes() {
        let exp = model(1.0, 20.0);
        assert!((exp.hazard_rate(5.0) - 0.05).abs() < 1e-12);
        assert!((exp.hazard_rate(50.0) - 0.05).abs() < 1e-12);

        let wear = model(3.0, 50.0);
        assert!(wear.hazard_rate(10.0) < wear.hazard_rate(20.0));
        assert_eq!(wear.hazard_rate(0.0), 0.0);
    }

    #[test]
    fn test_mean_life() {
        assert!((model(1.0, 100.0).mean_life() - 100.0).abs() < 1e-8);
        let rayleigh = model(2.0, 1.0).mean_life();
        assert!((rayleigh - std::f64::consts::PI.sqrt() / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_unreliability_small_t_precision() {
        let m = model(3.0, 1000.0);
        // (1e-3 / 1e3)^3 = 1e-18, 1 - exp 直接相减会得到 0
        let f = m.unreliability(1e-3);
        assert!((f - 1e-18).abs() / 1e-18 < 1e-9);
        assert!((m.unreliability(500.0) + m.reliability(500.0) - 1.0).abs() < 1e-12);
        assert_eq!(m.unreliability(0.0), 0.0);
    }

    #[test]
    fn test_mean_life_infant_mortality() {
        // beta = 0.5: Gamma(3) = 2
        assert!((model(0.5, 100.0).mean_life() - 200.0).abs() < 1e-8);
    }

    #[test]
    fn test_b_life_roundtrip() {
        let m = model(2.5, 100.0);
        let b10 = m.b_life(0.10).unwrap();
        assert!((m.reliability(b10) - 0.90).abs() < 1e-10);
        assert!(m.b_life(0.05).unwrap() < b10);
        assert!(m.b_life(0.0).is_none());
        assert!(m.time_to_reliability(1.0).is_none());
    }
}
