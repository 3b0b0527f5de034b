// ==========================================
// 设备可靠性分析系统 - Weibull 参数估计引擎
// ==========================================
// 职责: 由 TBF 样本估计两参数 Weibull 的形状 beta 与尺度 eta
// 方法: 中位秩回归（默认）/ 极大似然（可选）
// 红线: N < 2 不得编造参数; 非正/非有限值在入口拒绝,不进入对数变换
// ==========================================

use crate::domain::reliability::{TbfSample, WeibullFit, WeibullParams};
use crate::domain::types::{FitConfidence, FitMethod};
use crate::engine::error::{ReliabilityError, ReliabilityResult};
use tracing::{debug, instrument, warn};

/// 最小样本量
pub const MIN_SAMPLE_SIZE: usize = 2;

/// 样本量不超过该值时标记低置信度
const LOW_CONFIDENCE_MAX_SIZE: usize = 2;

/// Newton-Raphson 最大迭代次数
const MLE_MAX_ITER: usize = 100;

/// Newton-Raphson 收敛阈值
const MLE_TOL: f64 = 1e-10;

// ==========================================
// WeibullEstimator - Weibull 参数估计引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct WeibullEstimator {
    method: FitMethod,
}

impl WeibullEstimator {
    /// 构造函数（默认中位秩回归）
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(method: FitMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// 拟合 TBF 样本
    #[instrument(skip(self, sample), fields(asset_id = %sample.asset_id, n = sample.len(), method = %self.method))]
    pub fn estimate(&self, sample: &TbfSample) -> ReliabilityResult<WeibullFit> {
        self.estimate_values(&sample.values)
    }

    /// 拟合任意正值样本
    pub fn estimate_values(&self, values: &[f64]) -> ReliabilityResult<WeibullFit> {
        validate_sample(values)?;

        let fit = match self.method {
            FitMethod::RankRegression => fit_rank_regression(values)?,
            FitMethod::MaximumLikelihood => fit_maximum_likelihood(values)?,
        };

        if fit.confidence == FitConfidence::Low {
            warn!(n = values.len(), "样本量过小,拟合结果仅供参考");
        }
        debug!(beta = fit.params.beta, eta = fit.params.eta, "Weibull 拟合完成");
        Ok(fit)
    }
}

// ==========================================
// 入口校验
// ==========================================

fn validate_sample(values: &[f64]) -> ReliabilityResult<()> {
    if let Some((i, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v <= 0.0)
    {
        return Err(ReliabilityError::invalid_input(
            format!("tbf[{}]", i),
            format!("TBF 必须为正的有限值, 实际 {}", v),
        ));
    }
    if values.len() < MIN_SAMPLE_SIZE {
        return Err(ReliabilityError::data_insufficient(
            "weibull",
            format!(
                "需要至少 {} 个 TBF 样本, 实际 {}",
                MIN_SAMPLE_SIZE,
                values.len()
            ),
        ));
    }
    Ok(())
}

fn confidence_for(n: usize) -> FitConfidence {
    if n <= LOW_CONFIDENCE_MAX_SIZE {
        FitConfidence::Low
    } else {
        FitConfidence::Normal
    }
}

// ==========================================
// 中位秩回归
// ==========================================
// 线性化: ln(-ln(1 - F)) = beta * ln(t) - beta * ln(eta)
// 中位秩: F_i = (i - 0.3) / (n + 0.4)
fn fit_rank_regression(values: &[f64]) -> ReliabilityResult<WeibullFit> {
    let n = values.len();
    let n_f = n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let (x_vals, y_vals): (Vec<f64>, Vec<f64>) = sorted
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let f_i = ((i + 1) as f64 - 0.3) / (n_f + 0.4);
            (t.ln(), (-(1.0 - f_i).ln()).ln())
        })
        .unzip();

    let sum_x: f64 = x_vals.iter().sum();
    let sum_y: f64 = y_vals.iter().sum();
    let sum_xy: f64 = x_vals.iter().zip(&y_vals).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = x_vals.iter().map(|x| x * x).sum();

    let denom = n_f * sum_x2 - sum_x * sum_x;
    if denom <= 1e-12 * n_f * sum_x2 {
        return Err(ReliabilityError::data_insufficient(
            "weibull",
            "TBF 样本全部相同,无法确定形状参数",
        ));
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;

    let beta = slope;
    let eta = (-intercept / beta).exp();
    let params = WeibullParams::new(beta, eta);
    if !params.is_valid() {
        return Err(ReliabilityError::data_insufficient(
            "weibull",
            format!("回归退化: beta={}, eta={}", beta, eta),
        ));
    }

    // R^2 = 1 - SS_res / SS_tot
    let mean_y = sum_y / n_f;
    let ss_tot: f64 = y_vals.iter().map(|y| (y - mean_y) * (y - mean_y)).sum();
    let ss_res: f64 = x_vals
        .iter()
        .zip(&y_vals)
        .map(|(x, y)| {
            let r = y - (intercept + slope * x);
            r * r
        })
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Ok(WeibullFit {
        params,
        method: FitMethod::RankRegression,
        sample_size: n,
        confidence: confidence_for(n),
        r_squared: Some(r_squared),
        log_likelihood: None,
    })
}

// ==========================================
// 极大似然
// ==========================================
// 轮廓似然方程:
// f(beta) = n/beta + sum(ln t) - n * S1/S0 = 0
// S0 = sum(t^beta), S1 = sum(t^beta ln t), S2 = sum(t^beta (ln t)^2)
fn fit_maximum_likelihood(values: &[f64]) -> ReliabilityResult<WeibullFit> {
    let n = values.len();
    let n_f = n as f64;

    let ln_t: Vec<f64> = values.iter().map(|t| t.ln()).collect();
    let sum_ln_t: f64 = ln_t.iter().sum();

    let mean_ln = sum_ln_t / n_f;
    if ln_t.iter().all(|l| (l - mean_ln).abs() < 1e-12) {
        return Err(ReliabilityError::data_insufficient(
            "weibull",
            "TBF 样本全部相同,无法确定形状参数",
        ));
    }

    let mut beta = 1.2_f64;
    let mut converged = false;

    for _ in 0..MLE_MAX_ITER {
        let (mut s0, mut s1, mut s2) = (0.0_f64, 0.0_f64, 0.0_f64);
        for (&t, &lt) in values.iter().zip(&ln_t) {
            let t_beta = t.powf(beta);
            s0 += t_beta;
            s1 += t_beta * lt;
            s2 += t_beta * lt * lt;
        }
        if s0 <= 0.0 || !s0.is_finite() {
            break;
        }

        let f_val = n_f / beta + sum_ln_t - n_f * s1 / s0;
        let f_prime = -n_f / (beta * beta) - n_f * (s2 * s0 - s1 * s1) / (s0 * s0);
        if f_prime.abs() < 1e-30 {
            break;
        }

        let delta = f_val / f_prime;
        beta -= delta;
        if beta <= 0.0 {
            beta = 0.01;
        }
        if delta.abs() < MLE_TOL {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(ReliabilityError::data_insufficient(
            "weibull",
            "极大似然迭代未收敛",
        ));
    }

    let s0: f64 = values.iter().map(|t| t.powf(beta)).sum();
    let eta = (s0 / n_f).powf(1.0 / beta);
    let params = WeibullParams::new(beta, eta);
    if !params.is_valid() {
        return Err(ReliabilityError::data_insufficient(
            "weibull",
            format!("极大似然退化: beta={}, eta={}", beta, eta),
        ));
    }

    let log_likelihood = n_f * beta.ln() - n_f * beta * eta.ln() + (beta - 1.0) * sum_ln_t
        - values.iter().map(|t| (t / eta).powf(beta)).sum::<f64>();

    Ok(WeibullFit {
        params,
        method: FitMethod::MaximumLikelihood,
        sample_size: n,
        confidence: confidence_for(n),
        r_squared: None,
        log_likelihood: Some(log_likelihood),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;

    /// Weibull 分位数样本 t_i = eta * (-ln(1 - p_i))^(1/beta)
    fn quantile_sample(beta: f64, eta: f64, n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| {
                let p = (i as f64 - 0.5) / n as f64;
                eta * (-(1.0 - p).ln()).powf(1.0 / beta)
            })
            .collect()
    }

    #[test]
    fn test_rank_regression_recovers_parameters() {
        let data = quantile_sample(2.0, 50.0, 10);
        let fit = WeibullEstimator::new().estimate_values(&data).expect("fit should succeed");
        assert!((fit.params.beta - 2.0).abs() < 0.5, "beta = {}", fit.params.beta);
        assert!((fit.params.eta - 50.0).abs() < 15.0, "eta = {}", fit.params.eta);
        assert!(fit.r_squared.unwrap() > 0.95);
        assert_eq!(fit.confidence, FitConfidence::Normal);
    }

    #[test]
    fn test_order_independent() {
        let a = [10.0, 20.0, 30.0, 40.0, 50.0];
        let b = [50.0, 10.0, 40.0, 20.0, 30.0];
        let est = WeibullEstimator::new();
        let fa = est.estimate_values(&a).unwrap();
        let fb = est.estimate_values(&b).unwrap();
        assert!((fa.params.beta - fb.params.beta).abs() < 1e-12);
        assert!((fa.params.eta - fb.params.eta).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_and_invalid() {
        let est = WeibullEstimator::new();
        assert_eq!(est.estimate_values(&[]).unwrap_err().kind(), ErrorKind::DataInsufficient);
        assert_eq!(est.estimate_values(&[10.0]).unwrap_err().kind(), ErrorKind::DataInsufficient);
        assert_eq!(est.estimate_values(&[0.0, 10.0]).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(est.estimate_values(&[-1.0, 10.0]).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(
            est.estimate_values(&[f64::NAN, 10.0, 20.0]).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            est.estimate_values(&[10.0, f64::INFINITY]).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_two_points_low_confidence() {
        let fit = WeibullEstimator::new().estimate_values(&[100.0, 300.0]).unwrap();
        assert_eq!(fit.confidence, FitConfidence::Low);
        assert_eq!(fit.sample_size, 2);
        assert!(fit.params.is_valid());
    }

    #[test]
    fn test_identical_values_degenerate() {
        let est = WeibullEstimator::new();
        assert_eq!(
            est.estimate_values(&[10.0; 5]).unwrap_err().kind(),
            ErrorKind::DataInsufficient
        );
        let mle = WeibullEstimator::with_method(FitMethod::MaximumLikelihood);
        assert_eq!(
            mle.estimate_values(&[10.0; 5]).unwrap_err().kind(),
            ErrorKind::DataInsufficient
        );
    }

    #[test]
    fn test_mle_agrees_with_rank_regression() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let mrr = WeibullEstimator::new().estimate_values(&data).unwrap();
        let mle = WeibullEstimator::with_method(FitMethod::MaximumLikelihood)
            .estimate_values(&data)
            .unwrap();
        assert_eq!(mle.method, FitMethod::MaximumLikelihood);
        assert!(mle.log_likelihood.unwrap().is_finite());
        assert!((mrr.params.beta - mle.params.beta).abs() < 1.5);
        assert!((mrr.params.eta - mle.params.eta).abs() / mle.params.eta < 0.3);
    }
}
