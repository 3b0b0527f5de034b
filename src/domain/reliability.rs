// ==========================================
// 设备可靠性分析系统 - 可靠性结果领域模型
// ==========================================
// 职责: TBF 样本、Weibull 参数、可靠性指标、帕累托行、最优周期
// 红线: 全部为派生结果,每次计算返回新对象,不缓存
// ==========================================

use crate::domain::types::{AbcClass, FitConfidence, FitMethod, TimeUnit, VariabilityClass};
use serde::{Deserialize, Serialize};

// ==========================================
// TbfSample - 故障间隔样本
// ==========================================
// 不变量: values 全部 > 0; 长度 = 去重时刻数 - 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TbfSample {
    pub asset_id: String,
    pub unit: TimeUnit,
    pub values: Vec<f64>,
    pub coalesced_gaps: usize, // 被合并的零间隔数（同一时刻多条事件）
}

impl TbfSample {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ==========================================
// WeibullParams - 两参数 Weibull
// ==========================================
// R(t) = exp(-(t/eta)^beta)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullParams {
    pub beta: f64, // 形状参数 (>0)
    pub eta: f64,  // 尺度参数 (>0)
}

impl WeibullParams {
    pub fn new(beta: f64, eta: f64) -> Self {
        Self { beta, eta }
    }

    /// 参数是否有限且为正
    pub fn is_valid(&self) -> bool {
        self.beta.is_finite() && self.eta.is_finite() && self.beta > 0.0 && self.eta > 0.0
    }

    /// 耗损期（故障率递增）
    pub fn is_wear_out(&self) -> bool {
        self.beta > 1.0
    }
}

/// Weibull 拟合结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeibullFit {
    pub params: WeibullParams,
    pub method: FitMethod,
    pub sample_size: usize,
    pub confidence: FitConfidence,
    /// 线性化概率图上的决定系数（仅秩回归）
    pub r_squared: Option<f64>,
    /// 拟合参数下的对数似然（仅极大似然）
    pub log_likelihood: Option<f64>,
}

// ==========================================
// ReliabilityMetrics - 可靠性指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityMetrics {
    pub unit: TimeUnit,
    pub mtbf: f64,
    pub mttr: f64,
    /// None 表示 mtbf + mttr == 0（不可定义）
    pub availability: Option<f64>,
    /// 总体标准差 / 均值
    pub mtbf_cov: f64,
    pub variability: VariabilityClass,
    pub tbf_count: usize,
    pub repair_count: usize,
    /// 由 Weibull 参数推得的平均寿命 eta * Gamma(1 + 1/beta)
    pub weibull_mtbf: Option<f64>,
}

// ==========================================
// ParetoRow - 帕累托行
// ==========================================
// 不变量: value 降序; cumulative_percent 单调不减,末行 ≈ 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    pub key: String,
    pub value: f64,
    pub share_percent: f64,
    pub cumulative_percent: f64,
    pub abc_class: AbcClass,
}

// ==========================================
// OptimalInterval - 成本最优预防更换周期
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRatePoint {
    pub interval: f64,
    pub cost_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalInterval {
    /// 最优周期 T*（与 eta 同单位）
    pub interval: f64,
    /// g(T*)
    pub cost_rate: f64,
    /// 事后维修（不做预防）的长期成本率 Cc / MTTF
    pub run_to_failure_cost_rate: f64,
    /// 相对事后维修的节省比例 (0..1)
    pub savings_ratio: f64,
    /// R(T*): 到达预防周期前不发生故障的概率
    pub reliability_at_interval: f64,
    /// 搜索网格上的成本率曲线（供图表使用）
    pub curve: Vec<CostRatePoint>,
}
