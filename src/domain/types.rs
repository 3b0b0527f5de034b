// ==========================================
// 设备可靠性分析系统 - 领域类型定义
// ==========================================
// 职责: 事件类别、时间单位、分类口径等枚举
// 序列化格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 事件类别 (Event Category)
// ==========================================
// 红线: 只有非计划停机计入故障间隔（默认口径，可配置）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Planned,   // 计划停机
    Unplanned, // 非计划停机（故障）
    External,  // 外部原因（停电/缺料等）
}

impl EventCategory {
    /// 从导入层的文本值解析类别（大小写不敏感）
    ///
    /// # 返回
    /// - Some: 可识别的类别
    /// - None: 无法识别
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PLANNED" | "计划" | "计划停机" => Some(EventCategory::Planned),
            "UNPLANNED" | "非计划" | "非计划停机" | "故障" => Some(EventCategory::Unplanned),
            "EXTERNAL" | "外部" | "外部原因" => Some(EventCategory::External),
            _ => None,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCategory::Planned => write!(f, "PLANNED"),
            EventCategory::Unplanned => write!(f, "UNPLANNED"),
            EventCategory::External => write!(f, "EXTERNAL"),
        }
    }
}

// ==========================================
// 时间单位 (Time Unit)
// ==========================================
// TBF / MTBF / MTTR 统一使用同一单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    #[default]
    Hours,
    Days,
}

impl TimeUnit {
    /// 秒 -> 当前单位
    pub fn seconds_to_unit(&self, seconds: f64) -> f64 {
        match self {
            TimeUnit::Hours => seconds / 3600.0,
            TimeUnit::Days => seconds / 86_400.0,
        }
    }

    /// 分钟 -> 当前单位
    pub fn minutes_to_unit(&self, minutes: f64) -> f64 {
        self.seconds_to_unit(minutes * 60.0)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "HOURS" | "HOUR" | "H" => Some(TimeUnit::Hours),
            "DAYS" | "DAY" | "D" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Hours => write!(f, "HOURS"),
            TimeUnit::Days => write!(f, "DAYS"),
        }
    }
}

// ==========================================
// 故障间隔波动分类 (Variability Class)
// ==========================================
// 口径: CoV < 0.5 可预测; [0.5, 1.0) 波动; >= 1.0 混乱（故障聚集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariabilityClass {
    Predictable,
    Variable,
    Chaotic,
}

impl VariabilityClass {
    /// CoV 分档阈值
    pub const VARIABLE_THRESHOLD: f64 = 0.5;
    pub const CHAOTIC_THRESHOLD: f64 = 1.0;

    pub fn from_cov(cov: f64) -> Self {
        if cov < Self::VARIABLE_THRESHOLD {
            VariabilityClass::Predictable
        } else if cov < Self::CHAOTIC_THRESHOLD {
            VariabilityClass::Variable
        } else {
            VariabilityClass::Chaotic
        }
    }
}

impl fmt::Display for VariabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariabilityClass::Predictable => write!(f, "PREDICTABLE"),
            VariabilityClass::Variable => write!(f, "VARIABLE"),
            VariabilityClass::Chaotic => write!(f, "CHAOTIC"),
        }
    }
}

// ==========================================
// Weibull 拟合方法 / 置信度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitMethod {
    #[default]
    RankRegression,    // 中位秩回归 (Bernard 近似)
    MaximumLikelihood, // 极大似然 (Newton-Raphson)
}

impl FitMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "RANK_REGRESSION" | "MRR" | "RRX" => Some(FitMethod::RankRegression),
            "MAXIMUM_LIKELIHOOD" | "MLE" => Some(FitMethod::MaximumLikelihood),
            _ => None,
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMethod::RankRegression => write!(f, "RANK_REGRESSION"),
            FitMethod::MaximumLikelihood => write!(f, "MAXIMUM_LIKELIHOOD"),
        }
    }
}

/// 拟合置信度（仅提示，不阻断计算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitConfidence {
    Low,    // 样本量 = 2
    Normal,
}

// ==========================================
// 帕累托分析口径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParetoDimension {
    Asset,       // 按设备
    FailureMode, // 按故障模式
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParetoBasis {
    #[default]
    Downtime, // 累计停机分钟
    Count,    // 事件次数
}

/// ABC 分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}
