// ==========================================
// 设备可靠性分析系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 所有可预期的边界情况必须返回结构化原因,不得静默回落为 0/NaN
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 引擎错误分类（供展示层映射提示文案）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    DataInsufficient,
    InvalidInput,
    ModelNotApplicable,
    CapacityExceeded,
}

/// 引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReliabilityError {
    // ===== 数据不足 =====
    #[error("数据不足 ({context}): {message}")]
    DataInsufficient { context: String, message: String },

    // ===== 输入无效 =====
    #[error("输入无效 (字段 {field}): {message}")]
    InvalidInput { field: String, message: String },

    // ===== 模型不适用 =====
    #[error("模型不适用: {0}")]
    ModelNotApplicable(String),

    // ===== 超出产能 =====
    #[error("超出产能 ({subject}): 负荷 {load_hours:.2}h > 周上限 {capacity_hours:.2}h")]
    CapacityExceeded {
        subject: String,
        load_hours: f64,
        capacity_hours: f64,
    },
}

impl ReliabilityError {
    pub fn data_insufficient(context: impl Into<String>, message: impl Into<String>) -> Self {
        ReliabilityError::DataInsufficient {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReliabilityError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ReliabilityError::DataInsufficient { .. } => ErrorKind::DataInsufficient,
            ReliabilityError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ReliabilityError::ModelNotApplicable(_) => ErrorKind::ModelNotApplicable,
            ReliabilityError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
        }
    }
}

/// Result 类型别名
pub type ReliabilityResult<T> = Result<T, ReliabilityError>;
