// ==========================================
// 设备可靠性分析系统 - 引擎配置
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 优先级: 环境变量 > JSON 文件 > 默认值
// 红线: 校验失败直接返回错误,不得带着非法参数进入引擎
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::domain::types::{EventCategory, FitMethod, ParetoBasis, TimeUnit};
use crate::engine::cost_interval::CostSearchSettings;
use crate::engine::pareto::AbcThresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 环境变量键
// ==========================================
pub mod env_keys {
    pub const TIME_UNIT: &str = "MAINT_RELIABILITY_TIME_UNIT";
    pub const FIT_METHOD: &str = "MAINT_RELIABILITY_FIT_METHOD";
    pub const COST_SEARCH_MULTIPLIER: &str = "MAINT_RELIABILITY_COST_SEARCH_MULTIPLIER";
    pub const COST_GRID_POINTS: &str = "MAINT_RELIABILITY_COST_GRID_POINTS";
}

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置 JSON 解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("环境变量 {key} 取值无效: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("配置项 {field} 无效: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// EngineConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub time_unit: TimeUnit,
    pub fit_method: FitMethod,
    pub failure_categories: Vec<EventCategory>,
    pub repair_categories: Vec<EventCategory>,
    pub pareto_basis: ParetoBasis,

    // ===== 最优周期搜索 =====
    pub cost_search_multiplier: f64,
    pub cost_grid_points: usize,
    pub integration_panels: usize,
    pub golden_relative_tolerance: f64,
    pub golden_max_iterations: usize,

    // ===== ABC 分档 =====
    pub abc_a_percent: f64,
    pub abc_b_percent: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let search = CostSearchSettings::default();
        let abc = AbcThresholds::default();
        Self {
            time_unit: TimeUnit::default(),
            fit_method: FitMethod::default(),
            failure_categories: vec![EventCategory::Unplanned],
            repair_categories: vec![EventCategory::Unplanned],
            pareto_basis: ParetoBasis::default(),
            cost_search_multiplier: search.search_multiplier,
            cost_grid_points: search.grid_points,
            integration_panels: search.integration_panels,
            golden_relative_tolerance: search.relative_tolerance,
            golden_max_iterations: search.max_iterations,
            abc_a_percent: abc.a_percent,
            abc_b_percent: abc.b_percent,
        }
    }
}

impl EngineConfig {
    /// 完整加载流程：文件（可选）-> 环境变量 -> 校验
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        info!(
            time_unit = %config.time_unit,
            fit_method = %config.fit_method,
            "引擎配置加载完成"
        );
        Ok(config)
    }

    /// 从 JSON 文件读取（缺省字段取默认值）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "读取配置文件");
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 以进程环境变量覆写
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 以任意键值来源覆写（便于测试注入）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let invalid_env = |key: &str, value: &str| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        };

        if let Some(value) = lookup(env_keys::TIME_UNIT) {
            self.time_unit =
                TimeUnit::parse(&value).ok_or_else(|| invalid_env(env_keys::TIME_UNIT, &value))?;
        }
        if let Some(value) = lookup(env_keys::FIT_METHOD) {
            self.fit_method = FitMethod::parse(&value)
                .ok_or_else(|| invalid_env(env_keys::FIT_METHOD, &value))?;
        }
        if let Some(value) = lookup(env_keys::COST_SEARCH_MULTIPLIER) {
            self.cost_search_multiplier = value
                .trim()
                .parse()
                .map_err(|_| invalid_env(env_keys::COST_SEARCH_MULTIPLIER, &value))?;
        }
        if let Some(value) = lookup(env_keys::COST_GRID_POINTS) {
            self.cost_grid_points = value
                .trim()
                .parse()
                .map_err(|_| invalid_env(env_keys::COST_GRID_POINTS, &value))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_categories.is_empty() {
            return Err(ConfigError::invalid("failure_categories", "至少包含一个类别"));
        }
        if !self.cost_search_multiplier.is_finite() || self.cost_search_multiplier <= 1.0 {
            return Err(ConfigError::invalid(
                "cost_search_multiplier",
                format!("必须大于 1, 实际 {}", self.cost_search_multiplier),
            ));
        }
        if self.cost_grid_points < 10 {
            return Err(ConfigError::invalid(
                "cost_grid_points",
                format!("至少 10 个网格点, 实际 {}", self.cost_grid_points),
            ));
        }
        if self.integration_panels < 2 {
            return Err(ConfigError::invalid(
                "integration_panels",
                format!("至少 2 段, 实际 {}", self.integration_panels),
            ));
        }
        if !(self.golden_relative_tolerance > 0.0 && self.golden_relative_tolerance < 1.0) {
            return Err(ConfigError::invalid(
                "golden_relative_tolerance",
                format!("必须在 (0, 1), 实际 {}", self.golden_relative_tolerance),
            ));
        }
        if self.golden_max_iterations == 0 {
            return Err(ConfigError::invalid("golden_max_iterations", "必须大于 0"));
        }
        let a = self.abc_a_percent;
        let b = self.abc_b_percent;
        if !(a > 0.0 && a < b && b <= 100.0) {
            return Err(ConfigError::invalid(
                "abc_thresholds",
                format!("需满足 0 < A({}) < B({}) <= 100", a, b),
            ));
        }
        Ok(())
    }
}

impl EngineConfigReader for EngineConfig {
    fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    fn failure_categories(&self) -> Vec<EventCategory> {
        self.failure_categories.clone()
    }

    fn repair_categories(&self) -> Vec<EventCategory> {
        self.repair_categories.clone()
    }

    fn fit_method(&self) -> FitMethod {
        self.fit_method
    }

    fn cost_search_settings(&self) -> CostSearchSettings {
        CostSearchSettings {
            search_multiplier: self.cost_search_multiplier,
            grid_points: self.cost_grid_points,
            integration_panels: self.integration_panels,
            relative_tolerance: self.golden_relative_tolerance,
            max_iterations: self.golden_max_iterations,
        }
    }

    fn abc_thresholds(&self) -> AbcThresholds {
        AbcThresholds {
            a_percent: self.abc_a_percent,
            b_percent: self.abc_b_percent,
        }
    }

    fn default_pareto_basis(&self) -> ParetoBasis {
        self.pareto_basis
    }
}
