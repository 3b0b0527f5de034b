// ==========================================
// 设备可靠性分析系统 - 核心库
// ==========================================
// 技术栈: Rust + serde + tracing
// 系统定位: 决策支持系统 (维护计划由人工最终确认)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 可靠性建模与维护优化
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AbcClass, EventCategory, FitConfidence, FitMethod, ParetoBasis, ParetoDimension, TimeUnit,
    VariabilityClass,
};

// 领域实体
pub use domain::{
    AssetEventSeries, CostComponents, CostModel, EventFilter, FailureEvent, LoadProfile,
    MaintenanceTask, OptimalInterval, ParetoRow, RawEventRecord, ReliabilityMetrics,
    ResourceCapacity, TbfSample, WeeklyLoad, WeibullFit, WeibullParams,
};

// 引擎
pub use engine::{
    AnalysisReport, AnalysisRequest, CostIntervalSolver, ErrorKind, EventNormalizer,
    MetricsCalculator, ParetoRanker, ReliabilityError, ReliabilityOrchestrator,
    ReliabilityResult, TbfExtractor, WeibullEstimator, WorkloadScheduler,
};

// 配置
pub use config::{EngineConfig, EngineConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备可靠性分析系统";
