// ==========================================
// 设备可靠性分析系统 - 引擎层
// ==========================================
// 职责: 可靠性建模与维护优化规则引擎
// 红线: 引擎为纯函数,不做 I/O,不修改输入
// 红线: 所有失败必须归类为 ReliabilityError,不得 panic 或返回 NaN
// ==========================================

pub mod cost_interval;
pub mod error;
pub mod event_normalizer;
pub mod life_model;
pub mod metrics;
pub mod numeric;
pub mod orchestrator;
pub mod pareto;
pub mod tbf;
pub mod weibull;
pub mod workload;

// 重导出核心引擎
pub use cost_interval::{CostIntervalSolver, CostSearchSettings};
pub use error::{ErrorKind, ReliabilityError, ReliabilityResult};
pub use event_normalizer::{EventNormalizer, NormalizedEvents};
pub use life_model::WeibullModel;
pub use metrics::MetricsCalculator;
pub use orchestrator::{
    AnalysisReport, AnalysisRequest, AssetAnalysis, ReliabilityOrchestrator, StageOutcome,
    WorkloadAnalysis,
};
pub use pareto::{AbcThresholds, ParetoRanker};
pub use tbf::TbfExtractor;
pub use weibull::WeibullEstimator;
pub use workload::{CapacityViolation, LevelingResult, TaskAssignment, WorkloadScheduler};
