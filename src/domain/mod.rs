// ==========================================
// 设备可靠性分析系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、约束接口
// 红线: 不含计算逻辑,不含 I/O
// ==========================================

pub mod capacity;
pub mod cost;
pub mod event;
pub mod reliability;
pub mod task;
pub mod types;

// 重导出核心类型
pub use capacity::{CapacityConstraint, ResourceCapacity, WeeklyCeiling};
pub use cost::{CostComponents, CostModel};
pub use event::{
    AssetEventSeries, EventFilter, FailureEvent, RawEventRecord, UnusableEvent, UnusableReason,
    UNCATEGORIZED_MODE,
};
pub use reliability::{
    CostRatePoint, OptimalInterval, ParetoRow, ReliabilityMetrics, TbfSample, WeibullFit,
    WeibullParams,
};
pub use task::{LoadProfile, MaintenanceTask, WeeklyLoad, HORIZON_WEEKS, WEEKS_PER_MONTH};
pub use types::{
    AbcClass, EventCategory, FitConfidence, FitMethod, ParetoBasis, ParetoDimension, TimeUnit,
    VariabilityClass,
};
