// ==========================================
// 设备可靠性分析系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义编排器所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::{EventCategory, FitMethod, ParetoBasis, TimeUnit};
use crate::engine::cost_interval::CostSearchSettings;
use crate::engine::pareto::AbcThresholds;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 用途: 编排器所需的配置读取接口
// 实现者: EngineConfig（文件 + 环境变量）、测试中的 Mock
pub trait EngineConfigReader: Send + Sync {
    // ===== 样本口径 =====

    /// TBF / MTTR 输出单位
    ///
    /// # 默认值
    /// - HOURS
    fn time_unit(&self) -> TimeUnit;

    /// 计入 TBF 的事件类别
    ///
    /// # 默认值
    /// - [UNPLANNED]
    fn failure_categories(&self) -> Vec<EventCategory>;

    /// 计入 MTTR 的事件类别
    ///
    /// # 默认值
    /// - [UNPLANNED]
    fn repair_categories(&self) -> Vec<EventCategory>;

    // ===== 模型参数 =====

    /// Weibull 拟合方法
    ///
    /// # 默认值
    /// - RANK_REGRESSION
    fn fit_method(&self) -> FitMethod;

    /// 最优周期搜索参数
    fn cost_search_settings(&self) -> CostSearchSettings;

    // ===== 帕累托 =====

    /// ABC 分档阈值
    ///
    /// # 默认值
    /// - A < 80%, B < 95%
    fn abc_thresholds(&self) -> AbcThresholds;

    /// 请求未指定口径时使用
    ///
    /// # 默认值
    /// - DOWNTIME
    fn default_pareto_basis(&self) -> ParetoBasis;
}
