// ==========================================
// 设备可靠性分析系统 - 引擎编排器
// ==========================================
// 用途: 协调规范化 -> TBF -> Weibull -> 指标 -> 最优周期 -> 帕累托 -> 工作量
// 红线: 单台设备失败只记录在该设备的阶段结果中,不得中断其他设备
// 红线: 编排器不做 I/O,请求与报告均为内存对象
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::capacity::ResourceCapacity;
use crate::domain::cost::CostModel;
use crate::domain::event::{AssetEventSeries, EventFilter, RawEventRecord, UnusableEvent};
use crate::domain::reliability::{
    OptimalInterval, ParetoRow, ReliabilityMetrics, TbfSample, WeibullFit,
};
use crate::domain::task::{LoadProfile, MaintenanceTask};
use crate::domain::types::{FitMethod, ParetoBasis, ParetoDimension, TimeUnit};
use crate::engine::error::{ErrorKind, ReliabilityResult};
use crate::engine::{
    CostIntervalSolver, EventNormalizer, LevelingResult, MetricsCalculator, ParetoRanker,
    TbfExtractor, WeibullEstimator, WorkloadScheduler,
};
use crate::perf::{self, PerfGuard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// AnalysisRequest - 分析请求
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    /// 导入层交付的原始事件
    pub events: Vec<RawEventRecord>,
    pub filter: EventFilter,
    /// 全体设备通用的成本模型
    pub cost_model: Option<CostModel>,
    /// 按设备覆写的成本模型
    pub asset_cost_models: BTreeMap<String, CostModel>,
    /// 帕累托口径（缺省取配置）
    pub pareto_basis: Option<ParetoBasis>,
    pub tasks: Vec<MaintenanceTask>,
    pub capacities: Vec<ResourceCapacity>,
}

impl AnalysisRequest {
    pub fn cost_model_for(&self, asset_id: &str) -> Option<&CostModel> {
        self.asset_cost_models
            .get(asset_id)
            .or(self.cost_model.as_ref())
    }
}

// ==========================================
// StageOutcome - 单阶段结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageOutcome<T> {
    Ok { value: T },
    Failed { kind: ErrorKind, reason: String },
    /// 前置条件缺失（上游失败/未提供输入）
    Skipped { reason: String },
}

impl<T> StageOutcome<T> {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StageOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            StageOutcome::Ok { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StageOutcome::Ok { .. })
    }

    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            StageOutcome::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl<T> From<ReliabilityResult<T>> for StageOutcome<T> {
    fn from(result: ReliabilityResult<T>) -> Self {
        match result {
            Ok(value) => StageOutcome::Ok { value },
            Err(e) => StageOutcome::Failed {
                kind: e.kind(),
                reason: e.to_string(),
            },
        }
    }
}

// ==========================================
// AnalysisReport - 分析报告
// ==========================================

/// 单台设备分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAnalysis {
    pub asset_id: String,
    pub event_count: usize,
    pub tbf: TbfSample,
    pub weibull: StageOutcome<WeibullFit>,
    pub metrics: StageOutcome<ReliabilityMetrics>,
    pub optimal_interval: StageOutcome<OptimalInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadAnalysis {
    /// 按当前起始周的负荷预测
    pub projection: StageOutcome<LoadProfile>,
    /// 工种 -> 平衡结果
    pub leveling: BTreeMap<String, StageOutcome<LevelingResult>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub time_unit: TimeUnit,
    pub fit_method: FitMethod,
    pub total_records: usize,
    pub filtered_out: usize,
    pub unusable: Vec<UnusableEvent>,
    /// 按设备编号排序
    pub assets: Vec<AssetAnalysis>,
    pub pareto_basis: ParetoBasis,
    pub pareto_by_asset: StageOutcome<Vec<ParetoRow>>,
    pub pareto_by_failure_mode: StageOutcome<Vec<ParetoRow>>,
    /// 请求未包含 PM 任务时为 None
    pub workload: Option<WorkloadAnalysis>,
}

impl AnalysisReport {
    pub fn asset(&self, asset_id: &str) -> Option<&AssetAnalysis> {
        self.assets.iter().find(|a| a.asset_id == asset_id)
    }
}

// ==========================================
// ReliabilityOrchestrator - 引擎编排器
// ==========================================

pub struct ReliabilityOrchestrator<C>
where
    C: EngineConfigReader,
{
    config: Arc<C>,
    normalizer: EventNormalizer,
    extractor: TbfExtractor,
    estimator: WeibullEstimator,
    metrics: MetricsCalculator,
    ranker: ParetoRanker,
    solver: CostIntervalSolver,
    scheduler: WorkloadScheduler,
}

impl<C> ReliabilityOrchestrator<C>
where
    C: EngineConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self {
            normalizer: EventNormalizer::new(),
            extractor: TbfExtractor::new(),
            estimator: WeibullEstimator::with_method(config.fit_method()),
            metrics: MetricsCalculator::new(),
            ranker: ParetoRanker::with_thresholds(config.abc_thresholds()),
            solver: CostIntervalSolver::with_settings(config.cost_search_settings()),
            scheduler: WorkloadScheduler::new(),
            config,
        }
    }

    /// 执行完整分析流程
    #[instrument(skip(self, request), fields(
        records = request.events.len(),
        tasks = request.tasks.len()
    ))]
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let _perf = PerfGuard::new("analyze");
        let unit = self.config.time_unit();

        // ==========================================
        // 步骤1: 事件规范化
        // ==========================================
        let normalized = self.normalizer.normalize_raw(&request.events, &request.filter);
        perf::record_items(normalized.total_records);
        if !normalized.unusable.is_empty() {
            warn!(unusable = normalized.unusable.len(), "存在不可用事件记录");
        }

        // ==========================================
        // 步骤2: 逐设备分析（互不影响）
        // ==========================================
        let assets: Vec<AssetAnalysis> = normalized
            .assets
            .values()
            .map(|series| self.analyze_asset(series, request.cost_model_for(&series.asset_id)))
            .collect();

        // ==========================================
        // 步骤3: 全局帕累托
        // ==========================================
        let basis = request
            .pareto_basis
            .unwrap_or_else(|| self.config.default_pareto_basis());
        let pareto_by_asset = self
            .ranker
            .rank_events(normalized.events(), ParetoDimension::Asset, basis)
            .into();
        let pareto_by_failure_mode = self
            .ranker
            .rank_events(normalized.events(), ParetoDimension::FailureMode, basis)
            .into();

        // ==========================================
        // 步骤4: PM 工作量（可选）
        // ==========================================
        let workload = if request.tasks.is_empty() {
            None
        } else {
            Some(self.analyze_workload(&request.tasks, &request.capacities))
        };

        let report = AnalysisReport {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            time_unit: unit,
            fit_method: self.estimator.method(),
            total_records: normalized.total_records,
            filtered_out: normalized.filtered_out,
            unusable: normalized.unusable,
            assets,
            pareto_basis: basis,
            pareto_by_asset,
            pareto_by_failure_mode,
            workload,
        };

        info!(
            report_id = %report.report_id,
            assets = report.assets.len(),
            unusable = report.unusable.len(),
            "分析完成"
        );
        report
    }

    /// 单台设备分析: TBF -> Weibull -> 指标 -> 最优周期
    ///
    /// # 参数
    /// - series: 时间有序事件（全部类别,内部按配置筛选）
    /// - cost_model: 无成本模型时跳过最优周期
    #[instrument(skip(self, series, cost_model), fields(asset_id = %series.asset_id))]
    pub fn analyze_asset(
        &self,
        series: &AssetEventSeries,
        cost_model: Option<&CostModel>,
    ) -> AssetAnalysis {
        let unit = self.config.time_unit();
        let failure_categories = self.config.failure_categories();
        let repair_categories = self.config.repair_categories();

        let failures = series.of_categories(&failure_categories);
        let tbf = self.extractor.extract(&failures, unit);
        perf::record_items(tbf.len());

        let weibull: StageOutcome<WeibullFit> = self.estimator.estimate(&tbf).into();
        let params = weibull.value().map(|fit| fit.params);

        let repairs = self.extractor.repair_durations(series, &repair_categories, unit);
        let metrics = self.metrics.compute(&tbf, &repairs, params.as_ref()).into();

        let optimal_interval = match (params, cost_model) {
            (Some(p), Some(cost)) => self.solver.solve(&p, cost).into(),
            (None, _) => StageOutcome::skipped("Weibull 拟合未成功"),
            (_, None) => StageOutcome::skipped("未提供成本模型"),
        };

        debug!(
            tbf_count = tbf.len(),
            weibull_ok = weibull.is_ok(),
            "设备分析完成"
        );

        AssetAnalysis {
            asset_id: series.asset_id.clone(),
            event_count: series.len(),
            tbf,
            weibull,
            metrics,
            optimal_interval,
        }
    }

    /// PM 工作量: 整体负荷预测 + 按工种平衡
    pub fn analyze_workload(
        &self,
        tasks: &[MaintenanceTask],
        capacities: &[ResourceCapacity],
    ) -> WorkloadAnalysis {
        let _perf = PerfGuard::new("analyze_workload");
        perf::record_items(tasks.len());

        let projection = self.scheduler.project(tasks).into();
        let leveling = self
            .scheduler
            .level_by_trade(tasks, capacities)
            .into_iter()
            .map(|(trade, result)| (trade, StageOutcome::from(result)))
            .collect();

        WorkloadAnalysis {
            projection,
            leveling,
        }
    }
}
