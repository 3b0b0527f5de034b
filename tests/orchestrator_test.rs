// ==========================================
// ReliabilityOrchestrator 集成测试
// ==========================================
// 测试目标: 完整分析流程与单设备失败隔离
// 覆盖范围: 多设备分析 / 最优周期 / 帕累托 / 工作量 / 报告序列化
// ==========================================


use maint_reliability::domain::types::{FitMethod, ParetoBasis};
use maint_reliability::engine::{
    AnalysisRequest, ErrorKind, ReliabilityOrchestrator, StageOutcome,
};
use maint_reliability::domain::ResourceCapacity;
use std::sync::Arc;
use test_helpers::{
    cumulative_offsets, pm_task, raw_series, simple_cost_model, weibull_quantiles, MockConfig,
    RawEventBuilder,
};

fn fleet_request() -> AnalysisRequest {
    let mut events = Vec::new();
    // 磨损型设备: beta=3, eta=1000
    events.extend(raw_series(
        "WEAR-1",
        &cumulative_offsets(&weibull_quantiles(3.0, 1000.0, 30)),
        120.0,
    ));
    // 随机失效设备: beta=0.8, eta=300
    events.extend(raw_series(
        "RAND-1",
        &cumulative_offsets(&weibull_quantiles(0.8, 300.0, 30)),
        45.0,
    ));
    // 单事件设备
    events.extend(raw_series("NEW-1", &[10.0], 60.0));
    // 坏记录
    events.push(RawEventBuilder::new("broken", "WEAR-1").start_time("??").build());

    AnalysisRequest {
        events,
        cost_model: Some(simple_cost_model(100.0, 1000.0)),
        ..AnalysisRequest::default()
    }
}

#[test]
fn test_fleet_analysis_isolates_asset_failures() {
    println!("\n=== 测试：多设备分析,单设备失败不影响其他设备 ===");

    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::default()));
    let report = orchestrator.analyze(&fleet_request());

    assert_eq!(report.total_records, 64);
    assert_eq!(report.unusable.len(), 1);
    let ids: Vec<&str> = report.assets.iter().map(|a| a.asset_id.as_str()).collect();
    assert_eq!(ids, vec!["NEW-1", "RAND-1", "WEAR-1"]);

    // 磨损型: 全部阶段成功
    let wear = report.asset("WEAR-1").unwrap();
    assert_eq!(wear.tbf.len(), 30);
    let fit = wear.weibull.value().unwrap();
    assert!(fit.params.beta > 2.5 && fit.params.beta < 3.5);
    let interval = wear.optimal_interval.value().unwrap();
    assert!(interval.interval > 0.0 && interval.interval < fit.params.eta);
    let metrics = wear.metrics.value().unwrap();
    assert_eq!(metrics.mttr, 2.0);
    assert!(metrics.weibull_mtbf.is_some());

    // 随机失效: 周期优化不适用,其余成功
    let random = report.asset("RAND-1").unwrap();
    assert!(random.weibull.value().unwrap().params.beta < 1.0);
    assert_eq!(
        random.optimal_interval.failure_kind(),
        Some(ErrorKind::ModelNotApplicable)
    );
    assert!(random.metrics.is_ok());

    // 单事件: 数据不足
    let lone = report.asset("NEW-1").unwrap();
    assert!(lone.tbf.is_empty());
    assert_eq!(lone.weibull.failure_kind(), Some(ErrorKind::DataInsufficient));
    assert_eq!(lone.metrics.failure_kind(), Some(ErrorKind::DataInsufficient));
    assert!(matches!(lone.optimal_interval, StageOutcome::Skipped { .. }));
}

#[test]
fn test_fleet_pareto_by_downtime() {
    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::default()));
    let report = orchestrator.analyze(&fleet_request());

    assert_eq!(report.pareto_basis, ParetoBasis::Downtime);
    let rows = report.pareto_by_asset.value().unwrap();
    // WEAR-1: 31 * 120 分钟最多
    assert_eq!(rows[0].key, "WEAR-1");
    assert_eq!(rows[0].value, 31.0 * 120.0);
    assert_eq!(rows.last().unwrap().cumulative_percent, 100.0);

    let modes = report.pareto_by_failure_mode.value().unwrap();
    assert_eq!(modes.len(), 1);
    assert_eq!(modes[0].key, "bearing");
}

#[test]
fn test_request_basis_overrides_config() {
    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::default()));
    let mut request = fleet_request();
    request.pareto_basis = Some(ParetoBasis::Count);
    let report = orchestrator.analyze(&request);

    let rows = report.pareto_by_asset.value().unwrap();
    assert_eq!(report.pareto_basis, ParetoBasis::Count);
    assert_eq!(rows[0].value, 31.0);
}

#[test]
fn test_fit_method_follows_config() {
    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::with_fit_method(
        FitMethod::MaximumLikelihood,
    )));
    let report = orchestrator.analyze(&fleet_request());
    assert_eq!(report.fit_method, FitMethod::MaximumLikelihood);
    let fit = report.asset("WEAR-1").unwrap().weibull.value().unwrap();
    assert_eq!(fit.method, FitMethod::MaximumLikelihood);
}

#[test]
fn test_workload_section() {
    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::default()));
    let mut request = fleet_request();
    let mut t1 = pm_task("PM-1", 1.0, 4.0, 2, 1);
    t1.trade = Some("MECH".to_string());
    let mut t2 = pm_task("PM-2", 1.0, 4.0, 2, 1);
    t2.trade = Some("MECH".to_string());
    request.tasks = vec![t1, t2];
    request.capacities = vec![ResourceCapacity {
        trade: "MECH".to_string(),
        headcount: 1,
        weekly_hours_per_person: 40.0,
        utilization_rate: 0.5,
    }];

    let report = orchestrator.analyze(&request);
    let workload = report.workload.as_ref().unwrap();
    assert_eq!(workload.projection.value().unwrap().peak_hours, 16.0);
    let leveled = workload.leveling["MECH"].value().unwrap();
    assert_eq!(leveled.profile.peak_hours, 8.0);
    assert!(leveled.is_within_capacity());
}

#[test]
fn test_report_serializes_to_json() {
    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::default()));
    let report = orchestrator.analyze(&fleet_request());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["report_id"].as_str().is_some());
    assert_eq!(json["time_unit"], "HOURS");
    let assets = json["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 3);
    assert_eq!(assets[0]["weibull"]["status"], "FAILED");
    assert_eq!(assets[0]["weibull"]["kind"], "DATA_INSUFFICIENT");
    assert_eq!(assets[2]["optimal_interval"]["status"], "OK");
}

#[test]
fn test_request_deserializes_with_defaults() {
    let raw = r#"{
        "events": [
            {"id": "1", "asset_id": "P-1", "start_time": "2025-01-01T00:00:00Z", "duration_minutes": 30},
            {"id": "2", "asset_id": "P-1", "start_time": "2025-01-02 06:00:00"}
        ],
        "cost_model": {
            "preventive": {"material": 50, "labor": 30, "production_loss": 0},
            "corrective": {"material": 200, "labor": 100, "production_loss": 700}
        }
    }"#;
    let request: AnalysisRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(request.events.len(), 2);
    assert!(request.tasks.is_empty());
    assert_eq!(request.cost_model_for("P-1").unwrap().corrective_cost(), 1000.0);

    let orchestrator = ReliabilityOrchestrator::new(Arc::new(MockConfig::default()));
    let report = orchestrator.analyze(&request);
    assert_eq!(report.asset("P-1").unwrap().tbf.values, vec![30.0]);
}
