// ==========================================
// EngineConfig 集成测试
// ==========================================
// 测试目标: 配置文件读取、环境变量覆写、校验、编排器接入
// ==========================================

use maint_reliability::config::{env_keys, ConfigError, EngineConfig, EngineConfigReader};
use maint_reliability::domain::types::{EventCategory, FitMethod, ParetoBasis, TimeUnit};
use maint_reliability::engine::{AnalysisRequest, ReliabilityOrchestrator};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"{
            "time_unit": "DAYS",
            "fit_method": "MAXIMUM_LIKELIHOOD",
            "failure_categories": ["UNPLANNED", "EXTERNAL"],
            "pareto_basis": "COUNT",
            "cost_grid_points": 120
        }"#,
    );

    let config = EngineConfig::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.time_unit(), TimeUnit::Days);
    assert_eq!(config.fit_method(), FitMethod::MaximumLikelihood);
    assert_eq!(
        config.failure_categories(),
        vec![EventCategory::Unplanned, EventCategory::External]
    );
    assert_eq!(config.repair_categories(), vec![EventCategory::Unplanned]);
    assert_eq!(config.default_pareto_basis(), ParetoBasis::Count);
    assert_eq!(config.cost_search_settings().grid_points, 120);
    assert_eq!(config.abc_thresholds().a_percent, 80.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let file = write_config("{ not json");
    let err = EngineConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_enum_value_is_parse_error() {
    let file = write_config(r#"{"time_unit": "FORTNIGHTS"}"#);
    assert!(matches!(
        EngineConfig::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_file_then_overrides_then_validate() {
    let file = write_config(r#"{"time_unit": "DAYS", "cost_search_multiplier": 3.0}"#);
    let mut config = EngineConfig::from_file(file.path()).unwrap();

    config
        .apply_overrides(|key| match key {
            k if k == env_keys::TIME_UNIT => Some("HOURS".to_string()),
            k if k == env_keys::COST_SEARCH_MULTIPLIER => Some("0.5".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(config.time_unit, TimeUnit::Hours);

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "cost_search_multiplier"));
}

#[test]
fn test_empty_failure_categories_rejected() {
    let config = EngineConfig::from_json_str(r#"{"failure_categories": []}"#).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_orchestrator_uses_config_time_unit() {
    let config = EngineConfig {
        time_unit: TimeUnit::Days,
        ..EngineConfig::default()
    };
    let request: AnalysisRequest = serde_json::from_str(
        r#"{"events": [
            {"id": "1", "asset_id": "K-1", "start_time": "2025-01-01"},
            {"id": "2", "asset_id": "K-1", "start_time": "2025-01-03"}
        ]}"#,
    )
    .unwrap();

    let report = ReliabilityOrchestrator::new(Arc::new(config)).analyze(&request);
    assert_eq!(report.time_unit, TimeUnit::Days);
    assert_eq!(report.asset("K-1").unwrap().tbf.values, vec![2.0]);
}
