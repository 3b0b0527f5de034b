// ==========================================
// 设备可靠性分析系统 - 命令行入口
// ==========================================
// 用法:
//   maint-reliability <request.json | -> [config.json]
//
// 读取一份分析请求（文件或 stdin）,输出一份分析报告 JSON 到 stdout。
// 日志输出到 stderr（RUST_LOG 控制级别）。
// ==========================================

use anyhow::{bail, Context, Result};
use maint_reliability::{
    logging, AnalysisRequest, EngineConfig, ReliabilityOrchestrator, APP_NAME, VERSION,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

fn read_request(source: &str) -> Result<AnalysisRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("读取 stdin 失败")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("读取请求文件失败: {}", source))?
    };
    serde_json::from_str(&raw).context("请求 JSON 解析失败")
}

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(request_source) = args.next() else {
        bail!("用法: maint-reliability <request.json | -> [config.json]");
    };
    let config_path = args.next().map(PathBuf::from);

    tracing::info!(app = APP_NAME, version = VERSION, "启动分析");

    let config = EngineConfig::load(config_path.as_deref()).context("加载引擎配置失败")?;
    let request = read_request(&request_source)?;

    let orchestrator = ReliabilityOrchestrator::new(Arc::new(config));
    let report = orchestrator.analyze(&request);

    let json = serde_json::to_string_pretty(&report).context("报告序列化失败")?;
    println!("{}", json);
    Ok(())
}
