// ==========================================
// 设备可靠性分析系统 - 配置层
// ==========================================
// 职责: 引擎参数管理（JSON 文件 -> 环境变量覆写 -> 校验）
// 红线: 引擎只通过 EngineConfigReader 读取配置
// ==========================================

pub mod engine_config;
pub mod engine_config_trait;

// 重导出核心配置
pub use engine_config::{env_keys, ConfigError, EngineConfig};
pub use engine_config_trait::EngineConfigReader;
