// ==========================================
// 机场查询服务 - 配置层
// ==========================================
// 职责: 启动配置读取（环境变量 / .env）
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{config_keys, AppConfig, ConfigError};
