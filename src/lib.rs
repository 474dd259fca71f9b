// ==========================================
// 机场查询服务 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 按 IATA 三字码查询机场 + 启动时参考数据导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 用例层 - 响应契约
pub mod use_cases;

// 配置层 - 环境变量
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能追踪
pub mod perf;

// API 层 - 查询接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Airport, AirportWithRefs, City, Country, ImportOutcome, ImportSummary};

// API
pub use api::{AirportApi, ApiError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "机场查询服务";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
