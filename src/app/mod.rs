// ==========================================
// 机场查询服务 - 应用层
// ==========================================
// 职责: HTTP 路由、共享状态、启动流程
// ==========================================

pub mod bootstrap;
pub mod http;
pub mod state;

// 重导出
pub use bootstrap::{run, run_startup_import};
pub use http::{build_router, map_api_error, ErrorResponse, HealthResponse};
pub use state::AppState;
