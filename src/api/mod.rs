// ==========================================
// 机场查询服务 - API 层
// ==========================================
// 职责: 对外查询接口（输入校验 + 用例调用 + 错误归类）
// 红线: 不直接访问数据库
// ==========================================

pub mod airport_api;
pub mod error;
pub mod validator;

// 重导出
pub use airport_api::AirportApi;
pub use error::{ApiError, ApiResult};
pub use validator::{is_valid_iata_code, validate_iata_code};
