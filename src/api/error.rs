// ==========================================
// 机场查询服务 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换用例错误为对外错误消息
// 说明: 对外消息固定，内部细节只进日志
// ==========================================

use crate::use_cases::AirportLookupError;
use thiserror::Error;

// 对外错误消息
pub const MSG_INVALID_IATA_CODE: &str = "Invalid IATA code provided";
pub const MSG_AIRPORT_NOT_FOUND: &str = "Airport not found";
pub const MSG_INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";

/// API层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("无效的 IATA 三字码: {0}")]
    InvalidIataCode(String),

    // ==========================================
    // 查询错误
    // ==========================================
    /// detail 为 Some 时表示由查询异常归并而来
    #[error("机场不存在: {iata_code}")]
    AirportNotFound {
        iata_code: String,
        detail: Option<String>,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储故障: {0}")]
    StorageFailure(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 对外错误消息
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidIataCode(_) => MSG_INVALID_IATA_CODE,
            ApiError::AirportNotFound { .. } => MSG_AIRPORT_NOT_FOUND,
            ApiError::StorageFailure(_) | ApiError::InternalError(_) => MSG_INTERNAL_SERVER_ERROR,
        }
    }
}

// ==========================================
// 从 AirportLookupError 转换
// 目的: 非存储类异常一律对外表现为“机场不存在”
// ==========================================
impl From<AirportLookupError> for ApiError {
    fn from(err: AirportLookupError) -> Self {
        match err {
            AirportLookupError::NotFound { iata_code } => ApiError::AirportNotFound {
                iata_code,
                detail: None,
            },
            AirportLookupError::LookupFault { iata_code, message } => ApiError::AirportNotFound {
                iata_code,
                detail: Some(message),
            },
            AirportLookupError::StorageFailure(msg) => ApiError::StorageFailure(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
