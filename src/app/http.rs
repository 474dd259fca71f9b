// ==========================================
// 机场查询服务 - HTTP 路由
// ==========================================
// 路由:
//   GET /api/airports/:iata_code  机场查询
//   GET /health                   健康检查
//   其他                          404 {"error":"Route not found"}
// 说明: 查询为同步 SQLite 调用，放入 spawn_blocking 执行
// ==========================================

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::api::error::{ApiError, MSG_ROUTE_NOT_FOUND};
use crate::app::state::AppState;

/// 错误响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 健康检查响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/airports/:iata_code", get(get_airport))
        .route("/health", get(health))
        .fallback(route_not_found)
        .with_state(state)
}

/// GET /api/airports/:iata_code
///
/// 路径参数无法解码（如非 UTF-8 的百分号编码）同样按无效三字码处理
pub async fn get_airport(
    State(state): State<AppState>,
    iata_code: Result<Path<String>, PathRejection>,
) -> Response {
    let iata_code = match iata_code {
        Ok(Path(code)) => code,
        Err(rejection) => {
            return map_api_error(ApiError::InvalidIataCode(rejection.body_text())).into_response()
        }
    };

    let api = state.airport_api.clone();
    let result = tokio::task::spawn_blocking(move || api.get_airport(&iata_code))
        .await
        .unwrap_or_else(|join_err| {
            Err(ApiError::InternalError(format!("查询任务异常终止: {}", join_err)))
        });

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => map_api_error(e).into_response(),
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// 未匹配路由
pub async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::NOT_FOUND, MSG_ROUTE_NOT_FOUND)
}

/// ApiError → (状态码, 错误响应体)
pub fn map_api_error(err: ApiError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        ApiError::InvalidIataCode(_) => StatusCode::BAD_REQUEST,
        ApiError::AirportNotFound { detail, iata_code } => {
            if let Some(detail) = detail {
                warn!(iata_code = %iata_code, detail = %detail, "查询异常按机场不存在返回");
            }
            StatusCode::NOT_FOUND
        }
        ApiError::StorageFailure(_) | ApiError::InternalError(_) => {
            error!(error = %err, "机场查询失败");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.public_message())
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
