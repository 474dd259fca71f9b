// ==========================================
// 机场查询服务 - 机场信息补全用例
// ==========================================
// 职责: 按 IATA 三字码返回机场，并嵌入城市与国家信息
// 输出: AirportResponse（对外响应契约，字段固定）
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 机场信息补全用例
///
/// 输入: iata_code（调用方已完成格式校验）
/// 输出: AirportResponse
/// 失败: NotFound / LookupFault / StorageFailure
pub trait AirportEnrichmentUseCase: Send + Sync {
    fn execute(&self, iata_code: &str) -> Result<AirportResponse, AirportLookupError>;
}

/// 用例错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirportLookupError {
    #[error("机场不存在: {iata_code}")]
    NotFound { iata_code: String },

    /// 非存储类查询异常（如记录损坏）；对外与 NotFound 表现一致
    #[error("机场查询异常 ({iata_code}): {message}")]
    LookupFault { iata_code: String, message: String },

    #[error("存储故障: {0}")]
    StorageFailure(String),
}

/// 响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportResponse {
    pub airport: AirportView,
}

/// 机场投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportView {
    pub id: i64,
    pub icao_code: String,
    pub iata_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub airport_type: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    /// 为 0 或缺失时为 null
    pub elevation_ft: Option<i64>,
    pub address: AddressView,
}

/// 地址（引用悬空时对应项为 null）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressView {
    pub city: Option<CityView>,
    pub country: Option<CountryView>,
}

/// 城市投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityView {
    pub id: i64,
    pub name: String,
    pub country_id: Option<i64>,
    pub is_active: bool,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

/// 国家投影（不含别名与旗帜字段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryView {
    pub id: i64,
    pub name: String,
    pub country_code_two: String,
    pub country_code_three: String,
    pub mobile_code: Option<i64>,
    pub continent_id: Option<i64>,
}
