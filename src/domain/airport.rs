// ==========================================
// 机场查询服务 - 机场领域模型
// ==========================================
// 对齐: airport 表
// 外部查询键: iata_code（唯一，不参与内部关联）
// 内部关联键: city_id / country_id（软引用）
// ==========================================

use crate::domain::city::City;
use crate::domain::country::Country;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Airport - 机场
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    // ===== 主键 =====
    pub id: i64,

    // ===== 代码 =====
    pub icao_code: String,
    pub iata_code: Option<String>, // 空值存为 NULL，避免唯一索引冲突

    // ===== 基础信息 =====
    pub name: String,
    #[serde(rename = "type")]
    pub airport_type: String, // 如 large_airport / medium_airport

    // ===== 关联（软引用）=====
    pub city_id: Option<i64>,
    pub country_id: Option<i64>,
    pub continent_id: Option<i64>,

    // ===== 链接 =====
    pub website_url: Option<String>,
    pub wikipedia_link: Option<String>,

    // ===== 时间戳 =====
    // None 表示源数据中的日期无法解析
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    // ===== 地理信息 =====
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
}

// ==========================================
// AirportWithRefs - 关联解析后的机场
// ==========================================
// city / country 为 None 表示引用悬空（或引用字段本身为空），不是错误
#[derive(Debug, Clone, PartialEq)]
pub struct AirportWithRefs {
    pub airport: Airport,
    pub city: Option<City>,
    pub country: Option<Country>,
}
