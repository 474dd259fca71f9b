// ==========================================
// 机场查询服务 - 城市领域模型
// ==========================================
// 对齐: city 表
// 关联: country_id → country.id（软引用，存储层不做约束）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country_id: Option<i64>, // 软引用 → Country.id
    pub is_active: bool,
    pub lat: Option<f64>,  // 纬度（度）
    pub long: Option<f64>, // 经度（度）
}
