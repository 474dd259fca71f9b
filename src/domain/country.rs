// ==========================================
// 机场查询服务 - 国家领域模型
// ==========================================
// 对齐: country 表
// 主键: id（业务主键，来源于导入数据，非存储自增）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Country - 国家
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    // ===== 主键 =====
    pub id: i64, // 业务主键（upsert/关联键）

    // ===== 基础信息 =====
    pub name: String,
    pub alt_name: Option<String>,   // 别名
    pub country_code_two: String,   // ISO 两位代码
    pub country_code_three: String, // ISO 三位代码

    // ===== 国旗资源（可选）=====
    pub flag_app: Option<String>,
    pub country_flag: Option<String>,

    // ===== 编码 =====
    pub mobile_code: Option<i64>,  // 国际电话区号
    pub continent_id: Option<i64>, // 大洲 ID
}
