// ==========================================
// 机场查询服务 - 导入结果
// ==========================================

use serde::{Deserialize, Serialize};

/// 单次导入汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub run_id: String,
    pub countries: usize,    // 写入的国家数
    pub cities: usize,       // 写入的城市数
    pub airports: usize,     // 写入的机场数
    pub skipped_rows: usize, // 业务主键缺失而跳过的行
    pub sql_statements: u64, // 解析与写入期间执行的 SQL 语句数（统计关闭时为 0）
    pub elapsed_ms: u64,
}

/// 导入结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportOutcome {
    /// country 表非空，整体跳过（不做部分补导）
    Skipped { existing_countries: i64 },
    Imported(ImportSummary),
}
