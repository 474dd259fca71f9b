// ==========================================
// 机场查询服务 - 参考数据导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 解析 → 类型转换 → 字段映射 → 按业务主键 upsert
// ==========================================

use crate::domain::{Airport, City, Country, ImportOutcome};
use crate::importer::cell_value::{CellValue, RawRow, SourceRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

// ==========================================
// ReferenceImporter Trait
// ==========================================
// 用途: 参考数据导入主接口
// 实现者: ReferenceImporterImpl
#[async_trait]
pub trait ReferenceImporter: Send + Sync {
    /// 执行一次导入
    ///
    /// # 返回
    /// - Ok(Skipped): country 表非空，未做任何写入
    /// - Ok(Imported): 三个数据集均已写入
    /// - Err(SheetMissing): 致命，调用方应终止启动
    /// - Err(其他): 读取/解析/写入失败，后续数据集已放弃
    ///
    /// # 导入流程
    /// 1. 存在性检查（country 计数 > 0 则跳过）
    /// 2. 打开导入源，定位 airports / cities / countries
    /// 3. 解析为行记录
    /// 4. 按 国家 → 城市 → 机场 顺序：类型转换 + 映射 + 并发 upsert
    async fn import(&self) -> ImportResult<ImportOutcome>;
}

// ==========================================
// 导入源解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReferenceSheets {
    pub countries: Vec<SourceRow>,
    pub cities: Vec<SourceRow>,
    pub airports: Vec<SourceRow>,
}

// ==========================================
// ReferenceFileParser Trait
// ==========================================
// 用途: 导入源解析接口
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait ReferenceFileParser: Send + Sync {
    /// 解析导入源为三组原始行记录
    ///
    /// # 返回
    /// - Ok(ReferenceSheets): 三组行记录（表头 → 单元格值）
    /// - Err(SheetMissing): 缺少任一必需工作表
    /// - Err: 文件读取错误、格式错误
    fn parse_reference_sheets(&self, source_path: &Path) -> ImportResult<ReferenceSheets>;
}

// ==========================================
// ValueCaster Trait
// ==========================================
// 用途: 单元格类型转换接口（按字段名决定目标类型）
// 实现者: ValueCaster (value_caster.rs)
pub trait ValueCaster: Send + Sync {
    /// 转换单个单元格
    ///
    /// # 参数
    /// - value: 原始单元格值
    /// - field: 字段名（列名）
    /// - imported_at: 本次导入时间（日期字段为空时的默认值）
    ///
    /// # 说明
    /// - 不返回错误；无法解析的数值为 NaN，无法解析的日期为 InvalidDate
    fn cast_value(&self, value: CellValue, field: &str, imported_at: DateTime<Utc>) -> CellValue;

    /// 转换整行
    fn cast_row(&self, row: RawRow, imported_at: DateTime<Utc>) -> RawRow {
        row.into_iter()
            .map(|(field, value)| {
                let cast = self.cast_value(value, &field, imported_at);
                (field, cast)
            })
            .collect()
    }
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 已转换行 → 领域实体
// 实现者: FieldMapper (field_mapper.rs)
pub trait FieldMapper: Send + Sync {
    /// # 参数
    /// - row: 已转换的行记录
    /// - row_number: 源文件行号（用于日志）
    ///
    /// # 返回
    /// - Err(MissingBusinessId): id 为空或 NaN，无法作为 upsert 键
    fn map_country(&self, row: &RawRow, row_number: usize) -> ImportResult<Country>;

    fn map_city(&self, row: &RawRow, row_number: usize) -> ImportResult<City>;

    /// 缺少 created_at / updated_at 列时使用 imported_at
    fn map_airport(
        &self,
        row: &RawRow,
        row_number: usize,
        imported_at: DateTime<Utc>,
    ) -> ImportResult<Airport>;
}
