// ==========================================
// 机场查询服务 - 导入层
// ==========================================
// 职责: 启动时将参考数据（国家/城市/机场）批量写入存储
// 支持: Excel 工作簿, CSV 目录
// ==========================================

// 模块声明
pub mod cell_value;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod reference_importer_impl;
pub mod reference_importer_trait;
pub mod value_caster;

// 重导出核心类型
pub use cell_value::{CellValue, RawRow, SourceRow};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use reference_importer_impl::ReferenceImporterImpl;
pub use value_caster::ValueCaster as ValueCasterImpl;

// 重导出 Trait 接口
pub use reference_importer_trait::{
    FieldMapper, ReferenceFileParser, ReferenceImporter, ReferenceSheets, ValueCaster,
};
