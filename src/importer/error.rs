// ==========================================
// 机场查询服务 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 致命（缺少工作表）/ 可吞掉（读取、解析、批量写入失败）
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls 或 CSV 目录）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 启动前置条件（致命）=====
    #[error("导入源缺少必需的工作表 [{}]: {source_path}", missing.join(", "))]
    SheetMissing {
        missing: Vec<String>,
        source_path: String,
    },

    // ===== 数据映射错误 =====
    #[error("业务主键缺失 (工作表 {sheet}, 行 {row}): id 为空或无法解析")]
    MissingBusinessId { sheet: String, row: usize },

    // ===== 批量写入错误 =====
    #[error("批量写入失败 ({stage}): {failed}/{total} 条失败, 首个错误: {message}")]
    BatchFailure {
        stage: String,
        failed: usize,
        total: usize,
        message: String,
    },

    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// 是否为致命错误（进程不得继续启动）
    pub fn is_fatal(&self) -> bool {
        matches!(self, ImportError::SheetMissing { .. })
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
