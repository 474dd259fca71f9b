// ==========================================
// 机场查询服务 - 单元格原始值
// ==========================================
// 职责: 统一 Excel / CSV 单元格的异构取值
// 说明: 类型转换前后均使用 CellValue 表示，便于幂等校验
// ==========================================

use calamine::Data;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;

/// 一行原始记录（列名 → 单元格值）
pub type RawRow = HashMap<String, CellValue>;

/// 导入源中的一行数据及其源行号（从 1 开始，含表头行）
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub row_number: usize,
    pub cells: RawRow,
}

/// 单元格值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空单元格 / 转换后的 null
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    /// 日期字段中无法解析的原始文本
    InvalidDate(String),
}

impl CellValue {
    /// 判断是否为“假值”：空、空字符串、0、NaN、false
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Bool(b) => !*b,
            CellValue::DateTime(_) | CellValue::InvalidDate(_) => false,
        }
    }

    /// 文本表示（文本类字段映射使用）
    ///
    /// 整数值的数字不带小数位（1.0 → "1"）
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty | CellValue::InvalidDate(_) => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.to_rfc3339()),
        }
    }

    /// CSV 字段：空串视为空单元格，其余一律为文本
    pub fn from_csv_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
                Some(parsed) => CellValue::DateTime(parsed),
                None => CellValue::InvalidDate(dt.as_f64().to_string()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            // 公式错误（#N/A 等）按空单元格处理
            Data::Error(_) => CellValue::Empty,
        }
    }
}

/// Excel 日期序列号 → UTC 时间（1900 日期系统，基准 1899-12-30）
pub fn excel_serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    // 超出 9999-12-31 的序列号视为无效
    if !serial.is_finite() || serial.abs() > 2_958_465.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let naive = base.checked_add_signed(Duration::milliseconds(millis))?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
