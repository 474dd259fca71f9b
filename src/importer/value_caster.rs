// ==========================================
// 机场查询服务 - 单元格类型转换器
// ==========================================
// 职责: 按字段名将原始单元格转换为目标类型
// 规则:
//   整数字段: 假值或解析为 0 → null，否则转数值（失败为 NaN）
//   浮点字段: 假值或解析为 0 → null，否则取前缀浮点数（失败为 NaN）
//   is_active: 仅 true / "true" / "True" / 1 为真
//   日期字段: 假值 → 导入时间，否则解析（失败保留为 InvalidDate）
//   其他字段: 原样透传
// ==========================================

use crate::importer::cell_value::{excel_serial_to_datetime, CellValue};
use crate::importer::reference_importer_trait::ValueCaster as ValueCasterTrait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// 整数类字段
pub const INTEGER_FIELDS: &[&str] = &[
    "id",
    "country_id",
    "continent_id",
    "mobile_code",
    "elevation_ft",
];

/// 浮点类字段
pub const FLOAT_FIELDS: &[&str] = &["latitude_deg", "longitude_deg", "lat", "long"];

/// 日期类字段
pub const DATE_FIELDS: &[&str] = &["created_at", "updated_at"];

/// 布尔字段
pub const BOOLEAN_FIELD: &str = "is_active";

const TEXT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

pub struct ValueCaster;

impl ValueCasterTrait for ValueCaster {
    fn cast_value(&self, value: CellValue, field: &str, imported_at: DateTime<Utc>) -> CellValue {
        let value = trim_text(value);

        if INTEGER_FIELDS.contains(&field) {
            cast_integer(value)
        } else if FLOAT_FIELDS.contains(&field) {
            cast_float(value)
        } else if field == BOOLEAN_FIELD {
            cast_boolean(value)
        } else if DATE_FIELDS.contains(&field) {
            cast_date(value, imported_at)
        } else {
            value
        }
    }
}

fn trim_text(value: CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                CellValue::Text(s)
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        other => other,
    }
}

fn cast_integer(value: CellValue) -> CellValue {
    // 已转换过的 NaN 保持不变
    if let CellValue::Number(n) = value {
        if n.is_nan() {
            return value;
        }
    }
    if value.is_falsy() {
        return CellValue::Empty;
    }
    let n = match value {
        CellValue::Number(n) => n,
        CellValue::Text(s) => parse_number_strict(&s),
        CellValue::Bool(_) => 1.0,
        CellValue::DateTime(dt) => dt.timestamp_millis() as f64,
        CellValue::InvalidDate(_) | CellValue::Empty => f64::NAN,
    };
    zero_to_empty(n)
}

fn cast_float(value: CellValue) -> CellValue {
    if let CellValue::Number(n) = value {
        if n.is_nan() {
            return value;
        }
    }
    if value.is_falsy() {
        return CellValue::Empty;
    }
    let n = match value {
        CellValue::Number(n) => n,
        CellValue::Text(s) => parse_float_prefix(&s),
        _ => f64::NAN,
    };
    zero_to_empty(n)
}

/// 解析结果为 0（如 "0" / "-0.0"）同样归为 null，保证二次转换结果不变
fn zero_to_empty(n: f64) -> CellValue {
    if n == 0.0 {
        CellValue::Empty
    } else {
        CellValue::Number(n)
    }
}

fn cast_boolean(value: CellValue) -> CellValue {
    let active = match &value {
        CellValue::Bool(b) => *b,
        CellValue::Text(s) => s == "true" || s == "True",
        CellValue::Number(n) => *n == 1.0,
        _ => false,
    };
    CellValue::Bool(active)
}

fn cast_date(value: CellValue, imported_at: DateTime<Utc>) -> CellValue {
    if value.is_falsy() {
        return CellValue::DateTime(imported_at);
    }
    match value {
        CellValue::DateTime(dt) => CellValue::DateTime(dt),
        CellValue::InvalidDate(raw) => CellValue::InvalidDate(raw),
        CellValue::Number(serial) => match excel_serial_to_datetime(serial) {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::InvalidDate(serial.to_string()),
        },
        CellValue::Text(s) => match parse_date_text(&s) {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::InvalidDate(s),
        },
        CellValue::Bool(b) => CellValue::InvalidDate(b.to_string()),
        CellValue::Empty => CellValue::DateTime(imported_at),
    }
}

/// 整串数值解析，任何多余字符都视为 NaN
fn parse_number_strict(text: &str) -> f64 {
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let allowed = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !allowed {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// 前缀浮点数解析："28.5abc" → 28.5，"abc" → NaN
fn parse_float_prefix(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // 指数部分必须完整才计入
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in TEXT_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in TEXT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
