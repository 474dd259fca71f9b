// ==========================================
// 机场查询服务 - 导入源解析器实现
// ==========================================
// 支持: Excel 工作簿 (.xlsx/.xls，工作表 airports/cities/countries)
//       CSV 目录 (airports.csv/cities.csv/countries.csv)
// ==========================================

use crate::importer::cell_value::{CellValue, RawRow, SourceRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{AIRPORTS_SHEET, CITIES_SHEET, COUNTRIES_SHEET};
use crate::importer::reference_importer_trait::{ReferenceFileParser, ReferenceSheets};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// 必需的数据集（按名称精确匹配）
pub const REQUIRED_SHEETS: [&str; 3] = [AIRPORTS_SHEET, CITIES_SHEET, COUNTRIES_SHEET];

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ReferenceFileParser for ExcelParser {
    fn parse_reference_sheets(&self, source_path: &Path) -> ImportResult<ReferenceSheets> {
        // 检查文件存在
        if !source_path.exists() {
            return Err(ImportError::FileNotFound(source_path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(source_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(source_path)?;

        // 三个工作表必须全部存在，再开始读取
        let sheet_names = workbook.sheet_names();
        let missing: Vec<String> = REQUIRED_SHEETS
            .iter()
            .filter(|required| !sheet_names.iter().any(|name| name.as_str() == **required))
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::SheetMissing {
                missing,
                source_path: source_path.display().to_string(),
            });
        }

        let mut read_sheet = |name: &str| -> ImportResult<Vec<SourceRow>> {
            let range = workbook.worksheet_range(name)?;
            let rows = range_to_rows(&range);
            debug!(sheet = name, rows = rows.len(), "工作表解析完成");
            Ok(rows)
        };

        Ok(ReferenceSheets {
            countries: read_sheet(COUNTRIES_SHEET)?,
            cities: read_sheet(CITIES_SHEET)?,
            airports: read_sheet(AIRPORTS_SHEET)?,
        })
    }
}

/// 首行为表头，其余行按列名组装；完全空白的行跳过
///
/// 行号按工作表实际行计算（Range 可能不从 A1 开始）
fn range_to_rows(range: &Range<Data>) -> Vec<SourceRow> {
    let header_row_number = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for (idx, data_row) in rows.enumerate() {
        let mut row_map = RawRow::new();
        for (col_idx, cell) in data_row.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row_map.insert(header.clone(), CellValue::from(cell));
            }
        }

        if row_map.values().all(|v| *v == CellValue::Empty) {
            continue;
        }
        records.push(SourceRow {
            row_number: header_row_number + idx + 1,
            cells: row_map,
        });
    }
    records
}

// ==========================================
// CSV 目录 Parser 实现
// ==========================================
pub struct CsvParser;

impl ReferenceFileParser for CsvParser {
    fn parse_reference_sheets(&self, source_path: &Path) -> ImportResult<ReferenceSheets> {
        if !source_path.exists() {
            return Err(ImportError::FileNotFound(source_path.display().to_string()));
        }
        if !source_path.is_dir() {
            return Err(ImportError::UnsupportedFormat(extension_of(source_path)));
        }

        let missing: Vec<String> = REQUIRED_SHEETS
            .iter()
            .filter(|name| !source_path.join(format!("{}.csv", name)).is_file())
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::SheetMissing {
                missing,
                source_path: source_path.display().to_string(),
            });
        }

        let read_file = |name: &str| -> ImportResult<Vec<SourceRow>> {
            let rows = parse_csv_file(&source_path.join(format!("{}.csv", name)))?;
            debug!(sheet = name, rows = rows.len(), "CSV 文件解析完成");
            Ok(rows)
        };

        Ok(ReferenceSheets {
            countries: read_file(COUNTRIES_SHEET)?,
            cities: read_file(CITIES_SHEET)?,
            airports: read_file(AIRPORTS_SHEET)?,
        })
    }
}

fn parse_csv_file(path: &Path) -> ImportResult<Vec<SourceRow>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // 行号取自读取位置，空行与多行字段不会造成偏移
        let row_number = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 2);
        let mut row_map = RawRow::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row_map.insert(header.clone(), CellValue::from_csv_field(value));
            }
        }

        if row_map.values().all(|v| match v {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }) {
            continue;
        }
        records.push(SourceRow {
            row_number,
            cells: row_map,
        });
    }

    Ok(records)
}

// ==========================================
// 通用解析器（目录 → CSV，.xlsx/.xls → Excel）
// ==========================================
pub struct UniversalFileParser;

impl ReferenceFileParser for UniversalFileParser {
    fn parse_reference_sheets(&self, source_path: &Path) -> ImportResult<ReferenceSheets> {
        if source_path.is_dir() {
            return CsvParser.parse_reference_sheets(source_path);
        }

        match extension_of(source_path).as_str() {
            "xlsx" | "xls" => ExcelParser.parse_reference_sheets(source_path),
            _ if !source_path.exists() => {
                Err(ImportError::FileNotFound(source_path.display().to_string()))
            }
            ext => Err(ImportError::UnsupportedFormat(ext.to_string())),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
