// ==========================================
// 机场查询服务 - 字段映射器实现
// ==========================================
// 职责: 已转换行（列名 → CellValue）→ 领域实体
// 说明: 列名与存储字段同名；缺失的可选列映射为 None
// ==========================================

use crate::domain::{Airport, City, Country};
use crate::importer::cell_value::{CellValue, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::reference_importer_trait::FieldMapper as FieldMapperTrait;
use chrono::{DateTime, Utc};

pub const COUNTRIES_SHEET: &str = "countries";
pub const CITIES_SHEET: &str = "cities";
pub const AIRPORTS_SHEET: &str = "airports";

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_country(&self, row: &RawRow, row_number: usize) -> ImportResult<Country> {
        Ok(Country {
            id: self.require_id(row, COUNTRIES_SHEET, row_number)?,
            name: self.get_text(row, "name").unwrap_or_default(),
            alt_name: self.get_text(row, "alt_name"),
            country_code_two: self.get_text(row, "country_code_two").unwrap_or_default(),
            country_code_three: self.get_text(row, "country_code_three").unwrap_or_default(),
            flag_app: self.get_text(row, "flag_app"),
            country_flag: self.get_text(row, "country_flag"),
            mobile_code: self.get_i64(row, "mobile_code"),
            continent_id: self.get_i64(row, "continent_id"),
        })
    }

    fn map_city(&self, row: &RawRow, row_number: usize) -> ImportResult<City> {
        Ok(City {
            id: self.require_id(row, CITIES_SHEET, row_number)?,
            name: self.get_text(row, "name").unwrap_or_default(),
            country_id: self.get_i64(row, "country_id"),
            is_active: self.get_bool(row, "is_active"),
            lat: self.get_f64(row, "lat"),
            long: self.get_f64(row, "long"),
        })
    }

    fn map_airport(
        &self,
        row: &RawRow,
        row_number: usize,
        imported_at: DateTime<Utc>,
    ) -> ImportResult<Airport> {
        Ok(Airport {
            id: self.require_id(row, AIRPORTS_SHEET, row_number)?,
            icao_code: self.get_text(row, "icao_code").unwrap_or_default(),
            iata_code: self.get_text(row, "iata_code"),
            name: self.get_text(row, "name").unwrap_or_default(),
            airport_type: self.get_text(row, "type").unwrap_or_default(),
            city_id: self.get_i64(row, "city_id"),
            country_id: self.get_i64(row, "country_id"),
            continent_id: self.get_i64(row, "continent_id"),
            website_url: self.get_text(row, "website_url"),
            wikipedia_link: self.get_text(row, "wikipedia_link"),
            created_at: self.get_datetime(row, "created_at", imported_at),
            updated_at: self.get_datetime(row, "updated_at", imported_at),
            latitude_deg: self.get_f64(row, "latitude_deg"),
            longitude_deg: self.get_f64(row, "longitude_deg"),
            elevation_ft: self.get_i64(row, "elevation_ft"),
        })
    }
}

impl FieldMapper {
    /// 业务主键（upsert 键），缺失或 NaN 时报错
    fn require_id(&self, row: &RawRow, sheet: &str, row_number: usize) -> ImportResult<i64> {
        self.get_i64(row, "id")
            .ok_or_else(|| ImportError::MissingBusinessId {
                sheet: sheet.to_string(),
                row: row_number,
            })
    }

    /// 文本字段，空串视为 None
    fn get_text(&self, row: &RawRow, key: &str) -> Option<String> {
        row.get(key)
            .and_then(CellValue::to_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// 整数字段（小数四舍五入）；未经转换的列（如 city_id）也接受数字文本
    fn get_i64(&self, row: &RawRow, key: &str) -> Option<i64> {
        match row.get(key)? {
            CellValue::Number(n) if n.is_finite() => Some(n.round() as i64),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .map(|n| n.round() as i64)
                })
            }
            _ => None,
        }
    }

    fn get_f64(&self, row: &RawRow, key: &str) -> Option<f64> {
        match row.get(key)? {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    fn get_bool(&self, row: &RawRow, key: &str) -> bool {
        matches!(row.get(key), Some(CellValue::Bool(true)))
    }

    /// 日期字段；列缺失时取导入时间，无法解析时为 None
    fn get_datetime(
        &self,
        row: &RawRow,
        key: &str,
        imported_at: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match row.get(key) {
            None => Some(imported_at),
            Some(CellValue::DateTime(dt)) => Some(*dt),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(pairs: &[(&str, CellValue)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn imported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_map_country() {
        let r = row(&[
            ("id", CellValue::Number(1.0)),
            ("name", text("India")),
            ("country_code_two", text("IN")),
            ("country_code_three", text("IND")),
            ("mobile_code", CellValue::Number(91.0)),
            ("continent_id", CellValue::Number(1.0)),
            ("alt_name", CellValue::Empty),
        ]);

        let country = FieldMapper.map_country(&r, 2).unwrap();
        assert_eq!(country.id, 1);
        assert_eq!(country.name, "India");
        assert_eq!(country.country_code_three, "IND");
        assert_eq!(country.mobile_code, Some(91));
        assert_eq!(country.alt_name, None);
        assert_eq!(country.flag_app, None);
    }

    #[test]
    fn test_map_city() {
        let r = row(&[
            ("id", CellValue::Number(10.0)),
            ("name", text("New Delhi")),
            ("country_id", CellValue::Number(1.0)),
            ("is_active", CellValue::Bool(true)),
            ("lat", CellValue::Number(28.61)),
            ("long", CellValue::Number(f64::NAN)),
        ]);

        let city = FieldMapper.map_city(&r, 3).unwrap();
        assert_eq!(city.id, 10);
        assert_eq!(city.country_id, Some(1));
        assert!(city.is_active);
        assert_eq!(city.lat, Some(28.61));
        assert_eq!(city.long, None);
    }

    #[test]
    fn test_map_airport() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let r = row(&[
            ("id", CellValue::Number(145.0)),
            ("icao_code", text("VIDP")),
            ("iata_code", text("DEL")),
            ("name", text("Indira Gandhi International Airport")),
            ("type", text("large_airport")),
            ("city_id", text("10")),
            ("country_id", CellValue::Number(1.0)),
            ("elevation_ft", CellValue::Empty),
            ("created_at", CellValue::DateTime(created)),
            ("updated_at", CellValue::InvalidDate("soon".to_string())),
        ]);

        let airport = FieldMapper.map_airport(&r, 4, imported_at()).unwrap();
        assert_eq!(airport.id, 145);
        assert_eq!(airport.iata_code.as_deref(), Some("DEL"));
        assert_eq!(airport.airport_type, "large_airport");
        assert_eq!(airport.city_id, Some(10));
        assert_eq!(airport.elevation_ft, None);
        assert_eq!(airport.created_at, Some(created));
        assert_eq!(airport.updated_at, None);
        assert_eq!(airport.website_url, None);
    }

    #[test]
    fn test_fractional_integers_are_rounded() {
        let r = row(&[
            ("id", CellValue::Number(9.0)),
            ("city_id", text("10.6")),
            ("elevation_ft", CellValue::Number(12.5)),
        ]);
        let airport = FieldMapper.map_airport(&r, 2, imported_at()).unwrap();
        assert_eq!(airport.city_id, Some(11));
        assert_eq!(airport.elevation_ft, Some(13));

        let r = row(&[("id", CellValue::Number(9.0)), ("elevation_ft", CellValue::Number(0.4))]);
        let airport = FieldMapper.map_airport(&r, 2, imported_at()).unwrap();
        assert_eq!(airport.elevation_ft, Some(0));
    }

    #[test]
    fn test_missing_timestamp_columns_use_import_time() {
        let r = row(&[("id", CellValue::Number(1.0)), ("iata_code", CellValue::Empty)]);

        let airport = FieldMapper.map_airport(&r, 2, imported_at()).unwrap();
        assert_eq!(airport.created_at, Some(imported_at()));
        assert_eq!(airport.updated_at, Some(imported_at()));
        assert_eq!(airport.iata_code, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let r = row(&[("name", text("Nowhere"))]);
        let err = FieldMapper.map_city(&r, 7).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingBusinessId { ref sheet, row: 7 } if sheet == "cities"
        ));

        let r = row(&[("id", CellValue::Number(f64::NAN))]);
        assert!(FieldMapper.map_country(&r, 2).is_err());
    }
}
