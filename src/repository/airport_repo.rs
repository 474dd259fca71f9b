// ==========================================
// 机场查询服务 - 机场查询 Repository
// ==========================================
// 职责: 按 IATA 三字码读取机场，并解析城市/国家引用
// 说明: 两步查询（先机场，后按 id 取城市与国家）；引用悬空时为 None
// ==========================================

use crate::db::StoreHandle;
use crate::domain::{Airport, AirportWithRefs, City, Country};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::MutexGuard;
use tracing::error;

// ==========================================
// AirportLookupRepository Trait
// ==========================================
// 用途: 机场查询数据访问
// 实现者: AirportRepository（使用 rusqlite）
pub trait AirportLookupRepository: Send + Sync {
    /// 按 IATA 三字码精确匹配
    ///
    /// # 返回
    /// - Ok(Some): 机场及已解析的城市、国家
    /// - Ok(None): 无匹配记录
    /// - Err(StorageFailure/LockError): 存储不可用
    /// - Err(MalformedRecord): 记录存在但无法解码
    fn find_by_iata_code(&self, iata_code: &str) -> RepositoryResult<Option<AirportWithRefs>>;
}

const AIRPORT_COLUMNS: &str = "id, icao_code, iata_code, name, type, city_id, country_id, \
     continent_id, website_url, wikipedia_link, created_at, updated_at, \
     latitude_deg, longitude_deg, elevation_ft";

// ==========================================
// AirportRepository
// ==========================================
pub struct AirportRepository {
    conn: StoreHandle,
}

impl AirportRepository {
    /// 使用共享存储句柄创建实例
    pub fn new(conn: StoreHandle) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn find_airport(conn: &Connection, iata_code: &str) -> RepositoryResult<Option<Airport>> {
        let sql = format!("SELECT {} FROM airport WHERE iata_code = ?1", AIRPORT_COLUMNS);
        conn.query_row(&sql, params![iata_code], map_airport_row)
            .optional()
            .map_err(|e| with_entity(e, "airport"))
    }

    fn find_city(conn: &Connection, city_id: i64) -> RepositoryResult<Option<City>> {
        conn.query_row(
            "SELECT id, name, country_id, is_active, lat, long FROM city WHERE id = ?1",
            params![city_id],
            map_city_row,
        )
        .optional()
        .map_err(|e| with_entity(e, "city"))
    }

    fn find_country(conn: &Connection, country_id: i64) -> RepositoryResult<Option<Country>> {
        conn.query_row(
            r#"
            SELECT id, name, alt_name, country_code_two, country_code_three,
                   flag_app, country_flag, mobile_code, continent_id
            FROM country WHERE id = ?1
            "#,
            params![country_id],
            map_country_row,
        )
        .optional()
        .map_err(|e| with_entity(e, "country"))
    }

    fn lookup(conn: &Connection, iata_code: &str) -> RepositoryResult<Option<AirportWithRefs>> {
        let airport = match Self::find_airport(conn, iata_code)? {
            Some(airport) => airport,
            None => return Ok(None),
        };

        let city = match airport.city_id {
            Some(id) => Self::find_city(conn, id)?,
            None => None,
        };
        let country = match airport.country_id {
            Some(id) => Self::find_country(conn, id)?,
            None => None,
        };

        Ok(Some(AirportWithRefs {
            airport,
            city,
            country,
        }))
    }
}

impl AirportLookupRepository for AirportRepository {
    fn find_by_iata_code(&self, iata_code: &str) -> RepositoryResult<Option<AirportWithRefs>> {
        let conn = self.get_conn()?;
        let result = Self::lookup(&conn, iata_code);
        if let Err(e) = &result {
            error!(iata_code = %iata_code, error = %e, "机场查询失败");
        }
        result
    }
}

/// 转换 rusqlite 错误，数据异常类错误补充实体名
fn with_entity(err: rusqlite::Error, entity: &str) -> RepositoryError {
    match RepositoryError::from(err) {
        RepositoryError::MalformedRecord { message, .. } => RepositoryError::MalformedRecord {
            entity: entity.to_string(),
            message,
        },
        other => other,
    }
}

fn map_airport_row(row: &Row<'_>) -> rusqlite::Result<Airport> {
    Ok(Airport {
        id: row.get(0)?,
        icao_code: row.get(1)?,
        iata_code: row.get(2)?,
        name: row.get(3)?,
        airport_type: row.get(4)?,
        city_id: row.get(5)?,
        country_id: row.get(6)?,
        continent_id: row.get(7)?,
        website_url: row.get(8)?,
        wikipedia_link: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        latitude_deg: row.get(12)?,
        longitude_deg: row.get(13)?,
        elevation_ft: row.get(14)?,
    })
}

fn map_city_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        country_id: row.get(2)?,
        is_active: row.get(3)?,
        lat: row.get(4)?,
        long: row.get(5)?,
    })
}

fn map_country_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get(0)?,
        name: row.get(1)?,
        alt_name: row.get(2)?,
        country_code_two: row.get(3)?,
        country_code_three: row.get(4)?,
        flag_app: row.get(5)?,
        country_flag: row.get(6)?,
        mobile_code: row.get(7)?,
        continent_id: row.get(8)?,
    })
}
