// ==========================================
// 机场查询服务 - 参考数据写入 Repository 实现
// ==========================================
// 职责: 实现按业务主键 upsert（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::StoreHandle;
use crate::domain::{Airport, City, Country};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::reference_data_repo::{ReferenceCounts, ReferenceDataRepository};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::MutexGuard;

// ==========================================
// ReferenceDataRepositoryImpl
// ==========================================
pub struct ReferenceDataRepositoryImpl {
    conn: StoreHandle,
}

impl ReferenceDataRepositoryImpl {
    /// 使用共享存储句柄创建实例
    pub fn new(conn: StoreHandle) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn count_table(conn: &Connection, table: &str) -> RepositoryResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }
}

#[async_trait]
impl ReferenceDataRepository for ReferenceDataRepositoryImpl {
    async fn count_countries(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Self::count_table(&conn, "country")
    }

    async fn upsert_country(&self, country: Country) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO country (
                id, name, alt_name, country_code_two, country_code_three,
                flag_app, mobile_code, continent_id, country_flag
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                alt_name = excluded.alt_name,
                country_code_two = excluded.country_code_two,
                country_code_three = excluded.country_code_three,
                flag_app = excluded.flag_app,
                mobile_code = excluded.mobile_code,
                continent_id = excluded.continent_id,
                country_flag = excluded.country_flag
            "#,
            params![
                country.id,
                country.name,
                country.alt_name,
                country.country_code_two,
                country.country_code_three,
                country.flag_app,
                country.mobile_code,
                country.continent_id,
                country.country_flag,
            ],
        )?;
        Ok(())
    }

    async fn upsert_city(&self, city: City) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO city (id, name, country_id, is_active, lat, long)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                country_id = excluded.country_id,
                is_active = excluded.is_active,
                lat = excluded.lat,
                long = excluded.long
            "#,
            params![
                city.id,
                city.name,
                city.country_id,
                city.is_active,
                city.lat,
                city.long,
            ],
        )?;
        Ok(())
    }

    async fn upsert_airport(&self, airport: Airport) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO airport (
                id, icao_code, iata_code, name, type, city_id, country_id,
                continent_id, website_url, wikipedia_link, created_at, updated_at,
                latitude_deg, longitude_deg, elevation_ft
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ON CONFLICT(id) DO UPDATE SET
                icao_code = excluded.icao_code,
                iata_code = excluded.iata_code,
                name = excluded.name,
                type = excluded.type,
                city_id = excluded.city_id,
                country_id = excluded.country_id,
                continent_id = excluded.continent_id,
                website_url = excluded.website_url,
                wikipedia_link = excluded.wikipedia_link,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                latitude_deg = excluded.latitude_deg,
                longitude_deg = excluded.longitude_deg,
                elevation_ft = excluded.elevation_ft
            "#,
            params![
                airport.id,
                airport.icao_code,
                airport.iata_code,
                airport.name,
                airport.airport_type,
                airport.city_id,
                airport.country_id,
                airport.continent_id,
                airport.website_url,
                airport.wikipedia_link,
                airport.created_at,
                airport.updated_at,
                airport.latitude_deg,
                airport.longitude_deg,
                airport.elevation_ft,
            ],
        )?;
        Ok(())
    }

    async fn counts(&self) -> RepositoryResult<ReferenceCounts> {
        let conn = self.get_conn()?;
        Ok(ReferenceCounts {
            countries: Self::count_table(&conn, "country")?,
            cities: Self::count_table(&conn, "city")?,
            airports: Self::count_table(&conn, "airport")?,
        })
    }
}
