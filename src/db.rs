// ==========================================
// 机场查询服务 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有连接的 PRAGMA 行为（busy_timeout / WAL / synchronous）
// - 统一建表（country / city / airport），幂等
// - 存储句柄显式构造后注入各 Repository，不使用全局连接
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 内存数据库路径
pub const IN_MEMORY_PATH: &str = ":memory:";

/// 共享存储句柄（所有 Repository 共用同一连接）
pub type StoreHandle = Arc<Mutex<Connection>>;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - busy_timeout 需要“每个连接”单独配置
/// - 内存库不支持 WAL，跳过 journal_mode 设置
pub fn configure_sqlite_connection(conn: &Connection, db_path: &str) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;

    if db_path != IN_MEMORY_PATH {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn, db_path)?;
    Ok(conn)
}

/// 打开存储：连接 + 建表 + SQL 性能追踪，返回可注入的共享句柄
pub fn open_store(db_path: &str) -> rusqlite::Result<StoreHandle> {
    let mut conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn, crate::perf::PerfSettings::from_env());

    match read_schema_version(&conn)? {
        Some(v) if v != CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "schema_version 与当前代码不一致（不做自动迁移）"
            );
        }
        _ => {}
    }

    Ok(Arc::new(Mutex::new(conn)))
}

/// 初始化参考数据表（幂等）
///
/// 说明：
/// - id 为业务主键（INTEGER PRIMARY KEY），upsert 以其为冲突键
/// - city_id / country_id 不声明 FOREIGN KEY：引用为软引用，悬空时查询返回 NULL
/// - iata_code 唯一索引；空三字码存为 NULL，不参与唯一性比较
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS country (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            alt_name TEXT,
            country_code_two TEXT NOT NULL,
            country_code_three TEXT NOT NULL,
            flag_app TEXT,
            mobile_code INTEGER,
            continent_id INTEGER,
            country_flag TEXT
        );

        CREATE TABLE IF NOT EXISTS city (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            country_id INTEGER,
            is_active INTEGER NOT NULL DEFAULT 0,
            lat REAL,
            long REAL
        );

        CREATE TABLE IF NOT EXISTS airport (
            id INTEGER PRIMARY KEY,
            icao_code TEXT NOT NULL,
            iata_code TEXT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            city_id INTEGER,
            country_id INTEGER,
            continent_id INTEGER,
            website_url TEXT,
            wikipedia_link TEXT,
            created_at TEXT,
            updated_at TEXT,
            latitude_deg REAL,
            longitude_deg REAL,
            elevation_ft INTEGER
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_airport_iata_code ON airport(iata_code);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_read_schema_version_without_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }

    #[test]
    fn test_iata_unique_index_allows_multiple_nulls() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        for id in 1..=2 {
            conn.execute(
                "INSERT INTO airport (id, icao_code, iata_code, name, type) VALUES (?1, 'XXXX', NULL, 'n', 'small_airport')",
                [id],
            )
            .unwrap();
        }

        conn.execute(
            "INSERT INTO airport (id, icao_code, iata_code, name, type) VALUES (3, 'VIDP', 'DEL', 'n', 'large_airport')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO airport (id, icao_code, iata_code, name, type) VALUES (4, 'VIDX', 'DEL', 'n', 'large_airport')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn test_open_store_in_memory() {
        let store = open_store(IN_MEMORY_PATH).unwrap();
        let conn = store.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM country", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
