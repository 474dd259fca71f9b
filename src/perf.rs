// ==========================================
// 机场查询服务 - 性能追踪
// ==========================================
// 职责: 机场查询与参考数据导入各阶段的耗时、SQL 语句数、慢 SQL 数
// 开关:
// - `AIRPORT_API_PERF_SQL`   语句统计开关（未设置时 Debug 开启、Release 关闭）
// - `AIRPORT_API_SLOW_SQL_MS` 慢 SQL 阈值（毫秒，0 表示不记录）
// 计数口径: 进程只持有一个 SQLite 连接，计数为连接级累计值的差；
//           并发查询时，单次查询的计数包含同一时段其他请求的语句
// ==========================================

use rusqlite::Connection;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const PERF_SQL_ENV: &str = "AIRPORT_API_PERF_SQL";
pub const SLOW_SQL_MS_ENV: &str = "AIRPORT_API_SLOW_SQL_MS";

const SLOW_SQL_LOG_CHARS: usize = 240;

static SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
static SQL_STATEMENTS: AtomicU64 = AtomicU64::new(0);
static SLOW_SQL_STATEMENTS: AtomicU64 = AtomicU64::new(0);

// ==========================================
// PerfOp - 被追踪的操作
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfOp {
    /// 单次 IATA 三字码查询（含关联解析）
    AirportLookup,
    /// 导入源解析
    ImportParse,
    /// 一个数据集的写入（countries / cities / airports）
    ImportStage(&'static str),
}

impl fmt::Display for PerfOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfOp::AirportLookup => write!(f, "airport.lookup"),
            PerfOp::ImportParse => write!(f, "import.parse"),
            PerfOp::ImportStage(stage) => write!(f, "import.{}", stage),
        }
    }
}

// ==========================================
// PerfSettings - 统计开关与慢 SQL 阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSettings {
    pub sql_enabled: bool,
    pub slow_sql_ms: u64,
}

impl PerfSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（测试中避免修改进程环境变量）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let sql_enabled = match lookup(PERF_SQL_ENV) {
            Some(v) => is_true(&v),
            None => cfg!(debug_assertions),
        };
        let slow_sql_ms = lookup(SLOW_SQL_MS_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });

        Self {
            sql_enabled,
            slow_sql_ms,
        }
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 在存储连接上安装语句统计
pub fn install_sqlite_tracing(conn: &mut Connection, settings: PerfSettings) {
    SQL_ENABLED.store(settings.sql_enabled, Ordering::Relaxed);
    SLOW_SQL_THRESHOLD_MS.store(settings.slow_sql_ms, Ordering::Relaxed);

    if settings.sql_enabled {
        conn.trace(Some(count_statement));
        conn.profile(Some(check_slow_statement));
    } else {
        conn.trace(None);
        conn.profile(None);
    }
}

fn count_statement(_sql: &str) {
    SQL_STATEMENTS.fetch_add(1, Ordering::Relaxed);
}

fn check_slow_statement(sql: &str, duration: Duration) {
    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold == 0 || ms < threshold {
        return;
    }

    SLOW_SQL_STATEMENTS.fetch_add(1, Ordering::Relaxed);
    let one_line = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    let shown: String = one_line.chars().take(SLOW_SQL_LOG_CHARS).collect();
    tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %shown, "慢 SQL");
}

// ==========================================
// PerfReport / PerfGuard
// ==========================================

/// 一次操作的统计结果（语句统计关闭时计数为 0）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfReport {
    pub op: PerfOp,
    pub elapsed_ms: u64,
    pub sql_count: u64,
    pub slow_sql_count: u64,
}

/// 操作计时 Guard
///
/// `finish()` 取回统计结果；未调用时在 drop 时写 debug 日志
///
/// ```ignore
/// let _perf = airport_lookup_api::perf::PerfGuard::new(PerfOp::AirportLookup);
/// ```
pub struct PerfGuard {
    op: PerfOp,
    start: Instant,
    sql_start: u64,
    slow_sql_start: u64,
    reported: bool,
}

impl PerfGuard {
    pub fn new(op: PerfOp) -> Self {
        Self {
            op,
            start: Instant::now(),
            sql_start: SQL_STATEMENTS.load(Ordering::Relaxed),
            slow_sql_start: SLOW_SQL_STATEMENTS.load(Ordering::Relaxed),
            reported: false,
        }
    }

    pub fn finish(mut self) -> PerfReport {
        let report = self.report();
        self.log(&report);
        self.reported = true;
        report
    }

    fn report(&self) -> PerfReport {
        let sql_count = if SQL_ENABLED.load(Ordering::Relaxed) {
            SQL_STATEMENTS
                .load(Ordering::Relaxed)
                .saturating_sub(self.sql_start)
        } else {
            0
        };
        PerfReport {
            op: self.op,
            elapsed_ms: self.start.elapsed().as_millis() as u64,
            sql_count,
            slow_sql_count: SLOW_SQL_STATEMENTS
                .load(Ordering::Relaxed)
                .saturating_sub(self.slow_sql_start),
        }
    }

    fn log(&self, report: &PerfReport) {
        tracing::debug!(
            target: "perf",
            op = %report.op,
            elapsed_ms = report.elapsed_ms,
            sql_count = report.sql_count,
            slow_sql_count = report.slow_sql_count,
            "操作完成"
        );
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if !self.reported {
            let report = self.report();
            self.log(&report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_names() {
        assert_eq!(PerfOp::AirportLookup.to_string(), "airport.lookup");
        assert_eq!(PerfOp::ImportParse.to_string(), "import.parse");
        assert_eq!(PerfOp::ImportStage("cities").to_string(), "import.cities");
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = PerfSettings::from_lookup(|key| match key {
            PERF_SQL_ENV => Some(" YES ".to_string()),
            SLOW_SQL_MS_ENV => Some("75".to_string()),
            _ => None,
        });
        assert_eq!(
            settings,
            PerfSettings {
                sql_enabled: true,
                slow_sql_ms: 75
            }
        );

        let settings = PerfSettings::from_lookup(|key| match key {
            PERF_SQL_ENV => Some("0".to_string()),
            SLOW_SQL_MS_ENV => Some("soon".to_string()),
            _ => None,
        });
        assert!(!settings.sql_enabled);
        assert!(settings.slow_sql_ms > 0);
    }

    #[test]
    fn test_guard_counts_statements_on_store_connection() {
        let mut conn = Connection::open_in_memory().unwrap();
        install_sqlite_tracing(
            &mut conn,
            PerfSettings {
                sql_enabled: true,
                slow_sql_ms: 0,
            },
        );
        conn.execute_batch("CREATE TABLE airport (id INTEGER PRIMARY KEY, iata_code TEXT)")
            .unwrap();

        let guard = PerfGuard::new(PerfOp::ImportStage("airports"));
        conn.execute("INSERT INTO airport VALUES (145, 'DEL')", []).unwrap();
        conn.execute("INSERT INTO airport VALUES (146, 'BOM')", []).unwrap();
        let report = guard.finish();

        assert_eq!(report.op, PerfOp::ImportStage("airports"));
        // 计数为连接级累计差，其他并行测试的语句也可能计入
        assert!(report.sql_count >= 2);
    }
}
