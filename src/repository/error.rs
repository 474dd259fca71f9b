// ==========================================
// 机场查询服务 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 存储故障（不可用）/ 数据异常（记录损坏）/ 约束冲突
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 存储错误 =====
    #[error("数据库访问失败: {0}")]
    StorageFailure(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    // ===== 数据质量错误 =====
    #[error("记录数据异常 ({entity}): {message}")]
    MalformedRecord { entity: String, message: String },
}

impl RepositoryError {
    /// 是否为存储不可用类错误（对外映射为 500）
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            RepositoryError::StorageFailure(_) | RepositoryError::LockError(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::FromSqlConversionFailure(_, _, _)
            | rusqlite::Error::InvalidColumnType(_, _, _)
            | rusqlite::Error::IntegralValueOutOfRange(_, _) => RepositoryError::MalformedRecord {
                entity: "unknown".to_string(),
                message: err.to_string(),
            },
            _ => RepositoryError::StorageFailure(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (code TEXT UNIQUE); INSERT INTO t VALUES ('DEL');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES ('DEL')", [])
            .unwrap_err();

        let repo_err = RepositoryError::from(err);
        assert!(matches!(repo_err, RepositoryError::UniqueConstraintViolation(_)));
        assert!(!repo_err.is_storage_failure());
    }

    #[test]
    fn test_type_mismatch_is_malformed_record() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT 'abc'", [], |row| row.get::<_, i64>(0))
            .unwrap_err();

        let repo_err = RepositoryError::from(err);
        assert!(matches!(repo_err, RepositoryError::MalformedRecord { .. }));
        assert!(!repo_err.is_storage_failure());
    }

    #[test]
    fn test_missing_table_is_storage_failure() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT COUNT(*) FROM country", [], |row| row.get::<_, i64>(0))
            .unwrap_err();

        assert!(RepositoryError::from(err).is_storage_failure());
    }
}
