// ==========================================
// 机场查询服务 - 参考数据写入 Repository Trait
// ==========================================
// 职责: 定义导入所需的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含导入规则，只做按业务主键的 upsert 与计数
// ==========================================

use crate::domain::{Airport, City, Country};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 各参考数据表的记录数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCounts {
    pub countries: i64,
    pub cities: i64,
    pub airports: i64,
}

// ==========================================
// ReferenceDataRepository Trait
// ==========================================
// 用途: 参考数据导入相关数据访问
// 实现者: ReferenceDataRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ReferenceDataRepository: Send + Sync {
    /// country 表记录数（导入门控依据）
    async fn count_countries(&self) -> RepositoryResult<i64>;

    /// 按 id upsert 国家（不存在则插入，存在则全量覆盖）
    async fn upsert_country(&self, country: Country) -> RepositoryResult<()>;

    /// 按 id upsert 城市
    async fn upsert_city(&self, city: City) -> RepositoryResult<()>;

    /// 按 id upsert 机场
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 另一条记录已占用相同 iata_code
    async fn upsert_airport(&self, airport: Airport) -> RepositoryResult<()>;

    /// 三张表的记录数
    async fn counts(&self) -> RepositoryResult<ReferenceCounts>;
}
