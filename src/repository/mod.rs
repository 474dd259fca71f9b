// ==========================================
// 机场查询服务 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod airport_repo;
pub mod error;
pub mod reference_data_repo;
pub mod reference_data_repo_impl;

// 重导出核心仓储
pub use airport_repo::{AirportLookupRepository, AirportRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use reference_data_repo::{ReferenceCounts, ReferenceDataRepository};
pub use reference_data_repo_impl::ReferenceDataRepositoryImpl;
