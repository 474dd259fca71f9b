// ==========================================
// 机场查询服务 - 领域模型层
// ==========================================
// 职责: 定义参考数据实体（国家/城市/机场）
// 红线: 不含数据访问逻辑,不含导入逻辑
// ==========================================

pub mod airport;
pub mod city;
pub mod country;
pub mod import_summary;

// 重导出核心类型
pub use airport::{Airport, AirportWithRefs};
pub use city::City;
pub use country::Country;
pub use import_summary::{ImportOutcome, ImportSummary};
