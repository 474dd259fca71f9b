// ==========================================
// 机场查询服务 - 用例实现模块
// ==========================================

pub mod airport_enrichment_impl;

// 重导出用例实现
pub use airport_enrichment_impl::AirportEnrichmentUseCaseImpl;
