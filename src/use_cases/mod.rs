// ==========================================
// 机场查询服务 - 用例模块
// ==========================================
// 职责: 定义对外查询的响应契约与失败分类
// ==========================================

pub mod airport_enrichment;

// 用例实现
pub mod impls;

// 重导出用例接口
pub use airport_enrichment::{
    AddressView, AirportEnrichmentUseCase, AirportLookupError, AirportResponse, AirportView,
    CityView, CountryView,
};
pub use impls::AirportEnrichmentUseCaseImpl;
