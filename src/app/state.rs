// ==========================================
// 机场查询服务 - 应用状态
// ==========================================
// 职责: 组装仓储 → 用例 → API，作为 HTTP 层共享状态
// ==========================================

use std::sync::Arc;

use crate::api::AirportApi;
use crate::db::StoreHandle;
use crate::repository::AirportRepository;
use crate::use_cases::AirportEnrichmentUseCaseImpl;

/// 应用状态
///
/// 所有字段均为共享句柄，克隆开销为引用计数
#[derive(Clone)]
pub struct AppState {
    /// 存储句柄（导入器与查询仓储共用）
    pub store: StoreHandle,

    /// 机场API
    pub airport_api: Arc<AirportApi>,
}

impl AppState {
    /// 基于已打开的存储句柄组装状态
    pub fn new(store: StoreHandle) -> Self {
        let airport_repo = Arc::new(AirportRepository::new(store.clone()));
        let enrichment = Arc::new(AirportEnrichmentUseCaseImpl::new(airport_repo));
        let airport_api = Arc::new(AirportApi::new(enrichment));

        Self { store, airport_api }
    }
}
