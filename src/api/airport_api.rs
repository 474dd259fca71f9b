// ==========================================
// 机场查询服务 - 机场 API
// ==========================================
// 职责: 校验三字码 → 调用补全用例 → 统一错误类型
// 状态: 接收 → 校验格式 → 查询 → {命中→组装, 不存在, 存储故障} → 响应
// ==========================================

use std::sync::Arc;
use tracing::debug;

use crate::api::error::ApiResult;
use crate::api::validator::validate_iata_code;
use crate::perf::{PerfGuard, PerfOp};
use crate::use_cases::{AirportEnrichmentUseCase, AirportResponse};

/// 机场API
pub struct AirportApi {
    enrichment: Arc<dyn AirportEnrichmentUseCase>,
}

impl AirportApi {
    pub fn new(enrichment: Arc<dyn AirportEnrichmentUseCase>) -> Self {
        Self { enrichment }
    }

    /// 按 IATA 三字码查询机场
    ///
    /// # 返回
    /// - Err(InvalidIataCode): 格式不合法，不访问存储
    /// - Err(AirportNotFound): 无匹配或非存储类查询异常
    /// - Err(StorageFailure): 存储不可用
    pub fn get_airport(&self, iata_code: &str) -> ApiResult<AirportResponse> {
        validate_iata_code(iata_code)?;

        let _perf = PerfGuard::new(PerfOp::AirportLookup);
        debug!(iata_code = %iata_code, "查询机场");
        Ok(self.enrichment.execute(iata_code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::use_cases::{AddressView, AirportLookupError, AirportView};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingUseCase {
        calls: AtomicUsize,
    }

    impl AirportEnrichmentUseCase for CountingUseCase {
        fn execute(&self, iata_code: &str) -> Result<AirportResponse, AirportLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if iata_code != "DEL" {
                return Err(AirportLookupError::NotFound {
                    iata_code: iata_code.to_string(),
                });
            }
            Ok(AirportResponse {
                airport: AirportView {
                    id: 145,
                    icao_code: "VIDP".to_string(),
                    iata_code: "DEL".to_string(),
                    name: "Indira Gandhi International Airport".to_string(),
                    airport_type: "large_airport".to_string(),
                    latitude_deg: None,
                    longitude_deg: None,
                    elevation_ft: None,
                    address: AddressView {
                        city: None,
                        country: None,
                    },
                },
            })
        }
    }

    fn api() -> (AirportApi, Arc<CountingUseCase>) {
        let uc = Arc::new(CountingUseCase {
            calls: AtomicUsize::new(0),
        });
        (AirportApi::new(uc.clone()), uc)
    }

    #[test]
    fn test_invalid_code_never_reaches_use_case() {
        let (api, uc) = api();
        for code in ["xyz", "", "DE1", "DELL"] {
            assert!(matches!(
                api.get_airport(code),
                Err(ApiError::InvalidIataCode(_))
            ));
        }
        assert_eq!(uc.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lookup_delegates_to_use_case() {
        let (api, uc) = api();
        assert_eq!(api.get_airport("DEL").unwrap().airport.id, 145);
        assert!(matches!(
            api.get_airport("ZZZ"),
            Err(ApiError::AirportNotFound { .. })
        ));
        assert_eq!(uc.calls.load(Ordering::SeqCst), 2);
    }
}
