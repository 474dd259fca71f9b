// ==========================================
// 机场查询服务 - 机场信息补全用例实现
// ==========================================
// 职责: 仓储结果 → 响应契约；仓储错误 → 用例错误
// 规则: 仅存储故障保持为 StorageFailure，其余异常归为 LookupFault
// ==========================================

use crate::domain::{AirportWithRefs, City, Country};
use crate::repository::{AirportLookupRepository, RepositoryError};
use crate::use_cases::airport_enrichment::{
    AddressView, AirportEnrichmentUseCase, AirportLookupError, AirportResponse, AirportView,
    CityView, CountryView,
};
use std::sync::Arc;

/// 机场信息补全用例实现
pub struct AirportEnrichmentUseCaseImpl {
    /// 机场查询仓储
    repo: Arc<dyn AirportLookupRepository>,
}

impl AirportEnrichmentUseCaseImpl {
    pub fn new(repo: Arc<dyn AirportLookupRepository>) -> Self {
        Self { repo }
    }
}

impl AirportEnrichmentUseCase for AirportEnrichmentUseCaseImpl {
    fn execute(&self, iata_code: &str) -> Result<AirportResponse, AirportLookupError> {
        match self.repo.find_by_iata_code(iata_code) {
            Ok(Some(found)) => Ok(shape_response(found, iata_code)),
            Ok(None) => Err(AirportLookupError::NotFound {
                iata_code: iata_code.to_string(),
            }),
            Err(e) => Err(classify_repository_error(e, iata_code)),
        }
    }
}

fn classify_repository_error(err: RepositoryError, iata_code: &str) -> AirportLookupError {
    if err.is_storage_failure() {
        AirportLookupError::StorageFailure(err.to_string())
    } else {
        AirportLookupError::LookupFault {
            iata_code: iata_code.to_string(),
            message: err.to_string(),
        }
    }
}

fn shape_response(found: AirportWithRefs, iata_code: &str) -> AirportResponse {
    let AirportWithRefs {
        airport,
        city,
        country,
    } = found;

    AirportResponse {
        airport: AirportView {
            id: airport.id,
            icao_code: airport.icao_code,
            iata_code: airport.iata_code.unwrap_or_else(|| iata_code.to_string()),
            name: airport.name,
            airport_type: airport.airport_type,
            latitude_deg: airport.latitude_deg,
            longitude_deg: airport.longitude_deg,
            elevation_ft: airport.elevation_ft.filter(|ft| *ft != 0),
            address: AddressView {
                city: city.map(city_view),
                country: country.map(country_view),
            },
        },
    }
}

fn city_view(city: City) -> CityView {
    CityView {
        id: city.id,
        name: city.name,
        country_id: city.country_id,
        is_active: city.is_active,
        lat: city.lat,
        long: city.long,
    }
}

fn country_view(country: Country) -> CountryView {
    CountryView {
        id: country.id,
        name: country.name,
        country_code_two: country.country_code_two,
        country_code_three: country.country_code_three,
        mobile_code: country.mobile_code,
        continent_id: country.continent_id,
    }
}
