// ==========================================
// 机场查询服务 - 输入校验
// ==========================================
// 规则: IATA 三字码必须恰好为 3 个 ASCII 大写字母（^[A-Z]{3}$）
// ==========================================

use crate::api::error::{ApiError, ApiResult};

pub const IATA_CODE_LEN: usize = 3;

/// 是否为合法 IATA 三字码
pub fn is_valid_iata_code(code: &str) -> bool {
    code.len() == IATA_CODE_LEN && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// 校验 IATA 三字码，不合法时返回 InvalidIataCode
pub fn validate_iata_code(code: &str) -> ApiResult<()> {
    if is_valid_iata_code(code) {
        Ok(())
    } else {
        Err(ApiError::InvalidIataCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        for code in ["DEL", "JFK", "AAA", "ZZZ"] {
            assert!(is_valid_iata_code(code), "{} should be valid", code);
        }
    }

    #[test]
    fn test_invalid_codes() {
        for code in ["", "xyz", "Del", "DE", "DELH", "D3L", "DE-", " DE", "ÄBC", "ＤＥＬ"] {
            assert!(!is_valid_iata_code(code), "{:?} should be invalid", code);
            assert!(validate_iata_code(code).is_err());
        }
    }
}
