//! 요청 DTO 공용 필드 검증 함수.
//!
//! `#[validate(custom(function = ...))]`에서 사용합니다. `Option` 필드에 붙이면
//! validator가 `Some`일 때만 내부 값 참조로 호출합니다.

use rust_decimal::Decimal;
use validator::{ValidateEmail, ValidationError};

/// 금액 컬럼 `NUMERIC(20, 2)`의 정수부 한계 (10^18).
pub const MAX_AMOUNT_EXCLUSIVE: Decimal = Decimal::from_parts(2_808_348_672, 232_830_643, 0, false, 0);

/// 금액 컬럼의 소수 자릿수.
pub const AMOUNT_SCALE: u32 = 2;

/// 금액 검증: 0 이상, 10^18 미만, 소수 둘째 자리까지.
pub(crate) fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_amount")
            .with_message("금액은 0 이상이어야 합니다".into()));
    }
    if *value >= MAX_AMOUNT_EXCLUSIVE {
        return Err(ValidationError::new("amount_too_large")
            .with_message("금액이 허용 범위를 벗어났습니다".into()));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::new("amount_scale")
            .with_message("금액은 소수 둘째 자리까지 입력할 수 있습니다".into()));
    }
    Ok(())
}

/// 공백만으로 이루어진 문자열 거부.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("값을 입력하세요".into()));
    }
    Ok(())
}

/// 부분 업데이트용 이메일 검증.
///
/// 빈 값은 "변경 없음"으로 취급되므로 통과시키고, 값이 있으면 형식을 확인합니다.
pub(crate) fn validate_email_or_blank(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("이메일 형식이 올바르지 않습니다".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_limit_matches_column() {
        assert_eq!(MAX_AMOUNT_EXCLUSIVE, Decimal::from(1_000_000_000_000_000_000i64));
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(&dec!(0)).is_ok());
        assert!(validate_amount(&dec!(12.50)).is_ok());
        assert!(validate_amount(&dec!(999999999999999999.99)).is_ok());
        assert!(validate_amount(&dec!(-0.01)).is_err());
        assert!(validate_amount(&dec!(1000000000000000000)).is_err());
        assert!(validate_amount(&Decimal::MAX).is_err());
    }

    #[test]
    fn test_amount_scale() {
        assert!(validate_amount(&dec!(1.000)).is_ok());
        assert!(validate_amount(&dec!(1.005)).is_err());
        assert!(validate_amount(&dec!(0.001)).is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Ana").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t ").is_err());
    }

    #[test]
    fn test_email_or_blank() {
        assert!(validate_email_or_blank("").is_ok());
        assert!(validate_email_or_blank("   ").is_ok());
        assert!(validate_email_or_blank("b@x.com").is_ok());
        assert!(validate_email_or_blank("nope").is_err());
    }
}
