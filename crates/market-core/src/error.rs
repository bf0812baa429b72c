//! 도메인 에러 타입.
//!
//! 도메인 타입 변환 및 설정 로드 과정에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 도메인 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 정의되지 않은 역할 값
    #[error("알 수 없는 역할 값: {0}")]
    UnknownRole(i16),
}

/// 설정 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 필수 환경 변수 누락
    #[error("필수 환경 변수가 설정되지 않았습니다: {0}")]
    Missing(&'static str),

    /// 환경 변수 값 형식 오류
    #[error("환경 변수 {name} 값이 올바르지 않습니다: {reason}")]
    Invalid {
        name: &'static str,
        reason: String,
    },
}
