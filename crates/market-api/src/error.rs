//! 서비스 에러와 통합 API 에러 응답 타입.
//!
//! 서비스 계층은 [`ServiceError`]를 반환하고, 핸들러는 이를 그대로 `?`로
//! 전파합니다. HTTP 응답 변환은 [`IntoResponse`] 구현 한 곳에서만 일어납니다.
//!
//! 401/403 응답 본문은 항상 일반 메시지이며, 구체적인 원인은 로그에만 남습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use utoipa::ToSchema;
use validator::ValidationErrors;

use market_core::TransactionEvent;

use crate::auth::{PasswordError, SigningError};

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "상품을 찾을 수 없습니다: 42",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHORIZED", "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 서비스 계층 에러.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// 인증 실패 (토큰 없음/위조/만료/사용자 불일치, 로그인 실패)
    #[error("인증되지 않은 요청")]
    Unauthenticated,

    /// 인증은 되었으나 권한 부족
    #[error("권한 없음")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    /// 유일성 제약 위반
    #[error("{0}")]
    Conflict(String),

    /// 저장소 핸들이 초기화되지 않았거나 연결 불가
    #[error("저장소를 사용할 수 없습니다")]
    ServiceUnavailable,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// 유일성 위반 외의 저장소 실패
    #[error("데이터베이스 오류: {0}")]
    Database(sqlx::Error),

    /// 트랜잭션 단위 실패 (롤백 완료)
    #[error("{event} 트랜잭션 실패: {source}")]
    Transaction {
        event: TransactionEvent,
        #[source]
        source: Box<ServiceError>,
    },
}

impl ServiceError {
    /// `NotFound` 생성 헬퍼.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{}을(를) 찾을 수 없습니다: {}", entity, id))
    }

    /// 트랜잭션 래퍼를 모두 벗긴 근본 에러.
    pub fn root(&self) -> &ServiceError {
        match self {
            Self::Transaction { source, .. } => source.root(),
            other => other,
        }
    }

    /// 소유권을 가진 근본 에러로 변환.
    pub fn into_root(self) -> ServiceError {
        match self {
            Self::Transaction { source, .. } => source.into_root(),
            other => other,
        }
    }

    /// HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self.root() {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable | Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Signing(_) | Self::Password(_) | Self::Transaction { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 응답 본문.
    ///
    /// 트랜잭션 실패는 `details.transaction`에 이벤트 태그를 담습니다 (401/403 제외).
    fn body(&self) -> ApiErrorResponse {
        let body = self.root_body();
        match self {
            Self::Transaction { event, .. }
                if !matches!(self.root(), Self::Unauthenticated | Self::Forbidden) =>
            {
                ApiErrorResponse::with_details(
                    body.code,
                    body.message,
                    serde_json::json!({ "transaction": event.as_str() }),
                )
            }
            _ => body,
        }
    }

    fn root_body(&self) -> ApiErrorResponse {
        match self.root() {
            Self::Unauthenticated => ApiErrorResponse::new("UNAUTHORIZED", "Unauthorized"),
            Self::Forbidden => ApiErrorResponse::new("FORBIDDEN", "Forbidden"),
            Self::NotFound(msg) => ApiErrorResponse::new("NOT_FOUND", msg.as_str()),
            Self::Conflict(msg) => ApiErrorResponse::new("CONFLICT", msg.as_str()),
            Self::Validation(msg) => ApiErrorResponse::new("VALIDATION_ERROR", msg.as_str()),
            Self::ServiceUnavailable => {
                ApiErrorResponse::new("SERVICE_UNAVAILABLE", "저장소를 사용할 수 없습니다")
            }
            Self::Database(_) => {
                ApiErrorResponse::new("DB_ERROR", "데이터베이스 요청을 처리하지 못했습니다")
            }
            Self::Signing(_) | Self::Password(_) | Self::Transaction { .. } => {
                ApiErrorResponse::new("INTERNAL_ERROR", "요청을 처리하지 못했습니다")
            }
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict("이미 사용 중인 값입니다".to_string())
            }
            sqlx::Error::Database(db)
                if db.code().is_some_and(|c| is_value_out_of_range(&c)) =>
            {
                warn!(error = %e, "Value rejected by column constraints");
                Self::Validation("값이 허용 범위를 벗어났습니다".to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                warn!(error = %e, "Connection pool unavailable");
                Self::ServiceUnavailable
            }
            _ => Self::Database(e),
        }
    }
}

/// 컬럼 범위/길이 초과 SQLSTATE
/// (22001 `string_data_right_truncation`, 22003 `numeric_value_out_of_range`).
fn is_value_out_of_range(code: &str) -> bool {
    matches!(code, "22001" | "22003")
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(validation_message(&errors))
    }
}

/// validator 에러를 사람이 읽을 수 있는 한 줄 메시지로 합칩니다.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
            })
        })
        .collect();

    messages.sort();
    if messages.is_empty() {
        "유효하지 않은 요청입니다".to_string()
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, status = %status, "Request failed");
        }

        (status, Json(self.body())).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());

        let json = serde_json::to_string(&error).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_out_of_range_sqlstates() {
        assert!(is_value_out_of_range("22003"));
        assert!(is_value_out_of_range("22001"));
        assert!(!is_value_out_of_range("23505"));
        assert!(!is_value_out_of_range("40001"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServiceError::not_found("상품", 1).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_transaction_wrapper_is_classified_by_root() {
        let err = ServiceError::Transaction {
            event: TransactionEvent::Update,
            source: Box::new(ServiceError::Conflict("email".into())),
        };

        assert!(matches!(err.root(), ServiceError::Conflict(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().starts_with("UPDATE"));
        assert!(matches!(err.into_root(), ServiceError::Conflict(_)));
    }

    #[test]
    fn test_transaction_body_carries_event() {
        let err = ServiceError::Transaction {
            event: TransactionEvent::Delete,
            source: Box::new(ServiceError::not_found("지갑", 3)),
        };
        let body = err.body();
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(
            body.details,
            Some(serde_json::json!({ "transaction": "DELETE" }))
        );

        let hidden = ServiceError::Transaction {
            event: TransactionEvent::Update,
            source: Box::new(ServiceError::Forbidden),
        };
        assert!(hidden.body().details.is_none());
    }

    #[test]
    fn test_auth_bodies_are_generic() {
        assert_eq!(ServiceError::Unauthenticated.body().message, "Unauthorized");
        assert_eq!(ServiceError::Forbidden.body().message, "Forbidden");
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Database(_)));

        let err = ServiceError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, ServiceError::ServiceUnavailable));
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "이름을 입력하세요"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_use_field_messages() {
        let errors = Sample {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        match ServiceError::from(errors) {
            ServiceError::Validation(msg) => assert_eq!(msg, "이름을 입력하세요"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
