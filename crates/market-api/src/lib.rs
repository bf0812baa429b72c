//! 마켓플레이스 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 발급/검증 및 요청 단위 인가 게이트
//! - 이벤트 태그가 붙은 트랜잭션 실행기
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 자격 증명, 토큰, 인가 게이트
//! - [`repository`]: 저장소 핸들, SQL 쿼리, 트랜잭션 실행기
//! - [`services`]: 사용자/상품/지갑/장바구니 서비스
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{hash_password, verify_password, AuthGate, Claims, TokenCodec, TokenError};
pub use error::{ApiErrorResponse, ApiResult, ServiceError};
pub use repository::{run_in_transaction, Database};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
