//! # Market Core
//!
//! 마켓플레이스 백엔드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자(Principal) 및 역할(Role) 정의
//! - 상품, 지갑, 장바구니 엔티티와 부분 업데이트 페이로드
//! - 트랜잭션 이벤트 태그
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
