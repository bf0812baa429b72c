//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`password`]: 비밀번호 해싱/검증 (Argon2id)
//! - [`TokenCodec`]: Access Token 발급, 무상태 파싱, 사용자 결합 검증
//! - [`AuthGate`]: 요청 단위 인가 (strict / lax)
//! - [`CurrentUser`], [`AdminUser`]: Axum 추출기

pub mod gate;
mod jwt;
mod middleware;
pub mod password;

pub use gate::{AuthGate, PrincipalSource};
pub use jwt::{bind_claims, Claims, SigningError, TokenCodec, TokenError, BEARER_PREFIX};
pub use middleware::{authorization, AdminUser, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
