//! 인가 게이트.
//!
//! 요청마다 토큰을 파싱하고, 토큰의 `id`로 사용자를 다시 조회한 뒤
//! 역할과 사용자 결합 검증을 순서대로 수행합니다.
//!
//! ```text
//! NoToken → ParsedClaims → PrincipalFetched → RoleChecked → Bound
//!    └──────────┴────────────────┴──────────────┴──→ Rejected
//! ```
//!
//! 두 가지 모드를 제공합니다.
//! - **strict**: 토큰의 `id`가 경로의 대상 ID와 같아야 합니다 (본인 리소스).
//! - **lax**: 역할 하한만 만족하면 누구든 통과합니다.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use market_core::{Role, User};

use super::jwt::{bind_claims, TokenCodec};
use crate::error::ServiceError;

/// 토큰의 `id`로 사용자를 조회하는 저장소 경계.
#[async_trait]
pub trait PrincipalSource: Send + Sync {
    /// 사용자 조회. 없으면 `Ok(None)`.
    async fn find_principal(&self, id: i64) -> Result<Option<User>, ServiceError>;
}

/// 인가 게이트.
#[derive(Clone)]
pub struct AuthGate {
    codec: TokenCodec,
    principals: Arc<dyn PrincipalSource>,
}

impl AuthGate {
    /// 새 게이트 생성.
    pub fn new(codec: TokenCodec, principals: Arc<dyn PrincipalSource>) -> Self {
        Self { codec, principals }
    }

    /// 역할 하한만 검사하는 게이트.
    pub async fn lax(&self, header: Option<&str>, required: Role) -> Result<User, ServiceError> {
        self.authorize(header, None, required).await
    }

    /// 토큰 주체가 `expected_id`와 같아야 하는 게이트.
    pub async fn strict(
        &self,
        header: Option<&str>,
        expected_id: i64,
        required: Role,
    ) -> Result<User, ServiceError> {
        self.authorize(header, Some(expected_id), required).await
    }

    async fn authorize(
        &self,
        header: Option<&str>,
        expected_id: Option<i64>,
        required: Role,
    ) -> Result<User, ServiceError> {
        let claims = self.codec.parse(header).map_err(|e| {
            debug!(reason = %e, "Token rejected");
            ServiceError::Unauthenticated
        })?;

        if let Some(expected) = expected_id {
            if claims.id != expected {
                warn!(
                    token_id = claims.id,
                    expected_id = expected,
                    "Token subject does not match target resource"
                );
                return Err(ServiceError::Forbidden);
            }
        }

        let principal = match self.principals.find_principal(claims.id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(user_id = claims.id, "Token subject no longer exists");
                return Err(ServiceError::Unauthenticated);
            }
            Err(e) => {
                error!(error = %e, user_id = claims.id, "Failed to load principal");
                return Err(ServiceError::ServiceUnavailable);
            }
        };

        if !principal.role.satisfies(required) {
            warn!(
                user_id = principal.id,
                role = %principal.role,
                required = %required,
                "Insufficient role"
            );
            return Err(ServiceError::Forbidden);
        }

        bind_claims(claims, &principal).map_err(|e| {
            warn!(reason = %e, user_id = principal.id, "Token no longer matches principal");
            ServiceError::Unauthenticated
        })?;

        Ok(principal)
    }
}
