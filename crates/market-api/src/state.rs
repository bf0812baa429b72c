//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 시작 시 한 번 구성되며 Arc로 래핑되어 요청 간에 공유됩니다.
//! 요청 사이에 인증 상태를 캐시하지 않으므로 가변 필드가 없습니다.

use std::sync::Arc;

use market_core::AuthConfig;

use crate::auth::{AuthGate, TokenCodec};
use crate::repository::Database;
use crate::services::{CartService, ProductService, UserService, WalletService};

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 저장소 핸들 (PostgreSQL, 미설정 가능)
    pub db: Database,
    /// 토큰 발급/검증기
    pub tokens: TokenCodec,
    /// 요청 단위 인가 게이트
    pub gate: AuthGate,
    pub users: UserService,
    pub products: ProductService,
    pub wallets: WalletService,
    pub carts: CartService,
    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 게이트는 사용자 서비스를 통해 토큰 주체를 조회합니다.
    pub fn new(db: Database, auth: &AuthConfig) -> Self {
        let tokens = TokenCodec::new(auth);
        let users = UserService::new(db.clone());
        let gate = AuthGate::new(tokens.clone(), Arc::new(users.clone()));

        Self {
            products: ProductService::new(db.clone()),
            wallets: WalletService::new(db.clone()),
            carts: CartService::new(db.clone()),
            db,
            tokens,
            gate,
            users,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        self.db.is_healthy().await
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성 (저장소 없음).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    let auth = AuthConfig::new("test-secret-key-for-jwt-testing-minimum-32-chars", 24)
        .expect("test secret is long enough");
    AppState::new(Database::unavailable(), &auth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_without_database() {
        let state = create_test_state();

        assert!(!state.db.is_configured());
        assert!(!state.is_db_healthy().await);
        assert!(state.uptime_secs() >= 0);
        assert_eq!(state.tokens.ttl(), chrono::Duration::hours(24));
    }
}
