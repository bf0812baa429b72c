//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 서비스 계층에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용하며, 조회는 풀에서,
//! 쓰기는 [`run_in_transaction`]이 넘겨준 트랜잭션 위에서 실행됩니다.

pub mod carts;
pub mod products;
pub mod transaction;
pub mod users;
pub mod wallets;

pub use carts::CartRepository;
pub use products::ProductRepository;
pub use transaction::{run_in_transaction, TxFuture};
pub use users::UserRepository;
pub use wallets::WalletRepository;

use sqlx::PgPool;

use crate::error::ServiceError;

/// 저장소 핸들.
///
/// 시작 시 한 번 생성되며 이후 변경되지 않습니다. `DATABASE_URL`이 없으면
/// 풀 없이 생성되고, 모든 서비스 호출은 `ServiceUnavailable`로 실패합니다.
#[derive(Clone, Default)]
pub struct Database {
    pool: Option<PgPool>,
}

impl Database {
    /// 연결 풀로 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// 풀 없는 핸들 생성.
    pub fn unavailable() -> Self {
        Self { pool: None }
    }

    /// 연결 풀 반환.
    pub fn handle(&self) -> Result<&PgPool, ServiceError> {
        self.pool.as_ref().ok_or(ServiceError::ServiceUnavailable)
    }

    /// 풀이 설정되었는지 확인.
    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_healthy(&self) -> bool {
        match &self.pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_handle_is_unavailable() {
        let db = Database::unavailable();

        assert!(!db.is_configured());
        assert!(matches!(db.handle(), Err(ServiceError::ServiceUnavailable)));
        assert!(!db.is_healthy().await);
    }
}
