//! 트랜잭션 실행기.
//!
//! 하나의 작업 단위를 트랜잭션으로 감싸 실행합니다. 작업이 성공하면
//! 커밋하고, 작업 에러나 저장소 에러가 나면 롤백한 뒤 이벤트 태그를 붙여
//! 에러를 전파합니다. 재시도는 하지 않습니다.
//!
//! 로그는 시작, 실패, 성공 세 지점에서만 남깁니다.

use futures::future::BoxFuture;
use sqlx::{Database, Pool, Transaction};
use tracing::{error, info};

use market_core::TransactionEvent;

use crate::error::ServiceError;

/// 트랜잭션 작업이 반환하는 future.
pub type TxFuture<'c, T> = BoxFuture<'c, Result<T, ServiceError>>;

/// 작업을 하나의 트랜잭션으로 실행.
///
/// # Example
///
/// ```rust,ignore
/// let user = run_in_transaction(pool, TransactionEvent::Update, move |tx| {
///     Box::pin(rename_in_tx(tx, id, name))
/// })
/// .await?;
/// ```
pub async fn run_in_transaction<DB, T, F>(
    pool: &Pool<DB>,
    event: TransactionEvent,
    operation: F,
) -> Result<T, ServiceError>
where
    DB: Database,
    T: Send,
    F: for<'c> FnOnce(&'c mut Transaction<'static, DB>) -> TxFuture<'c, T> + Send,
{
    let wrap = |source: ServiceError| ServiceError::Transaction {
        event,
        source: Box::new(source),
    };

    let mut tx = match pool.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            error!(event = %event, error = %e, "Transaction failed to begin");
            return Err(wrap(ServiceError::from(e)));
        }
    };
    info!(event = %event, "Transaction started");

    let result = match operation(&mut tx).await {
        Ok(value) => tx.commit().await.map(|_| value).map_err(ServiceError::from),
        Err(e) => match tx.rollback().await {
            Ok(()) => Err(e),
            Err(rollback_error) => {
                error!(event = %event, error = %rollback_error, "Rollback failed");
                Err(e)
            }
        },
    };

    match result {
        Ok(value) => {
            info!(event = %event, "Transaction committed");
            Ok(value)
        }
        Err(e) => {
            error!(event = %event, error = %e, "Transaction failed");
            Err(wrap(e))
        }
    }
}
