//! Wallet Repository
//!
//! 지갑 관련 데이터베이스 연산을 담당합니다.

use sqlx::PgExecutor;

use market_core::{NewWalletRecord, Wallet};

/// Wallet Repository
pub struct WalletRepository;

impl WalletRepository {
    /// ID로 지갑 조회
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Wallet>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Wallet>(
            "SELECT id, name, amount, points, user_id FROM wallets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// ID로 지갑 조회 후 행 잠금
    pub async fn lock_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Wallet>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Wallet>(
            "SELECT id, name, amount, points, user_id FROM wallets WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// 새 지갑 저장
    pub async fn insert<'e, E>(executor: E, record: &NewWalletRecord) -> Result<Wallet, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Wallet>(
            r#"
            INSERT INTO wallets (name, amount, points, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, amount, points, user_id
            "#,
        )
        .bind(&record.name)
        .bind(record.amount)
        .bind(record.points)
        .bind(record.user_id)
        .fetch_one(executor)
        .await
    }

    /// 병합된 지갑 레코드 저장. 소유자(`user_id`)는 갱신하지 않습니다.
    pub async fn save<'e, E>(executor: E, wallet: &Wallet) -> Result<Wallet, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Wallet>(
            r#"
            UPDATE wallets
            SET name = $2, amount = $3, points = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, amount, points, user_id
            "#,
        )
        .bind(wallet.id)
        .bind(&wallet.name)
        .bind(wallet.amount)
        .bind(wallet.points)
        .fetch_one(executor)
        .await
    }

    /// 지갑 삭제
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM wallets WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
