//! Cart Repository
//!
//! 장바구니는 사용자 ID로 찾습니다 (`user_id` UNIQUE).

use rust_decimal::Decimal;
use sqlx::PgExecutor;

use market_core::Cart;

/// Cart Repository
pub struct CartRepository;

impl CartRepository {
    /// 사용자의 장바구니 조회
    pub async fn find_by_user<'e, E>(executor: E, user_id: i64) -> Result<Option<Cart>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cart>("SELECT id, items, total, user_id FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// 사용자의 장바구니 조회 후 행 잠금
    pub async fn lock_by_user<'e, E>(executor: E, user_id: i64) -> Result<Option<Cart>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cart>(
            "SELECT id, items, total, user_id FROM carts WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// 새 장바구니 저장
    pub async fn insert<'e, E>(
        executor: E,
        user_id: i64,
        items: Option<&str>,
        total: Option<Decimal>,
    ) -> Result<Cart, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (items, total, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, items, total, user_id
            "#,
        )
        .bind(items)
        .bind(total)
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    /// 병합된 장바구니 저장
    pub async fn save<'e, E>(executor: E, cart: &Cart) -> Result<Cart, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cart>(
            r#"
            UPDATE carts
            SET items = $2, total = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, items, total, user_id
            "#,
        )
        .bind(cart.id)
        .bind(&cart.items)
        .bind(cart.total)
        .fetch_one(executor)
        .await
    }

    /// 사용자의 장바구니 삭제
    pub async fn delete_by_user<'e, E>(executor: E, user_id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
