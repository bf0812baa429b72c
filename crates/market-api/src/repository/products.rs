//! Product Repository
//!
//! 상품 관련 데이터베이스 연산을 담당합니다.

use sqlx::PgExecutor;

use market_core::{NewProduct, Product};

/// Product Repository
pub struct ProductRepository;

impl ProductRepository {
    /// ID로 상품 조회
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Product>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, points, category, stock
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// ID로 상품 조회 후 행 잠금
    pub async fn lock_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Product>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, points, category, stock
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// 전체 상품 목록 (ID 순)
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Product>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, points, category, stock
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// 새 상품 저장
    pub async fn insert<'e, E>(executor: E, input: &NewProduct) -> Result<Product, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, points, category, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, points, category, stock
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.points)
        .bind(&input.category)
        .bind(input.stock)
        .fetch_one(executor)
        .await
    }

    /// 병합된 상품 레코드 저장
    pub async fn save<'e, E>(executor: E, product: &Product) -> Result<Product, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, points = $5,
                category = $6, stock = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, points, category, stock
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.points)
        .bind(&product.category)
        .bind(product.stock)
        .fetch_one(executor)
        .await
    }

    /// 상품 삭제
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
