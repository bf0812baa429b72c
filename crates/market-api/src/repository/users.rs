//! User Repository
//!
//! 사용자 관련 데이터베이스 연산을 담당합니다.

use sqlx::PgExecutor;

use market_core::{NewUserRecord, User};

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// ID로 사용자 조회
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// ID로 사용자 조회 후 행 잠금 (트랜잭션 내부 전용)
    pub async fn lock_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// 이메일로 사용자 조회
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// 저장된 비밀번호 해시만 조회
    pub async fn find_password_hash<'e, E>(
        executor: E,
        id: i64,
    ) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// 이메일만 조회
    pub async fn find_email<'e, E>(executor: E, id: i64) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// 이메일 사용 여부 확인.
    ///
    /// `except_id`가 주어지면 해당 사용자는 제외합니다.
    pub async fn email_taken<'e, E>(
        executor: E,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(executor)
        .await
    }

    /// 새 사용자 저장
    pub async fn insert<'e, E>(executor: E, record: &NewUserRecord) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.role)
        .fetch_one(executor)
        .await
    }

    /// 병합된 프로필(이름, 이메일) 저장
    pub async fn save_profile<'e, E>(executor: E, user: &User) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(executor)
        .await
    }

    /// 비밀번호 해시 교체
    pub async fn update_password_hash<'e, E>(
        executor: E,
        id: i64,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// 사용자 삭제 (소유 지갑은 FK CASCADE로 함께 삭제)
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
