//! 사용자 서비스.
//!
//! 회원 가입, 조회, 프로필/이메일/비밀번호 변경, 삭제, 로그인 인증을 담당합니다.
//! 모든 쓰기는 트랜잭션 실행기를 통해 하나의 단위로 처리됩니다.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};
use validator::Validate;

use market_core::{
    LoginRequest, NewUser, NewUserRecord, PasswordChange, PasswordUpdate, Role,
    TransactionEvent, User, UserUpdate,
};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::PrincipalSource;
use crate::error::ServiceError;
use crate::repository::{run_in_transaction, Database, UserRepository};

/// 사용자 서비스.
#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    /// 새 서비스 생성.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 회원 가입.
    ///
    /// 역할은 항상 `USER`로 시작하며, 이메일이 이미 있으면 `Conflict`입니다.
    pub async fn create(&self, payload: NewUser) -> Result<User, ServiceError> {
        let pool = self.db.handle()?;
        payload.validate()?;

        let NewUser {
            name,
            email,
            password,
            ..
        } = payload;
        let record = NewUserRecord {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash: hash_password_blocking(password).await?,
            role: Role::User,
        };

        let user = run_in_transaction(pool, TransactionEvent::Create, move |tx| {
            Box::pin(insert_user(tx, record))
        })
        .await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// ID로 사용자 조회.
    pub async fn fetch(&self, id: i64) -> Result<User, ServiceError> {
        let pool = self.db.handle()?;
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("사용자", id))
    }

    /// 이메일로 사용자 조회.
    pub async fn fetch_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let pool = self.db.handle()?;
        UserRepository::find_by_email(pool, email)
            .await?
            .ok_or_else(|| ServiceError::not_found("사용자", email))
    }

    /// 저장된 비밀번호 해시 조회.
    pub async fn fetch_password_hash(&self, id: i64) -> Result<String, ServiceError> {
        let pool = self.db.handle()?;
        UserRepository::find_password_hash(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("사용자", id))
    }

    /// 현재 이메일 조회.
    pub async fn fetch_email(&self, id: i64) -> Result<String, ServiceError> {
        let pool = self.db.handle()?;
        UserRepository::find_email(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("사용자", id))
    }

    /// 이메일 사용 여부.
    pub async fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
        let pool = self.db.handle()?;
        Ok(UserRepository::email_taken(pool, email, None).await?)
    }

    /// 이름 변경.
    pub async fn update_profile(&self, id: i64, name: String) -> Result<User, ServiceError> {
        self.update(
            id,
            UserUpdate {
                name: Some(name),
                email: None,
            },
        )
        .await
    }

    /// 이메일 변경.
    ///
    /// 다른 사용자가 쓰고 있는 이메일이면 `Conflict`이며 기존 이메일은 유지됩니다.
    /// 이메일이 바뀌면 기존에 발급된 토큰은 더 이상 검증을 통과하지 못합니다.
    pub async fn update_email(&self, id: i64, email: String) -> Result<User, ServiceError> {
        self.update(
            id,
            UserUpdate {
                name: None,
                email: Some(email),
            },
        )
        .await
    }

    /// 프로필 부분 업데이트 (이름, 이메일).
    ///
    /// 적용할 값이 하나도 없으면 쓰기 단위를 열지 않고 현재 레코드를 반환합니다.
    pub async fn update(&self, id: i64, changes: UserUpdate) -> Result<User, ServiceError> {
        let pool = self.db.handle()?;
        changes.validate()?;
        if changes.is_empty() {
            return self.fetch(id).await;
        }

        let user = run_in_transaction(pool, TransactionEvent::Update, move |tx| {
            Box::pin(merge_profile(tx, id, changes))
        })
        .await?;

        debug!(user_id = user.id, "User profile updated");
        Ok(user)
    }

    /// 비밀번호 변경.
    ///
    /// `password`가 없거나 비어 있으면 아무것도 하지 않고 [`PasswordChange::Unchanged`]를
    /// 반환합니다.
    pub async fn update_password(
        &self,
        id: i64,
        changes: PasswordUpdate,
    ) -> Result<PasswordChange, ServiceError> {
        let pool = self.db.handle()?;

        let Some(password) = changes.password.filter(|p| !p.is_empty()) else {
            return Ok(PasswordChange::Unchanged);
        };
        if changes.confirm_password.as_deref() != Some(password.as_str()) {
            return Err(ServiceError::Validation(
                "비밀번호 확인이 일치하지 않습니다".to_string(),
            ));
        }

        let password_hash = hash_password_blocking(password).await?;
        run_in_transaction(pool, TransactionEvent::Update, move |tx| {
            Box::pin(replace_password(tx, id, password_hash))
        })
        .await?;

        info!(user_id = id, "Password changed");
        Ok(PasswordChange::Changed)
    }

    /// 사용자 삭제. 소유한 지갑과 장바구니도 함께 삭제됩니다.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let pool = self.db.handle()?;

        run_in_transaction(pool, TransactionEvent::Delete, move |tx| {
            Box::pin(delete_user(tx, id))
        })
        .await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// 로그인 자격 증명 확인.
    ///
    /// 존재하지 않는 이메일과 틀린 비밀번호는 호출자에게 구분되지 않습니다.
    pub async fn authenticate(&self, credentials: LoginRequest) -> Result<User, ServiceError> {
        let pool = self.db.handle()?;

        let Some(user) = UserRepository::find_by_email(pool, credentials.email.trim()).await?
        else {
            debug!("Login rejected: unknown email");
            return Err(ServiceError::Unauthenticated);
        };

        if !verify_password_blocking(credentials.password, user.password_hash.clone()).await {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(ServiceError::Unauthenticated);
        }

        Ok(user)
    }
}

#[async_trait]
impl PrincipalSource for UserService {
    async fn find_principal(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let pool = self.db.handle()?;
        Ok(UserRepository::find_by_id(pool, id).await?)
    }
}

async fn insert_user(
    tx: &mut Transaction<'static, Postgres>,
    record: NewUserRecord,
) -> Result<User, ServiceError> {
    if UserRepository::email_taken(&mut **tx, &record.email, None).await? {
        return Err(ServiceError::Conflict(format!(
            "이미 사용 중인 이메일입니다: {}",
            record.email
        )));
    }
    Ok(UserRepository::insert(&mut **tx, &record).await?)
}

async fn merge_profile(
    tx: &mut Transaction<'static, Postgres>,
    id: i64,
    changes: UserUpdate,
) -> Result<User, ServiceError> {
    let mut user = UserRepository::lock_by_id(&mut **tx, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("사용자", id))?;

    if let Some(email) = changes.email.as_deref().map(str::trim) {
        if !email.is_empty()
            && email != user.email
            && UserRepository::email_taken(&mut **tx, email, Some(id)).await?
        {
            return Err(ServiceError::Conflict(format!(
                "이미 사용 중인 이메일입니다: {}",
                email
            )));
        }
    }

    if !user.apply(&changes) {
        return Ok(user);
    }
    Ok(UserRepository::save_profile(&mut **tx, &user).await?)
}

async fn replace_password(
    tx: &mut Transaction<'static, Postgres>,
    id: i64,
    password_hash: String,
) -> Result<(), ServiceError> {
    let updated = UserRepository::update_password_hash(&mut **tx, id, &password_hash).await?;
    if updated == 0 {
        return Err(ServiceError::not_found("사용자", id));
    }
    Ok(())
}

async fn delete_user(tx: &mut Transaction<'static, Postgres>, id: i64) -> Result<(), ServiceError> {
    let deleted = UserRepository::delete(&mut **tx, id).await?;
    if deleted == 0 {
        return Err(ServiceError::not_found("사용자", id));
    }
    Ok(())
}
