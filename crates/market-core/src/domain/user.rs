//! 사용자(Principal) 도메인 모델.
//!
//! 저장된 사용자 레코드, 외부 노출용 뷰, 등록/수정 페이로드를 정의합니다.
//! 비밀번호 해시는 [`User`]에만 존재하며 어떤 직렬화 경로로도 나가지 않습니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validation::{validate_email_or_blank, validate_not_blank};
use super::Role;

/// 저장된 사용자 레코드.
///
/// `Serialize`를 구현하지 않습니다. 외부로 내보낼 때는 [`UserView`]를 사용합니다.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    /// 서버가 할당하는 불변 ID
    pub id: i64,
    pub name: String,
    /// 유일 이메일 (저장소 UNIQUE 제약)
    pub email: String,
    /// PHC 형식 해시 (불투명 값)
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// 관리자 권한 보유 여부.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 부분 업데이트 적용.
    ///
    /// 값이 있고 비어 있지 않은 필드만 덮어씁니다.
    /// 적용 후 레코드가 실제로 바뀌었으면 `true`를 반환합니다.
    pub fn apply(&mut self, update: &UserUpdate) -> bool {
        let mut changed = false;
        if let Some(name) = non_empty(&update.name) {
            if self.name != name {
                self.name = name.to_string();
                changed = true;
            }
        }
        if let Some(email) = non_empty(&update.email) {
            if self.email != email {
                self.email = email.to_string();
                changed = true;
            }
        }
        changed
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// 외부 노출용 사용자 뷰.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// 역할 (0 = USER, 1 = ADMIN)
    #[cfg_attr(feature = "utoipa-support", schema(value_type = i16))]
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// 회원 가입 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[validate(schema(function = "validate_new_user_passwords"))]
pub struct NewUser {
    #[validate(
        length(min = 1, max = 100, message = "이름은 1-100자여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        email(message = "이메일 형식이 올바르지 않습니다"),
        length(max = 255, message = "이메일은 255자 이하여야 합니다")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "비밀번호를 입력하세요"))]
    pub password: String,
    pub confirm_password: String,
}

fn validate_new_user_passwords(user: &NewUser) -> Result<(), ValidationError> {
    if user.password != user.confirm_password {
        return Err(ValidationError::new("password_mismatch")
            .with_message("비밀번호 확인이 일치하지 않습니다".into()));
    }
    Ok(())
}

/// 새 사용자 레코드 (해시 완료 후 저장소에 전달).
#[derive(Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// 프로필/이메일 부분 업데이트.
///
/// 비어 있거나 공백뿐인 필드는 "변경 없음"으로 취급합니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserUpdate {
    #[serde(default)]
    #[validate(length(max = 100, message = "이름은 100자 이하여야 합니다"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(
        custom(function = "validate_email_or_blank"),
        length(max = 255, message = "이메일은 255자 이하여야 합니다")
    )]
    pub email: Option<String>,
}

impl UserUpdate {
    /// 적용할 필드가 하나도 없는지 확인.
    pub fn is_empty(&self) -> bool {
        non_empty(&self.name).is_none() && non_empty(&self.email).is_none()
    }
}

/// 비밀번호 변경 요청.
///
/// `password`가 없으면 변경 요청이 없는 것으로 간주합니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PasswordUpdate {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// 비밀번호 변경 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordChange {
    /// 변경 요청 없음
    Unchanged,
    /// 변경 완료
    Changed,
}

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
