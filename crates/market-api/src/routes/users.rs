//! 사용자 endpoint.
//!
//! 가입과 조회는 공개이며, 수정/삭제는 본인만 가능합니다 (strict 게이트).

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use market_core::{NewUser, PasswordChange, PasswordUpdate, Role, UserUpdate, UserView};

use crate::auth::authorization;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 비밀번호 변경 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PasswordChangeResponse {
    /// 실제로 변경되었는지 여부
    pub changed: bool,
}

impl From<PasswordChange> for PasswordChangeResponse {
    fn from(outcome: PasswordChange) -> Self {
        Self {
            changed: outcome == PasswordChange::Changed,
        }
    }
}

/// 회원 가입.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "가입 완료", body = UserView),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let user = state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "조회 성공", body = UserView),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserView>> {
    let user = state.users.fetch(id).await?;
    Ok(Json(user.into()))
}

/// 본인 프로필 수정 (이름, 이메일).
///
/// 이메일을 바꾸면 기존 토큰은 무효가 되므로 다시 로그인해야 합니다.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "수정 완료", body = UserView),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(changes): Json<UserUpdate>,
) -> ApiResult<Json<UserView>> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    let user = state.users.update(id, changes).await?;
    Ok(Json(user.into()))
}

/// 본인 비밀번호 변경.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = PasswordUpdate,
    responses(
        (status = 200, description = "처리 완료", body = PasswordChangeResponse),
        (status = 400, description = "비밀번호 확인 불일치", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(changes): Json<PasswordUpdate>,
) -> ApiResult<Json<PasswordChangeResponse>> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    let outcome = state.users.update_password(id, changes).await?;
    Ok(Json(outcome.into()))
}

/// 본인 계정 삭제.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/password", put(update_password))
}
