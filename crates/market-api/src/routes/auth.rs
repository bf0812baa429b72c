//! 로그인 endpoint.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use market_core::{LoginRequest, UserView};

use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Access Token (`Authorization: Bearer <token>`로 사용)
    pub token: String,
    /// 토큰 유효 시간 (초)
    pub expires_in: i64,
    /// 로그인한 사용자
    pub user: UserView,
}

/// 이메일/비밀번호로 로그인하여 토큰을 발급받습니다.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "자격 증명 불일치", body = ApiErrorResponse),
        (status = 503, description = "저장소 사용 불가", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state.users.authenticate(credentials).await?;
    let token = state.tokens.issue(&user)?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        expires_in: state.tokens.ttl().num_seconds(),
        user: user.into(),
    }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}
