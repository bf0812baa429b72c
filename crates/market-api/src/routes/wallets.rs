//! 지갑 endpoint.
//!
//! 모든 경로에 인증이 필요하며, 소유자 검사는 서비스 계층에서 수행합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use market_core::{NewWallet, Wallet, WalletUpdate};

use crate::auth::CurrentUser;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 지갑 생성.
///
/// 관리자는 `user_id`로 대상 사용자를 지정하고 초기 잔액을 정할 수 있습니다.
/// 그 외 사용자는 본인 지갑만 잔액 0으로 생성됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = NewWallet,
    responses(
        (status = 201, description = "생성 완료", body = Wallet),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "wallets"
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<NewWallet>,
) -> ApiResult<(StatusCode, Json<Wallet>)> {
    let wallet = state.wallets.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

/// 지갑 조회.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}",
    params(("id" = i64, Path, description = "지갑 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Wallet),
        (status = 403, description = "소유자 아님", body = ApiErrorResponse),
        (status = 404, description = "지갑 없음 (관리자만)", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "wallets"
)]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Wallet>> {
    Ok(Json(state.wallets.fetch(&actor, id).await?))
}

/// 지갑 부분 수정.
#[utoipa::path(
    put,
    path = "/api/v1/wallets/{id}",
    params(("id" = i64, Path, description = "지갑 ID")),
    request_body = WalletUpdate,
    responses(
        (status = 200, description = "수정 완료", body = Wallet),
        (status = 403, description = "소유자 아님 또는 소유자 변경 시도", body = ApiErrorResponse),
        (status = 404, description = "지갑 없음 (관리자만)", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "wallets"
)]
pub async fn update_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(changes): Json<WalletUpdate>,
) -> ApiResult<Json<Wallet>> {
    Ok(Json(state.wallets.update(&actor, id, changes).await?))
}

/// 지갑 삭제.
#[utoipa::path(
    delete,
    path = "/api/v1/wallets/{id}",
    params(("id" = i64, Path, description = "지갑 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 403, description = "소유자 아님", body = ApiErrorResponse),
        (status = 404, description = "지갑 없음 (관리자만)", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "wallets"
)]
pub async fn delete_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.wallets.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 지갑 라우터 생성.
pub fn wallets_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_wallet)).route(
        "/{id}",
        get(get_wallet).put(update_wallet).delete(delete_wallet),
    )
}
