//! 장바구니 endpoint.
//!
//! `/api/v1/users/{id}/cart` 아래에 있으며 모든 작업이 본인 전용입니다 (strict 게이트).

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use market_core::{Cart, CartUpdate, NewCart, Role};

use crate::auth::authorization;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 장바구니 생성.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/cart",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = NewCart,
    responses(
        (status = 201, description = "생성 완료", body = Cart),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse),
        (status = 409, description = "이미 장바구니가 있음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
pub async fn create_cart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<NewCart>,
) -> ApiResult<(StatusCode, Json<Cart>)> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    let cart = state.carts.create(id, payload).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// 장바구니 조회.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/cart",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Cart),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse),
        (status = 404, description = "장바구니 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Json<Cart>> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    Ok(Json(state.carts.fetch_by_user(id).await?))
}

/// 장바구니 부분 업데이트.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/cart",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = CartUpdate,
    responses(
        (status = 200, description = "수정 완료", body = Cart),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse),
        (status = 404, description = "장바구니 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
pub async fn update_cart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(changes): Json<CartUpdate>,
) -> ApiResult<Json<Cart>> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    Ok(Json(state.carts.update_by_user(id, changes).await?))
}

/// 장바구니 삭제.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/cart",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인이 아님", body = ApiErrorResponse),
        (status = 404, description = "장바구니 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
pub async fn delete_cart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    state
        .gate
        .strict(authorization(&headers), id, Role::User)
        .await?;

    state.carts.delete_by_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 장바구니 라우터 생성. 사용자 라우터와 같은 접두사에 병합됩니다.
pub fn carts_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/{id}/cart",
        get(get_cart)
            .post(create_cart)
            .put(update_cart)
            .delete(delete_cart),
    )
}
