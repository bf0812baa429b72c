//! 상품 endpoint.
//!
//! 목록과 단건 조회는 공개, 생성/수정/삭제는 관리자 전용입니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use market_core::{NewProduct, Product, ProductUpdate};

use crate::auth::AdminUser;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 상품 목록 조회.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "상품 목록", body = Vec<Product>),
        (status = 503, description = "저장소 사용 불가", body = ApiErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.products.list().await?;
    Ok(Json(products))
}

/// 상품 등록 (관리자).
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "등록 완료", body = Product),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// 상품 조회.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Product),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.fetch(id).await?))
}

/// 상품 부분 수정 (관리자).
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "수정 완료", body = Product),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Json(changes): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.update(id, changes).await?))
}

/// 상품 삭제 (관리자).
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
