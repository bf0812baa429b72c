//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/login` - 로그인 (토큰 발급)
//! - `/api/v1/users` - 회원 가입, 본인 프로필/비밀번호 관리
//! - `/api/v1/users/{id}/cart` - 본인 장바구니
//! - `/api/v1/products` - 상품 카탈로그 (쓰기는 관리자 전용)
//! - `/api/v1/wallets` - 지갑 (소유자 또는 관리자)

pub mod auth;
pub mod carts;
pub mod health;
pub mod products;
pub mod users;
pub mod wallets;

pub use auth::{auth_router, LoginResponse};
pub use carts::carts_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use products::products_router;
pub use users::{users_router, PasswordChangeResponse};
pub use wallets::wallets_router;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1", auth_router())
        .nest("/api/v1/users", users_router().merge(carts_router()))
        .nest("/api/v1/products", products_router())
        .nest("/api/v1/wallets", wallets_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        create_api_router().with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn test_liveness_is_mounted() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_routes_report_missing_store() {
        for uri in ["/api/v1/products", "/api/v1/products/1", "/api/v1/users/1"] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_signup_reports_missing_store() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Ana","email":"ana@x.com","password":"p1","confirm_password":"p1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let cases = [
            ("PUT", "/api/v1/users/1"),
            ("DELETE", "/api/v1/users/1"),
            ("DELETE", "/api/v1/products/1"),
            ("GET", "/api/v1/wallets/1"),
            ("GET", "/api/v1/users/1/cart"),
            ("POST", "/api/v1/users/1/cart"),
        ];

        for (method, uri) in cases {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header(CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v1/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
