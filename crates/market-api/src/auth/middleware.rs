//! Axum용 인증 추출기.
//!
//! [`AuthGate`](super::AuthGate)의 lax 모드를 추출기로 감쌉니다.
//! 경로의 대상 ID가 필요한 strict 모드는 핸들러에서 [`authorization`]으로
//! 헤더를 꺼내 직접 호출합니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use market_core::{Role, User};

use crate::error::ServiceError;
use crate::state::AppState;

/// Authorization 헤더 원문.
///
/// 헤더가 없거나 ASCII가 아니면 `None`입니다.
pub fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// 로그인한 사용자 (USER 이상).
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = state
            .gate
            .lax(authorization(&parts.headers), Role::User)
            .await?;
        Ok(CurrentUser(user))
    }
}

/// Admin 권한을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = state
            .gate
            .lax(authorization(&parts.headers), Role::Admin)
            .await?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::gate::tests::MemoryPrincipals;
    use crate::auth::AuthGate;
    use crate::state::create_test_state;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn whoami(CurrentUser(user): CurrentUser) -> String {
        user.name
    }

    async fn admin_only(AdminUser(user): AdminUser) -> String {
        user.name
    }

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@x.com", id),
            password_hash: "hash".to_string(),
            role,
        }
    }

    fn app(users: &[User]) -> (Router, Arc<AppState>) {
        let mut state = create_test_state();
        let map = users.iter().map(|u| (u.id, u.clone())).collect();
        state.gate = AuthGate::new(state.tokens.clone(), Arc::new(MemoryPrincipals(map)));
        let state = Arc::new(state);

        let router = Router::new()
            .route("/me", get(whoami))
            .route("/admin", get(admin_only))
            .with_state(state.clone());
        (router, state)
    }

    async fn status(router: Router, uri: &str, header: Option<String>) -> StatusCode {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = header {
            request = request.header(AUTHORIZATION, value);
        }
        router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_authorization_header_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(authorization(&headers), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_extractors_enforce_role_floor() {
        let plain = user(1, Role::User);
        let admin = user(2, Role::Admin);
        let (router, state) = app(&[plain.clone(), admin.clone()]);

        let plain_header = Some(format!("Bearer {}", state.tokens.issue(&plain).unwrap()));
        let admin_header = Some(format!("Bearer {}", state.tokens.issue(&admin).unwrap()));

        assert_eq!(status(router.clone(), "/me", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status(router.clone(), "/me", plain_header.clone()).await, StatusCode::OK);
        assert_eq!(
            status(router.clone(), "/admin", plain_header).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(status(router, "/admin", admin_header).await, StatusCode::OK);
    }
}
