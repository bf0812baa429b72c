//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `ToSchema` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use market_core::{
    Cart, CartUpdate, LoginRequest, NewCart, NewProduct, NewUser, NewWallet, PasswordUpdate,
    Product, ProductUpdate, UserUpdate, UserView, Wallet, WalletUpdate,
};

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, LoginResponse, PasswordChangeResponse,
};

// ==================== OpenAPI 문서 정의 ====================

/// Marketplace API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = r#"
# 마켓플레이스 백엔드 REST API

사용자, 상품, 지갑, 장바구니를 관리하는 REST API입니다.

## 인증

`POST /api/v1/login`으로 발급받은 토큰을
`Authorization: Bearer <token>` 헤더에 포함하세요.
토큰은 발급 시점의 이메일에 묶여 있어 이메일을 바꾸면 다시 로그인해야 합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인 및 토큰 발급"),
        (name = "users", description = "사용자 - 가입, 프로필, 비밀번호"),
        (name = "products", description = "상품 - 카탈로그 관리"),
        (name = "wallets", description = "지갑 - 잔액 및 포인트"),
        (name = "carts", description = "장바구니 - 사용자당 하나")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Auth =====
            LoginRequest,
            LoginResponse,

            // ===== Users =====
            UserView,
            NewUser,
            UserUpdate,
            PasswordUpdate,
            PasswordChangeResponse,

            // ===== Products =====
            Product,
            NewProduct,
            ProductUpdate,

            // ===== Wallets =====
            Wallet,
            NewWallet,
            WalletUpdate,

            // ===== Carts =====
            Cart,
            NewCart,
            CartUpdate,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,

        // ===== Users =====
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::update_password,
        crate::routes::users::delete_user,

        // ===== Products =====
        crate::routes::products::list_products,
        crate::routes::products::create_product,
        crate::routes::products::get_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,

        // ===== Wallets =====
        crate::routes::wallets::create_wallet,
        crate::routes::wallets::get_wallet,
        crate::routes::wallets::update_wallet,
        crate::routes::wallets::delete_wallet,

        // ===== Carts =====
        crate::routes::carts::create_cart,
        crate::routes::carts::get_cart,
        crate::routes::carts::update_cart,
        crate::routes::carts::delete_cart,
    )
)]
pub struct ApiDoc;

/// Bearer 토큰 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================
