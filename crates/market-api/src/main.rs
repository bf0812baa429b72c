//! 마켓플레이스 API 서버 진입점.
//!
//! 설정 로드, 로깅 초기화, 저장소 연결, 라우터 구성 후 서버를 시작합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use market_api::openapi::swagger_ui_router;
use market_api::repository::Database;
use market_api::routes::create_api_router;
use market_api::state::AppState;
use market_core::{init_logging, AppConfig, DatabaseConfig, LogConfig, ServerConfig};

/// 저장소 연결.
///
/// `DATABASE_URL`이 없거나 연결에 실패하면 풀 없는 핸들을 반환합니다.
/// 이 경우 서버는 뜨지만 모든 엔티티 요청은 503으로 응답합니다.
async fn connect_database(config: &DatabaseConfig) -> Database {
    let Some(url) = config.url.as_deref() else {
        warn!("DATABASE_URL not set, database features will be disabled");
        return Database::unavailable();
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Database::unavailable();
        }
    };

    // 연결 테스트
    if let Err(e) = sqlx::query("SELECT 1").fetch_one(&pool).await {
        error!("Failed to verify database connection: {}", e);
        return Database::unavailable();
    }

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("Failed to apply migrations: {}", e);
        return Database::unavailable();
    }

    info!("Connected to PostgreSQL successfully");
    Database::new(pool)
}

/// CORS 레이어 생성.
///
/// 허용 origin이 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 자격 증명 포함 허용 (origin 제한 시에만)
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .merge(create_api_router().with_state(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(cors_layer(config))
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use market_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        return Ok(true);
    }

    Ok(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    init_logging(LogConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let db = connect_database(&config.database).await;
    let state = Arc::new(AppState::new(db, &config.auth));

    info!(version = %state.version, "Application state initialized");
    info!(
        has_db = state.db.is_configured(),
        token_ttl_hours = config.auth.token_ttl_hours,
        "Service connections status"
    );

    let app = create_router(state, &config.server);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .context("invalid API_HOST/API_PORT")?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
