//! 헬스 체크 endpoint.
//!
//! - `GET /health`: 프로세스 생존 여부만 확인 (liveness)
//! - `GET /health/ready`: 저장소 연결까지 확인 (readiness)

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 상세 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy" 또는 "degraded"
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
    /// RFC 3339 시각
    pub timestamp: String,
    pub components: ComponentHealth,
}

/// 컴포넌트별 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub database: ComponentStatus,
}

/// 단일 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// "up" | "down" | "not_configured"
    pub status: String,
    /// 점검 소요 시간 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl ComponentStatus {
    fn checked(up: bool, started: Instant) -> Self {
        Self {
            status: if up { "up" } else { "down" }.to_string(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        }
    }

    fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            latency_ms: None,
        }
    }

    fn is_down(&self) -> bool {
        self.status == "down"
    }
}

/// Liveness 체크.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "서버 응답 가능", body = String)),
    tag = "health"
)]
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness 체크.
///
/// 저장소가 설정되지 않은 경우는 정상(200)으로 보고합니다. 설정되었는데
/// `SELECT 1`이 실패하면 503입니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "정상", body = HealthResponse),
        (status = 503, description = "저장소 연결 실패", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = if state.db.is_configured() {
        let started = Instant::now();
        let up = state.is_db_healthy().await;
        ComponentStatus::checked(up, started)
    } else {
        ComponentStatus::not_configured()
    };

    let (status, code) = if database.is_down() {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    } else {
        ("healthy", StatusCode::OK)
    };

    let body = HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth { database },
    };

    (code, Json(body))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
