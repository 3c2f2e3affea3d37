//! Liveness and storage probe

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::DatabaseRepo;

#[derive(Clone)]
pub struct HealthState {
    pub repo: Arc<dyn DatabaseRepo>,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: StorageHealth,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Storage reachable", body = HealthResponse),
        (status = 503, description = "Storage unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let probe_start = Instant::now();
    let (code, status, database) = match state.repo.ping().await {
        Ok(()) => (
            StatusCode::OK,
            "ok",
            StorageHealth {
                status: "ok".into(),
                latency_ms: Some(probe_start.elapsed().as_millis() as u64),
            },
        ),
        Err(e) => {
            warn!("Health probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                StorageHealth {
                    status: "error".into(),
                    latency_ms: None,
                },
            )
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::interfaces::http::testing::TestApp;

    #[tokio::test]
    async fn reports_ok_with_reachable_storage() {
        let app = TestApp::new();
        let resp = app.get("/health", "t").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: HealthResponse = TestApp::json(resp).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.status, "ok");
        assert!(body.database.latency_ms.is_some());
    }
}
