use crate::model::{HealthChecks, HealthResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// `GET /healthz`. 200 when both the store and the cache answer, 503
/// otherwise; the body names the failing component.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let report = state.shortener.health().await;
    let healthy = report.storage_ok && report.cache_ok;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            checks: HealthChecks {
                storage: report.storage_ok,
                cache: report.cache_ok,
            },
        }),
    )
}
