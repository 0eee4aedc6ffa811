use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: &'static str,
    /// Storage backend in use
    pub storage: &'static str,
    pub version: &'static str,
}

/// Liveness plus storage reachability.
///
/// Returns 503 when the database does not answer a ping.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (storage, reachable) = match &state.database {
        Some(database) => match database.ping().await {
            Ok(()) => ("postgres", true),
            Err(e) => {
                warn!("Health check database ping failed: {}", e);
                ("postgres", false)
            }
        },
        None => ("memory", true),
    };

    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if reachable { "ok" } else { "degraded" },
            storage,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
