/// Health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /health      -> JSON health report
/// GET /v1/status   -> "OK"
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "store": "postgres",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Store backend in use
    pub store: String,

    /// Store connectivity
    pub database: String,
}

/// Health check handler
///
/// Reports `degraded` rather than failing when the store cannot be reached.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let store = state.projects.store();

    let database_status = match store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            "disconnected"
        }
    };

    Ok(Json(HealthResponse {
        status: if database_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.backend().to_string(),
        database: database_status.to_string(),
    }))
}

/// Liveness probe
pub async fn status() -> &'static str {
    "OK"
}
