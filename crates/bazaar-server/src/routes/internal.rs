//! Internal routes for health checks.

use crate::{
    db::{check_health, check_migrations},
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::time::Duration;
use tracing::warn;

/// Create the internal routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn liveness() -> impl IntoResponse {
    Json(json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Ready once the database answers and no migration is pending.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let db = check_health(&state.db, Duration::from_secs(2)).await;
    let pending = match check_migrations(&state.db).await {
        Ok(pending) => pending,
        Err(err) => {
            warn!(error = %err, "Could not inspect migrations");
            vec!["unknown".to_string()]
        }
    };

    let ready = db.is_healthy && pending.is_empty();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": db,
                "pending_migrations": pending,
            }
        })),
    )
}
