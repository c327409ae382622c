use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use crate::app_state::AppState;

/// Defines health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health/live", get(liveness_check))  // ✅ Liveness check
        .route("/health/ready", get(readiness_check)) // ✅ Readiness check
}

/// **Liveness Check (Basic Check)**
/// - ✅ Verifies that the API is running
/// - ❌ Does NOT check the database
async fn liveness_check() -> Json<serde_json::Value> {
    Json(json!({ "success": true, "message": "API is live" }))
}

/// **Readiness Check (Database Connectivity Check)**
/// - ✅ Ensures the database answers and the schema is migrated
/// - ❌ Returns `503` otherwise
async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    sqlx::query("SELECT 1 FROM services LIMIT 1")
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "error": "Database unavailable", "details": e.to_string() })),
            )
        })?;

    Ok(Json(json!({ "success": true, "message": "API is ready" })))
}
