use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use moka::sync::Cache;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::api::auth::Claims;
use crate::app_state::AppState;
use crate::db::models::professional::ApprovalStatus;
use crate::db::models::user::Principal;
use crate::db::queries::professional;
use crate::utils::api_response::ApiResponse;

/// Professional id -> approval status, so every request does not hit the
/// database. Curation handlers invalidate the entry they change.
pub type ApprovalCache = Arc<Cache<i64, ApprovalStatus>>;

pub fn create_approval_cache(ttl: Duration) -> ApprovalCache {
    Arc::new(Cache::builder().time_to_live(ttl).max_capacity(10_000).build())
}

/// ✅ **JWT Middleware**
///
/// Decodes the bearer token into a [`Principal`] and stores it in the request
/// extensions. Professionals must still be approved; a block takes effect
/// once the cached status expires or is invalidated.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = req.headers().get("Authorization").ok_or_else(|| {
        error!("Missing Authorization header");
        unauthorized("Missing Authorization header")
    })?;

    let token_str = auth_header.to_str().map_err(|_| {
        error!("Invalid Authorization header format");
        unauthorized("Invalid Authorization header format")
    })?;

    let token = token_str.strip_prefix("Bearer ").ok_or_else(|| {
        error!("Invalid token format (missing 'Bearer ' prefix)");
        unauthorized("Invalid token format (missing 'Bearer ' prefix)")
    })?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        error!("JWT decoding failed: {:?}", e);
        ApiResponse::<()>::error(
            StatusCode::UNAUTHORIZED,
            "Invalid token",
            Some(json!({ "error": e.to_string() })),
        )
        .into_response()
    })?;

    let principal = token_data.claims.principal().map_err(|e| {
        error!("Malformed token claims: {e}");
        unauthorized("Invalid token")
    })?;

    if let Principal::Professional { id, username } = &principal {
        match cached_approval_status(&state, *id).await? {
            Some(ApprovalStatus::Approved) => {}
            Some(status) => {
                warn!("🔒 Rejected token for {username}: account is {status:?}");
                return Err(ApiResponse::<()>::error(
                    StatusCode::FORBIDDEN,
                    "Your account is not approved",
                    None,
                )
                .into_response());
            }
            None => return Err(unauthorized("Account no longer exists")),
        }
    }

    debug!("Authenticated {} as {:?}", principal.username(), principal.role());
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

async fn cached_approval_status(
    state: &AppState,
    professional_id: i64,
) -> Result<Option<ApprovalStatus>, Response> {
    if let Some(status) = state.approval_cache.get(&professional_id) {
        return Ok(Some(status));
    }

    let status = professional::approval_status(&state.pool, professional_id)
        .await
        .map_err(|err| {
            error!("Database query failed: {:?}", err);
            ApiResponse::<()>::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load account status",
                Some(json!({ "error": err.to_string() })),
            )
            .into_response()
        })?;

    if let Some(status) = status {
        state.approval_cache.insert(professional_id, status);
    }
    Ok(status)
}

fn unauthorized(message: &str) -> Response {
    ApiResponse::<()>::error(StatusCode::UNAUTHORIZED, message, None).into_response()
}
