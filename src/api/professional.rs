use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::requests::{ServiceRequest, StatusCount};
use crate::db::models::user::Principal;
use crate::utils::api_response::{ApiResponse, ApiResult};
use crate::workflow::reports::{self, ProfessionalDashboard};
use crate::workflow::requests;

#[utoipa::path(
    get,
    path = "/professional/dashboard",
    tag = "Professional",
    responses(
        (status = 200, description = "Open public requests in the trade and the professional's own requests", body = ProfessionalDashboard),
        (status = 403, description = "Professional access required")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<ProfessionalDashboard> {
    let dashboard = reports::professional_dashboard(&state.pool, &principal).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Dashboard retrieved", dashboard))
}

/// Accept a request
///
/// Accepting a public request claims it. When several professionals accept
/// the same request only the first succeeds; the rest get `409`.
#[utoipa::path(
    post,
    path = "/professional/requests/{request_id}/accept",
    tag = "Professional",
    params(
        ("request_id" = i64, Path, description = "Request to accept")
    ),
    responses(
        (status = 200, description = "Request accepted successfully", body = ServiceRequest),
        (status = 403, description = "Request is outside the professional's trade or assigned elsewhere"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer open")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
) -> ApiResult<ServiceRequest> {
    let request = requests::accept_request(&state.pool, &principal, request_id).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Request accepted successfully",
        request,
    ))
}

#[utoipa::path(
    post,
    path = "/professional/requests/{request_id}/reject",
    tag = "Professional",
    params(
        ("request_id" = i64, Path, description = "Request to reject")
    ),
    responses(
        (status = 200, description = "Request rejected successfully", body = ServiceRequest),
        (status = 403, description = "Request is outside the professional's trade or assigned elsewhere"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer open")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn reject_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
) -> ApiResult<ServiceRequest> {
    let request = requests::reject_request(&state.pool, &principal, request_id).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Request rejected successfully",
        request,
    ))
}

#[utoipa::path(
    get,
    path = "/professional/summary",
    tag = "Professional",
    responses(
        (status = 200, description = "Counts of the professional's requests per status", body = [StatusCount])
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<StatusCount>> {
    principal.professional_id()?;
    let counts = reports::request_summary(&state.pool, &principal).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Summary retrieved", counts))
}

pub fn professional_routes() -> Router<AppState> {
    Router::new()
        .route("/professional/dashboard", get(dashboard))
        .route("/professional/requests/{request_id}/accept", post(accept_request))
        .route("/professional/requests/{request_id}/reject", post(reject_request))
        .route("/professional/summary", get(summary))
}

#[derive(OpenApi)]
#[openapi(
    paths(dashboard, accept_request, reject_request, summary),
    components(schemas(ProfessionalDashboard, ServiceRequest, StatusCount)),
    tags(
        (name = "Professional", description = "Answering service requests")
    )
)]
pub struct ProfessionalDoc;
