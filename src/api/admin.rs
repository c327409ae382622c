use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::professional::{ApprovalStatus, Professional};
use crate::db::models::requests::{RequestOverview, StatusCount};
use crate::db::models::user::Principal;
use crate::utils::api_response::{ApiResponse, ApiResult};
use crate::workflow::approval;
use crate::workflow::reports::{self, AdminDashboard, RequestSearch, RequestSearchField};

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Services, professionals and requests", body = AdminDashboard),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<AdminDashboard> {
    let dashboard = reports::admin_dashboard(&state.pool, &principal).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Dashboard retrieved", dashboard))
}

/// Approve a pending or blocked professional
#[utoipa::path(
    post,
    path = "/admin/professionals/{professional_id}/approve",
    tag = "Admin",
    params(
        ("professional_id" = i64, Path, description = "Professional to approve")
    ),
    responses(
        (status = 200, description = "Professional approved successfully", body = Professional),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Professional not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn approve_professional(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(professional_id): Path<i64>,
) -> ApiResult<Professional> {
    let professional =
        approval::approve_professional(&state.pool, &principal, professional_id).await?;
    state.approval_cache.invalidate(&professional_id);
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Professional approved successfully",
        professional,
    ))
}

/// Reject a professional
///
/// Deletes the account, every request that references it and the stored
/// résumé.
#[utoipa::path(
    post,
    path = "/admin/professionals/{professional_id}/reject",
    tag = "Admin",
    params(
        ("professional_id" = i64, Path, description = "Professional to remove")
    ),
    responses(
        (status = 200, description = "Professional rejected and deleted successfully", body = Professional),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Professional not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn reject_professional(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(professional_id): Path<i64>,
) -> ApiResult<Professional> {
    let professional = approval::reject_professional(
        &state.pool,
        &principal,
        professional_id,
        &state.config.resume_storage_path,
    )
    .await?;
    state.approval_cache.invalidate(&professional_id);
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Professional rejected and deleted successfully",
        professional,
    ))
}

#[utoipa::path(
    post,
    path = "/admin/professionals/{professional_id}/block",
    tag = "Admin",
    params(
        ("professional_id" = i64, Path, description = "Professional to block")
    ),
    responses(
        (status = 200, description = "Professional blocked successfully", body = Professional),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Professional not found"),
        (status = 409, description = "Pending professionals cannot be blocked")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn block_professional(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(professional_id): Path<i64>,
) -> ApiResult<Professional> {
    let professional =
        approval::block_professional(&state.pool, &principal, professional_id).await?;
    state.approval_cache.invalidate(&professional_id);
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Professional blocked successfully",
        professional,
    ))
}

#[utoipa::path(
    post,
    path = "/admin/professionals/{professional_id}/unblock",
    tag = "Admin",
    params(
        ("professional_id" = i64, Path, description = "Professional to unblock")
    ),
    responses(
        (status = 200, description = "Professional unblocked successfully", body = Professional),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Professional not found"),
        (status = 409, description = "Pending professionals must be approved instead")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn unblock_professional(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(professional_id): Path<i64>,
) -> ApiResult<Professional> {
    let professional =
        approval::unblock_professional(&state.pool, &principal, professional_id).await?;
    state.approval_cache.invalidate(&professional_id);
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Professional unblocked successfully",
        professional,
    ))
}

#[utoipa::path(
    get,
    path = "/admin/summary",
    tag = "Admin",
    responses(
        (status = 200, description = "Counts of all requests per status", body = [StatusCount]),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<StatusCount>> {
    principal.require_admin()?;
    let counts = reports::request_summary(&state.pool, &principal).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Summary retrieved", counts))
}

/// Search requests by service name, request date, professional or customer.
#[utoipa::path(
    get,
    path = "/admin/search",
    tag = "Admin",
    params(RequestSearch),
    responses(
        (status = 200, description = "Matching requests", body = [RequestOverview]),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<RequestSearch>,
) -> ApiResult<Vec<RequestOverview>> {
    let requests = reports::search_requests(&state.pool, &principal, &params).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Search completed", requests))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route(
            "/admin/professionals/{professional_id}/approve",
            post(approve_professional),
        )
        .route(
            "/admin/professionals/{professional_id}/reject",
            post(reject_professional),
        )
        .route(
            "/admin/professionals/{professional_id}/block",
            post(block_professional),
        )
        .route(
            "/admin/professionals/{professional_id}/unblock",
            post(unblock_professional),
        )
        .route("/admin/summary", get(summary))
        .route("/admin/search", get(search))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard, approve_professional, reject_professional,
        block_professional, unblock_professional, summary, search
    ),
    components(
        schemas(AdminDashboard, Professional, ApprovalStatus, RequestOverview, StatusCount, RequestSearchField)
    ),
    tags(
        (name = "Admin", description = "Professional curation and oversight")
    )
)]
pub struct AdminDoc;
