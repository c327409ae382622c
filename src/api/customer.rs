use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::professional::Professional;
use crate::db::models::requests::{
    CloseServiceRequest, NewServiceRequest, RequestEdit, RequestOverview, ServiceRequest,
    StatusCount,
};
use crate::db::models::user::Principal;
use crate::utils::api_response::{ApiResponse, ApiResult};
use crate::workflow::catalog::{self, ServiceOffer};
use crate::workflow::reports::{
    self, CustomerDashboard, ProfessionalSearch, ProfessionalSearchField,
};
use crate::workflow::requests;

/// Catalog plus the customer's own requests.
#[utoipa::path(
    get,
    path = "/customer/dashboard",
    tag = "Customer",
    responses(
        (status = 200, description = "Dashboard retrieved", body = CustomerDashboard),
        (status = 403, description = "Customer access required")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<CustomerDashboard> {
    let dashboard = reports::customer_dashboard(&state.pool, &principal).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Dashboard retrieved", dashboard))
}

/// A service with the approved professionals who offer it, best rated first.
#[utoipa::path(
    get,
    path = "/customer/services/{service_id}",
    tag = "Customer",
    params(
        ("service_id" = i64, Path, description = "Service to view")
    ),
    responses(
        (status = 200, description = "Service retrieved", body = ServiceOffer),
        (status = 404, description = "Service not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn view_service(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(service_id): Path<i64>,
) -> ApiResult<ServiceOffer> {
    principal.customer_id()?;
    let offer = catalog::professionals_for_service(&state.pool, service_id).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Service retrieved", offer))
}

/// Create a service request
///
/// Without `professional_id` the request is public and any approved
/// professional of the trade may accept it.
#[utoipa::path(
    post,
    path = "/customer/requests",
    tag = "Customer",
    request_body = NewServiceRequest,
    responses(
        (status = 201, description = "Request created successfully", body = ServiceRequest),
        (status = 400, description = "Professional does not offer this service"),
        (status = 404, description = "Service or professional not found"),
        (status = 409, description = "An open request already exists, or the professional is not approved")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewServiceRequest>,
) -> ApiResult<ServiceRequest> {
    let request = match payload.professional_id {
        None => requests::create_public_request(&state.pool, &principal, payload.service_id).await?,
        Some(professional_id) => {
            requests::create_private_request(
                &state.pool,
                &principal,
                payload.service_id,
                professional_id,
            )
            .await?
        }
    };
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Request created successfully",
        request,
    ))
}

/// Reschedule an open request, or change the remarks of a closed one.
#[utoipa::path(
    patch,
    path = "/customer/requests/{request_id}",
    tag = "Customer",
    params(
        ("request_id" = i64, Path, description = "Request to edit")
    ),
    request_body = RequestEdit,
    responses(
        (status = 200, description = "Request edited successfully", body = ServiceRequest),
        (status = 403, description = "Request belongs to another customer"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Edit not allowed in the request's status")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn edit_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
    Json(payload): Json<RequestEdit>,
) -> ApiResult<ServiceRequest> {
    let request = requests::edit_request(&state.pool, &principal, request_id, payload).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Request edited successfully",
        request,
    ))
}

#[utoipa::path(
    delete,
    path = "/customer/requests/{request_id}",
    tag = "Customer",
    params(
        ("request_id" = i64, Path, description = "Request to delete")
    ),
    responses(
        (status = 200, description = "Request deleted successfully"),
        (status = 403, description = "Request belongs to another customer"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Accepted and closed requests are kept")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
) -> ApiResult<()> {
    requests::delete_request(&state.pool, &principal, request_id).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Request deleted successfully",
        (),
    ))
}

/// Close an accepted request and rate the professional (1 to 5).
#[utoipa::path(
    post,
    path = "/customer/requests/{request_id}/close",
    tag = "Customer",
    params(
        ("request_id" = i64, Path, description = "Request to close")
    ),
    request_body = CloseServiceRequest,
    responses(
        (status = 200, description = "Request closed successfully", body = ServiceRequest),
        (status = 400, description = "Rating out of range"),
        (status = 403, description = "Request belongs to another customer"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is not accepted")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn close_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<i64>,
    Json(payload): Json<CloseServiceRequest>,
) -> ApiResult<ServiceRequest> {
    let request = requests::close_request(
        &state.pool,
        &principal,
        request_id,
        payload.rating,
        payload.remarks,
    )
    .await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Request closed successfully",
        request,
    ))
}

#[utoipa::path(
    get,
    path = "/customer/summary",
    tag = "Customer",
    responses(
        (status = 200, description = "Requested, accepted and closed counts", body = [StatusCount])
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<StatusCount>> {
    principal.customer_id()?;
    let counts = reports::request_summary(&state.pool, &principal).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Summary retrieved", counts))
}

/// Search approved professionals by service, pin code, username or minimum
/// rating.
#[utoipa::path(
    get,
    path = "/customer/search",
    tag = "Customer",
    params(ProfessionalSearch),
    responses(
        (status = 200, description = "Matching professionals", body = [Professional]),
        (status = 400, description = "Rating term is not a number")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ProfessionalSearch>,
) -> ApiResult<Vec<Professional>> {
    let professionals = reports::search_professionals(&state.pool, &principal, &params).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Search completed",
        professionals,
    ))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customer/dashboard", get(dashboard))
        .route("/customer/services/{service_id}", get(view_service))
        .route("/customer/requests", post(create_request))
        .route(
            "/customer/requests/{request_id}",
            patch(edit_request).delete(delete_request),
        )
        .route("/customer/requests/{request_id}/close", post(close_request))
        .route("/customer/summary", get(summary))
        .route("/customer/search", get(search))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard, view_service, create_request, edit_request,
        delete_request, close_request, summary, search
    ),
    components(
        schemas(
            CustomerDashboard, ServiceOffer, NewServiceRequest, ServiceRequest,
            RequestEdit, CloseServiceRequest, RequestOverview, StatusCount,
            ProfessionalSearchField
        )
    ),
    tags(
        (name = "Customer", description = "Requesting, rating and searching")
    )
)]
pub struct CustomerDoc;
