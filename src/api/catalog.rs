use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::service::{NewService, Service, UpdateService};
use crate::db::models::user::Principal;
use crate::utils::api_response::{ApiResponse, ApiResult};
use crate::workflow::catalog;

/// List the service catalog. No authentication required.
#[utoipa::path(
    get,
    path = "/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Catalog retrieved", body = [Service]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<Service>> {
    let services = catalog::list_services(&state.pool).await?;
    Ok(ApiResponse::success(StatusCode::OK, "Services retrieved", services))
}

/// Create a new service
#[utoipa::path(
    post,
    path = "/admin/services",
    tag = "Catalog",
    request_body = NewService,
    responses(
        (status = 201, description = "Service created successfully", body = Service),
        (status = 400, description = "Invalid price, duration or name"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Service already exists")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewService>,
) -> ApiResult<Service> {
    let service = catalog::create_service(&state.pool, &principal, payload).await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Service created successfully",
        service,
    ))
}

/// Update the given fields of a service. Renaming moves its professionals
/// along with it.
#[utoipa::path(
    put,
    path = "/admin/services/{service_id}",
    tag = "Catalog",
    params(
        ("service_id" = i64, Path, description = "Service to update")
    ),
    request_body = UpdateService,
    responses(
        (status = 200, description = "Service updated successfully", body = Service),
        (status = 400, description = "No fields given or invalid values"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Another service already has that name")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(service_id): Path<i64>,
    Json(payload): Json<UpdateService>,
) -> ApiResult<Service> {
    let service = catalog::update_service(&state.pool, &principal, service_id, payload).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Service updated successfully",
        service,
    ))
}

#[utoipa::path(
    delete,
    path = "/admin/services/{service_id}",
    tag = "Catalog",
    params(
        ("service_id" = i64, Path, description = "Service to delete")
    ),
    responses(
        (status = 200, description = "Service deleted successfully"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Professionals or requests still reference the service")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(service_id): Path<i64>,
) -> ApiResult<()> {
    catalog::delete_service(&state.pool, &principal, service_id).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Service deleted successfully",
        (),
    ))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/services", get(list_services))
}

/// Catalog editing; mounted behind the JWT middleware.
pub fn secure_catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/services", post(create_service))
        .route(
            "/admin/services/{service_id}",
            put(update_service).delete(delete_service),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(list_services, create_service, update_service, delete_service),
    components(schemas(Service, NewService, UpdateService)),
    tags(
        (name = "Catalog", description = "Household services on offer")
    )
)]
pub struct CatalogDoc;
