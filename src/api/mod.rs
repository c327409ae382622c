pub mod admin;
pub mod auth;
pub mod catalog;
pub mod customer;
pub mod health;
pub mod professional;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::middleware::auth::jwt_middleware;

/// Largest accepted request body; sized for résumé uploads.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn openapi() -> utoipa::openapi::OpenApi {
    auth::AuthDoc::openapi()
        .merge_from(catalog::CatalogDoc::openapi())
        .merge_from(customer::CustomerDoc::openapi())
        .merge_from(professional::ProfessionalDoc::openapi())
        .merge_from(admin::AdminDoc::openapi())
}

/// Build the full application: public and JWT-protected routes, API docs and
/// the shared layers.
pub fn router(state: AppState) -> Router {
    let merged_doc = openapi();

    let public_routes = Router::new()
        .merge(auth::auth_routes())
        .merge(catalog::catalog_routes());

    let private_routes = Router::new()
        .merge(catalog::secure_catalog_routes())
        .merge(customer::customer_routes())
        .merge(professional::professional_routes())
        .merge(admin::admin_routes())
        .route_layer(from_fn_with_state(state.clone(), jwt_middleware));

    Router::new()
        .merge(health::health_routes())
        .merge(public_routes)
        .merge(private_routes)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", merged_doc.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/rapidoc.json", merged_doc).path("/rapidoc"))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
