use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::openapi::Components;
use utoipa::{Modify, OpenApi, ToSchema};

use crate::app_state::AppState;
use crate::config::Config;
use crate::db::models::customer::{Customer, NewCustomer};
use crate::db::models::professional::{NewProfessional, Professional};
use crate::db::models::user::{Principal, Role, UserInfo};
use crate::error::ServiceError;
use crate::utils::api_response::{ApiResponse, ApiResult};
use crate::workflow::accounts::{self, ResumeUpload};

/// JWT Claims used for authentication.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject - account id, or the admin username
    pub sub: String,
    /// The username of the authenticated user.
    pub username: String,
    /// Which account table `sub` refers to
    pub role: Role,
    /// Expiration timestamp (UNIX TIME)
    pub exp: usize,
}

impl Claims {
    pub fn for_principal(principal: &Principal, ttl_secs: i64) -> Self {
        let sub = match principal {
            Principal::Customer { id, .. } | Principal::Professional { id, .. } => id.to_string(),
            Principal::Admin { username } => username.clone(),
        };
        Claims {
            sub,
            username: principal.username().to_string(),
            role: principal.role(),
            exp: (chrono::Utc::now().timestamp() + ttl_secs).max(0) as usize,
        }
    }

    /// Rebuild the caller from a decoded token.
    pub fn principal(&self) -> Result<Principal, ServiceError> {
        let id = || {
            self.sub
                .parse::<i64>()
                .map_err(|_| ServiceError::unauthorized("Invalid user ID format in token"))
        };
        let username = self.username.clone();
        Ok(match self.role {
            Role::Customer => Principal::Customer { id: id()?, username },
            Role::Professional => Principal::Professional { id: id()?, username },
            Role::Admin => Principal::Admin { username },
        })
    }
}

pub fn issue_token(principal: &Principal, config: &Config) -> Result<LoginResponse, ServiceError> {
    let claims = Claims::for_principal(principal, config.token_ttl_secs);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(LoginResponse {
        token,
        role: principal.role(),
        user: UserInfo::from(principal),
    })
}

/// Represents a request to log in
#[derive(Serialize, Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Represents a successful login response returning a jwt token.
#[derive(Serialize, Debug, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user: UserInfo,
}

/// Multipart form accepted by `/auth/professional/register`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProfessionalRegistrationForm {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub description: String,
    /// Name of the catalog service the professional offers
    pub service_type: String,
    pub experience_years: i64,
    pub contact: String,
    pub pin_code: String,
    /// PDF résumé
    #[schema(value_type = String, format = Binary)]
    pub resume: Vec<u8>,
}

/// Wrong credentials are a 401 at login, unlike a 403 for a forbidden action.
fn login_failed(err: ServiceError) -> ApiResponse<()> {
    match err {
        ServiceError::Unauthorized(message) => {
            ApiResponse::error(StatusCode::UNAUTHORIZED, message, None)
        }
        other => other.into(),
    }
}

/// Handles customer login
///
/// # Returns
/// * `200 OK` - Returns a JWT token if authentication is successful.
/// * `401 Unauthorized` - If credentials are incorrect.
#[utoipa::path(
    post,
    path = "/auth/customer/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn customer_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let principal =
        accounts::authenticate_customer(&state.pool, &payload.username, &payload.password)
            .await
            .map_err(login_failed)?;
    let response = issue_token(&principal, &state.config)?;
    info!("✅ Login successful for customer: {}", payload.username);
    Ok(ApiResponse::success(StatusCode::OK, "Login successful", response))
}

/// Handles professional login
///
/// Pending and blocked accounts are refused with a message saying which.
#[utoipa::path(
    post,
    path = "/auth/professional/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid credentials, or account pending or blocked"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn professional_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let principal =
        accounts::authenticate_professional(&state.pool, &payload.username, &payload.password)
            .await
            .map_err(login_failed)?;
    let response = issue_token(&principal, &state.config)?;
    info!("✅ Login successful for professional: {}", payload.username);
    Ok(ApiResponse::success(StatusCode::OK, "Login successful", response))
}

#[utoipa::path(
    post,
    path = "/auth/admin/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let principal = accounts::authenticate_admin(&state.config, &payload.username, &payload.password)
        .map_err(login_failed)?;
    let response = issue_token(&principal, &state.config)?;
    info!("✅ Admin login: {}", payload.username);
    Ok(ApiResponse::success(StatusCode::OK, "Login successful", response))
}

/// Handles customer registration.
///
/// # Returns
/// * `201 Created` - If registration is successful.
/// * `409 Conflict` - If the username is already taken
#[utoipa::path(
    post,
    path = "/auth/customer/register",
    tag = "Authentication",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Account created", body = Customer),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn register_customer(
    State(state): State<AppState>,
    Json(payload): Json<NewCustomer>,
) -> ApiResult<Customer> {
    let customer = accounts::register_customer(&state.pool, state.config.bcrypt_cost, payload).await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Account created successfully",
        customer,
    ))
}

/// Handles professional registration. The account starts out pending until
/// an admin approves it.
#[utoipa::path(
    post,
    path = "/auth/professional/register",
    tag = "Authentication",
    request_body(content = ProfessionalRegistrationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Account created, pending approval", body = Professional),
        (status = 400, description = "Missing field or résumé is not a PDF"),
        (status = 404, description = "Unknown service type"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn register_professional(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Professional> {
    let (new, resume) = read_registration_form(multipart).await?;
    let professional = accounts::register_professional(
        &state.pool,
        state.config.bcrypt_cost,
        &state.config.resume_storage_path,
        new,
        resume,
    )
    .await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Account created successfully, awaiting approval",
        professional,
    ))
}

async fn read_registration_form(
    mut multipart: Multipart,
) -> Result<(NewProfessional, ResumeUpload), ApiResponse<()>> {
    let bad_form = |e: axum::extract::multipart::MultipartError| {
        ApiResponse::<()>::error(
            StatusCode::BAD_REQUEST,
            "Invalid registration form",
            Some(json!({ "error": e.to_string() })),
        )
    };

    let mut new = NewProfessional::default();
    let mut resume = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(bad_form)?;
            resume = Some(ResumeUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(bad_form)?;
        match name.as_str() {
            "username" => new.username = value,
            "password" => new.password = value,
            "first_name" => new.first_name = value,
            "last_name" => new.last_name = Some(value).filter(|v| !v.is_empty()),
            "description" => new.description = value,
            "service_type" => new.service_type = value,
            "experience_years" => {
                new.experience_years = value.trim().parse().map_err(|_| {
                    ApiResponse::<()>::error(
                        StatusCode::BAD_REQUEST,
                        "experience_years must be a whole number",
                        None,
                    )
                })?
            }
            "contact" => new.contact = value,
            "pin_code" => new.pin_code = value,
            _ => {}
        }
    }

    let resume = resume.ok_or_else(|| {
        ApiResponse::<()>::error(StatusCode::BAD_REQUEST, "A PDF résumé is required", None)
    })?;
    Ok((new, resume))
}

/// Registers the public authentication routes for the API.
///
/// # Routes
/// - `POST /auth/{customer,professional,admin}/login` → Authenticate and return a JWT token.
/// - `POST /auth/customer/register` → Register a customer.
/// - `POST /auth/professional/register` → Register a professional (multipart).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/customer/login", post(customer_login))
        .route("/auth/professional/login", post(professional_login))
        .route("/auth/admin/login", post(admin_login))
        .route("/auth/customer/register", post(register_customer))
        .route("/auth/professional/register", post(register_professional))
}

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.clone().unwrap_or(Components::default());

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );

        openapi.components = Some(components);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        customer_login, professional_login, admin_login,
        register_customer, register_professional
    ),
    components(
        schemas(
            LoginRequest, LoginResponse, UserInfo, Role,
            NewCustomer, Customer, Professional, ProfessionalRegistrationForm
        )
    ),
    tags(
        (name = "Authentication", description = "Login and registration for every role")
    ),
    modifiers(&SecurityAddon)
)]
pub struct AuthDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip_to_principal() {
        let professional = Principal::Professional {
            id: 12,
            username: "pat".to_string(),
        };
        let claims = Claims::for_principal(&professional, 60);
        assert_eq!(claims.sub, "12");
        assert_eq!(claims.principal().ok(), Some(professional));

        let admin = Principal::Admin {
            username: "root".to_string(),
        };
        assert_eq!(Claims::for_principal(&admin, 60).principal().ok(), Some(admin));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "abc".to_string(),
            username: "carol".to_string(),
            role: Role::Customer,
            exp: 0,
        };
        assert!(matches!(claims.principal(), Err(ServiceError::Unauthorized(_))));
    }
}
