mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use household_services::api;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{state, ADMIN_PASSWORD, PASSWORD};

const BOUNDARY: &str = "----household-services-test";

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("valid request")
}

fn registration_form(username: &str, trade: &str, resume_name: &str) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in [
        ("username", username),
        ("password", PASSWORD),
        ("first_name", "Pat"),
        ("description", "Fixes leaks"),
        ("service_type", trade),
        ("experience_years", "7"),
        ("contact", "9000000000"),
        ("pin_code", "560003"),
    ] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{resume_name}\"\r\n\
         Content-Type: application/pdf\r\n\r\n%PDF-1.4 test\r\n--{BOUNDARY}--\r\n"
    ));

    Request::builder()
        .method(Method::POST)
        .uri("/auth/professional/register")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("valid request")
}

async fn login(app: &Router, role: &str, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            &format!("/auth/{role}/login"),
            None,
            json!({ "username": username, "password": password }),
        ),
    )
    .await
}

async fn token(app: &Router, role: &str, username: &str, password: &str) -> String {
    let (status, body) = login(app, role, username, password).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"]
        .as_str()
        .expect("token in response")
        .to_string()
}

/// Admin with one service, an approved plumber and a registered customer.
async fn marketplace() -> (Router, String, i64, i64) {
    let app = api::router(state().await);
    let admin = token(&app, "admin", "admin", ADMIN_PASSWORD).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/admin/services",
            Some(&admin),
            json!({ "name": "Plumbing", "price": 400, "duration_minutes": 45, "description": "Pipes" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let service_id = body["data"]["id"].as_i64().expect("service id");

    let (status, body) = send(&app, registration_form("pat", "Plumbing", "cv.pdf")).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["approval_status"], "Pending");
    let professional_id = body["data"]["id"].as_i64().expect("professional id");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/admin/professionals/{professional_id}/approve"),
            Some(&admin),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/auth/customer/register",
            None,
            json!({
                "username": "carol",
                "password": PASSWORD,
                "first_name": "Carol",
                "address": "1 Main Road",
                "pin_code": "560001",
                "contact": "9111111111"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    (app, admin, service_id, professional_id)
}

#[tokio::test]
async fn health_and_catalog_are_public() {
    let app = api::router(state().await);

    let (status, _) = send(&app, get("/health/live", None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, get("/health/ready", None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, get("/services", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn request_flow_over_http() {
    let (app, admin, service_id, _) = marketplace().await;
    let carol = token(&app, "customer", "carol", PASSWORD).await;
    let pat = token(&app, "professional", "pat", PASSWORD).await;

    let create = || {
        json_request(
            Method::POST,
            "/customer/requests",
            Some(&carol),
            json!({ "service_id": service_id }),
        )
    };
    let (status, body) = send(&app, create()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let request_id = body["data"]["id"].as_i64().expect("request id");
    let (status, _) = send(&app, create()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, get("/professional/dashboard", Some(&pat))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["public_requests"][0]["id"], request_id);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/professional/requests/{request_id}/accept"),
            Some(&pat),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Accepted");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/customer/requests/{request_id}/close"),
            Some(&carol),
            json!({ "rating": 9 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/customer/requests/{request_id}/close"),
            Some(&carol),
            json!({ "rating": 4, "remarks": "quick and clean" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Closed");

    let (status, body) = send(&app, get("/customer/summary", Some(&carol))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "status": "Requested", "count": 0 },
            { "status": "Accepted", "count": 0 },
            { "status": "Closed", "count": 1 }
        ])
    );

    let (status, body) = send(
        &app,
        get("/customer/search?by=rating&term=4", Some(&carol)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["username"], "pat");

    let (status, body) = send(
        &app,
        get("/admin/search?by=customer_name&term=car", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["customer_username"], "carol");
}

#[tokio::test]
async fn protected_routes_check_token_and_role() {
    let (app, _, service_id, _) = marketplace().await;
    let carol = token(&app, "customer", "carol", PASSWORD).await;

    let (status, _) = send(&app, get("/customer/dashboard", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, get("/customer/dashboard", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/admin/dashboard", Some(&carol))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/admin/services/{service_id}"),
            Some(&carol),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = login(&app, "customer", "carol", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn blocked_professionals_are_locked_out() {
    let (app, admin, _, professional_id) = marketplace().await;
    let pat = token(&app, "professional", "pat", PASSWORD).await;

    let (status, _) = send(&app, get("/professional/dashboard", Some(&pat))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/admin/professionals/{professional_id}/block"),
            Some(&admin),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["approval_status"], "Blocked");

    let (status, _) = send(&app, get("/professional/dashboard", Some(&pat))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = login(&app, "professional", "pat", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Your account is blocked, please contact administrator"
    );
}

#[tokio::test]
async fn professional_registration_requires_a_pdf() {
    let (app, _, _, _) = marketplace().await;

    let (status, body) = send(&app, registration_form("sam", "Plumbing", "cv.docx")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let (status, _) = send(&app, registration_form("sam", "Roofing", "cv.pdf")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, registration_form("pat", "Plumbing", "cv.pdf")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
