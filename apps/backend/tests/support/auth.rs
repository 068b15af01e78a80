//! HTTP-level account helpers shared by integration tests.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use blog_backend::auth::permissions::Permission;
use blog_backend::repos::users::grant_permission;

/// Register an account and return the created user's id.
pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    username: &str,
    email: &str,
    password: &str,
) -> i64 {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");

    let body: Value = test::read_body_json(resp).await;
    body["id"].as_i64().expect("user id in register response")
}

/// Log in and return the access token.
pub async fn login_token(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    username: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "login should succeed");

    let body: Value = test::read_body_json(resp).await;
    body["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Register, optionally grant extra permissions, and return (user_id, token).
pub async fn seeded_account(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    db: &DatabaseConnection,
    username: &str,
    extra_permissions: &[Permission],
) -> (i64, String) {
    let email = format!("{username}@example.com");
    let user_id = register(app, username, &email, "password123").await;

    for permission in extra_permissions {
        grant_permission(db, user_id, *permission)
            .await
            .expect("grant permission");
    }

    let token = login_token(app, username, "password123").await;
    (user_id, token)
}

/// Bearer header tuple for `TestRequest::insert_header`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
