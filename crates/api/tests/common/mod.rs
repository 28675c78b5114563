#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use parkwise_api::auth::jwt::{generate_access_token, JwtConfig};
use parkwise_api::auth::password::hash_password;
use parkwise_api::config::{JobsConfig, ServerConfig};
use parkwise_api::router::build_app_router;
use parkwise_api::state::AppState;
use parkwise_core::roles::{ROLE_ADMIN, ROLE_USER};
use parkwise_db::models::lot::{CreateParkingLot, ParkingLot};
use parkwise_db::models::status::Role;
use parkwise_db::models::user::{CreateUser, User};
use parkwise_db::repositories::{LotRepo, UserRepo};
use parkwise_events::{LogNotifier, Notifier};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 60,
        },
        jobs: JobsConfig::default(),
    }
}

/// Build the full application router over `pool`, logging notifications.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_notifier(pool, Arc::new(LogNotifier))
}

/// Build the full application router with a caller-supplied notifier.
pub fn build_test_app_with_notifier(pool: PgPool, notifier: Arc<dyn Notifier>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            role_id: role.id(),
            fullname: None,
            address: None,
            pincode: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Insert a lot with the given capacity and hourly price.
pub async fn create_lot(pool: &PgPool, name: &str, max_spots: i32, price_per_hour: f64) -> ParkingLot {
    LotRepo::create(
        pool,
        &CreateParkingLot {
            name: name.to_string(),
            address: format!("{name} Road"),
            pincode: "560001".to_string(),
            price_per_hour,
            max_spots,
        },
        None,
    )
    .await
    .expect("lot creation should succeed")
}

/// Bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    let role = if user.role_id == Role::Admin.id() {
        ROLE_ADMIN
    } else {
        ROLE_USER
    };
    generate_access_token(user.id, role, &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
