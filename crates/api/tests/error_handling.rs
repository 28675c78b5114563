//! Error response shape: every failure is `{"error": ..., "code": ...}`
//! with a matching status.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, create_lot, create_user, post_json_auth, token_for};
use parkwise_db::models::status::Role;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn not_found_has_error_and_code(pool: PgPool) {
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let app = build_test_app(pool);

    let response = common::post_auth(app, "/api/v1/bookings/77/release", &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Booking with id 77 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_vehicle_number_is_validation_error(pool: PgPool) {
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let lot = create_lot(&pool, "Central", 2, 1.0).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/bookings",
        json!({ "lot_id": lot.id, "vehicle_no": "   " }),
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let app = build_test_app(pool);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/bookings")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", token_for(&user)))
        .body(Body::from("{\"lot_id\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_token_is_unauthorized(pool: PgPool) {
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let app = build_test_app(pool);

    let mut jwt = common::test_config().jwt;
    jwt.access_token_expiry_mins = -10;
    let token =
        parkwise_api::auth::jwt::generate_access_token(user.id, "user", &jwt).unwrap();

    let response = common::get_auth(app, "/api/v1/bookings", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
