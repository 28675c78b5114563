//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["notifier"], "log");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID string");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_returns_correct_headers(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/lots")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:5173"
    );
}
