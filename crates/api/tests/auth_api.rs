//! HTTP-level tests for registration, login, profile and password change.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_user, get, get_auth, post_json, put_json_auth, token_for,
    TEST_PASSWORD,
};
use parkwise_api::bootstrap::{ensure_admin, AdminSeed};
use parkwise_db::models::status::Role;
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_then_login(pool: PgPool) {
    let app = build_test_app(pool);

    let registered = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({
            "username": "Asha@Example.com",
            "password": "secret99",
            "fullname": "Asha Rao",
            "pincode": "560001",
        }),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);
    let user = body_json(registered).await;
    assert_eq!(user["username"], "asha@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let response = login(app.clone(), "asha@example.com", "secret99").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["token_type"], "Bearer");
    assert!(json["access_token"].is_string());
    assert!(json["expires_in"].is_number());

    let token = json["access_token"].as_str().unwrap();
    let me = body_json(get_auth(app, "/api/v1/auth/me", token).await).await;
    assert_eq!(me["fullname"], "Asha Rao");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_registration_is_conflict(pool: PgPool) {
    create_user(&pool, "taken@example.com", Role::User).await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": "taken@example.com", "password": "secret99" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_validates_input(pool: PgPool) {
    let app = build_test_app(pool);

    let bad_email = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "not-an-email", "password": "secret99" }),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let short_password = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": "short@example.com", "password": "abc" }),
    )
    .await;
    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_user_are_unauthorized(pool: PgPool) {
    create_user(&pool, "driver@example.com", Role::User).await;
    let app = build_test_app(pool);

    let wrong = login(app.clone(), "driver@example.com", "nope-nope").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ghost = login(app, "ghost@example.com", TEST_PASSWORD).await;
    assert_eq!(ghost.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_reject_missing_or_bad_tokens(pool: PgPool) {
    let app = build_test_app(pool);

    let missing = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_auth(app, "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(garbage).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_and_password_change(pool: PgPool) {
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let token = token_for(&user);
    let app = build_test_app(pool);

    let updated = put_json_auth(
        app.clone(),
        "/api/v1/user/profile",
        json!({ "fullname": "  Dev Driver ", "address": "4 Lake View" }),
        &token,
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let profile = body_json(updated).await;
    assert_eq!(profile["fullname"], "Dev Driver");
    assert_eq!(profile["address"], "4 Lake View");

    let mismatch = put_json_auth(
        app.clone(),
        "/api/v1/user/password",
        json!({
            "current_password": TEST_PASSWORD,
            "new_password": "brand-new-1",
            "confirm_password": "brand-new-2",
        }),
        &token,
    )
    .await;
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

    let wrong_current = put_json_auth(
        app.clone(),
        "/api/v1/user/password",
        json!({
            "current_password": "guess",
            "new_password": "brand-new-1",
            "confirm_password": "brand-new-1",
        }),
        &token,
    )
    .await;
    assert_eq!(wrong_current.status(), StatusCode::UNAUTHORIZED);

    let changed = put_json_auth(
        app.clone(),
        "/api/v1/user/password",
        json!({
            "current_password": TEST_PASSWORD,
            "new_password": "brand-new-1",
            "confirm_password": "brand-new-1",
        }),
        &token,
    )
    .await;
    assert_eq!(changed.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        login(app.clone(), "driver@example.com", TEST_PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(app, "driver@example.com", "brand-new-1").await.status(),
        StatusCode::OK
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_bootstrap_is_idempotent(pool: PgPool) {
    let seed = AdminSeed {
        username: "root@example.com".to_string(),
        password: "admin-pass".to_string(),
    };

    let first = ensure_admin(&pool, &seed).await.unwrap();
    let second = ensure_admin(&pool, &seed).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.role_id, Role::Admin.id());

    let app = build_test_app(pool);
    let response = login(app, "root@example.com", "admin-pass").await;
    let json = body_json(response).await;
    assert_eq!(json["user"]["role"], "admin");
}
