//! HTTP-level tests for the admin surface: lot registry, users, reports and
//! vehicle search.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_lot, create_user, delete_auth, get_auth, post_json_auth,
    put_json_auth, token_for,
};
use parkwise_db::models::status::Role;
use serde_json::json;
use sqlx::PgPool;

fn lot_body(name: &str, max_spots: i32) -> serde_json::Value {
    json!({
        "name": name,
        "address": "12 Station Road",
        "pincode": "560001",
        "price_per_hour": 15.0,
        "max_spots": max_spots,
    })
}

// ---------------------------------------------------------------------------
// Lot registry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_lot(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let app = build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/admin/lots", lot_body("  Central  ", 5), &token_for(&admin)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Central");
    assert_eq!(json["max_spots"], 5);
    assert_eq!(json["created_by"], admin.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn regular_user_cannot_manage_lots(pool: PgPool) {
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let app = build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/admin/lots", lot_body("Central", 5), &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_lot_fields_are_rejected(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let token = token_for(&admin);
    let app = build_test_app(pool);

    let mut negative_price = lot_body("Central", 5);
    negative_price["price_per_hour"] = json!(-1.0);
    let mut zero_spots = lot_body("Central", 5);
    zero_spots["max_spots"] = json!(0);
    let blank_name = lot_body("   ", 5);

    for body in [negative_price, zero_spots, blank_name] {
        let response = post_json_auth(app.clone(), "/api/v1/admin/lots", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shrinking_below_occupied_spot_is_conflict(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let lot = create_lot(&pool, "Central", 5, 10.0).await;
    let app = build_test_app(pool);

    for vehicle in ["AB12", "CD34", "EF56"] {
        post_json_auth(
            app.clone(),
            "/api/v1/bookings",
            json!({ "lot_id": lot.id, "vehicle_no": vehicle }),
            &token_for(&user),
        )
        .await;
    }

    let uri = format!("/api/v1/admin/lots/{}", lot.id);
    let refused = put_json_auth(app.clone(), &uri, json!({ "max_spots": 2 }), &token_for(&admin)).await;
    assert_eq!(refused.status(), StatusCode::CONFLICT);

    let allowed = put_json_auth(
        app,
        &uri,
        json!({ "max_spots": 3, "price_per_hour": 12.5 }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    let json = body_json(allowed).await;
    assert_eq!(json["max_spots"], 3);
    assert_eq!(json["price_per_hour"], 12.5);
    assert_eq!(json["name"], "Central");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lot_with_parked_vehicle_cannot_be_deleted(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let lot = create_lot(&pool, "Central", 2, 10.0).await;
    let app = build_test_app(pool);

    let booked = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/bookings",
            json!({ "lot_id": lot.id, "vehicle_no": "AB12" }),
            &token_for(&user),
        )
        .await,
    )
    .await;

    let uri = format!("/api/v1/admin/lots/{}", lot.id);
    let refused = delete_auth(app.clone(), &uri, &token_for(&admin)).await;
    assert_eq!(refused.status(), StatusCode::CONFLICT);

    common::post_auth(
        app.clone(),
        &format!("/api/v1/bookings/{}/release", booked["id"]),
        &token_for(&user),
    )
    .await;

    let deleted = delete_auth(app.clone(), &uri, &token_for(&admin)).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = get_auth(app.clone(), &format!("/api/v1/lots/{}", lot.id), &token_for(&user)).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    // History of the deleted lot is kept.
    let history = body_json(get_auth(app, "/api/v1/bookings", &token_for(&user)).await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_unknown_lot_is_404(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let app = build_test_app(pool);

    let response = put_json_auth(
        app,
        "/api/v1/admin/lots/999",
        json!({ "name": "Nowhere" }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reports and search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_reports_occupancy_and_revenue(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let central = create_lot(&pool, "Central", 4, 10.0).await;
    create_lot(&pool, "Harbor", 2, 5.0).await;
    let app = build_test_app(pool);

    for vehicle in ["AB12", "CD34"] {
        post_json_auth(
            app.clone(),
            "/api/v1/bookings",
            json!({ "lot_id": central.id, "vehicle_no": vehicle }),
            &token_for(&user),
        )
        .await;
    }

    let summary = body_json(get_auth(app, "/api/v1/admin/summary", &token_for(&admin)).await).await;
    assert_eq!(summary["total_lots"], 2);
    assert_eq!(summary["total_spots"], 6);
    assert_eq!(summary["occupied_spots"], 2);
    assert_eq!(summary["available_spots"], 4);
    assert_eq!(summary["total_users"], 1);
    assert_eq!(summary["hourly_revenue"], 20.0);
    assert_eq!(summary["lots"][0]["occupancy_rate"], 50.0);
    assert_eq!(summary["lots"][1]["hourly_revenue"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn vehicle_search_is_partial_and_case_insensitive(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let lot = create_lot(&pool, "Central", 4, 10.0).await;
    let app = build_test_app(pool);

    for vehicle in ["KA01AB1234", "KA02CD5678", "MH12EF0001"] {
        post_json_auth(
            app.clone(),
            "/api/v1/bookings",
            json!({ "lot_id": lot.id, "vehicle_no": vehicle }),
            &token_for(&user),
        )
        .await;
    }

    let found = body_json(
        get_auth(app.clone(), "/api/v1/admin/search/vehicles?q=ka0", &token_for(&admin)).await,
    )
    .await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["vehicle_no"], "KA02CD5678", "latest first");
    assert_eq!(found[0]["username"], "driver@example.com");

    let missing_query =
        get_auth(app, "/api/v1/admin/search/vehicles", &token_for(&admin)).await;
    assert_eq!(missing_query.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_lists_customers_with_bookings(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", Role::Admin).await;
    let user = create_user(&pool, "driver@example.com", Role::User).await;
    let lot = create_lot(&pool, "Central", 4, 10.0).await;
    let app = build_test_app(pool);

    post_json_auth(
        app.clone(),
        "/api/v1/bookings",
        json!({ "lot_id": lot.id, "vehicle_no": "AB12" }),
        &token_for(&user),
    )
    .await;

    let users = body_json(get_auth(app.clone(), "/api/v1/admin/users", &token_for(&admin)).await).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1, "admins are not listed");
    assert_eq!(users[0]["username"], "driver@example.com");
    assert!(users[0].get("password_hash").is_none());

    let detail = body_json(
        get_auth(app, &format!("/api/v1/admin/users/{}", user.id), &token_for(&admin)).await,
    )
    .await;
    assert_eq!(detail["user"]["role"], "user");
    assert_eq!(detail["bookings"][0]["vehicle_no"], "AB12");
    assert_eq!(detail["bookings"][0]["status"], "Parked");
}
