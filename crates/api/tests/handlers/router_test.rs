use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::test_server;

#[tokio::test]
async fn test_health_and_version() {
    let server = test_server();

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(
        health.json::<Value>(),
        json!({ "status": "ok", "notifications": false })
    );

    let version = server.get("/version").await;
    assert_eq!(version.status_code(), StatusCode::OK);
    assert_eq!(version.json::<Value>()["name"], "slotbook-api");
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let server = test_server();
    let id = Uuid::new_v4();

    let profile = server.get("/api/profiles/me").await;
    assert_eq!(profile.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        profile.json::<Value>()["error"],
        "Authentication error: Missing Authorization header"
    );

    let mine = server.get("/api/bookings/mine").await;
    assert_eq!(mine.status_code(), StatusCode::UNAUTHORIZED);

    let review = server
        .post(&format!("/api/admin/shops/{}/review", id))
        .json(&json!({ "decision": "approve" }))
        .await;
    assert_eq!(review.status_code(), StatusCode::UNAUTHORIZED);

    let booking = server
        .post("/api/bookings")
        .json(&json!({
            "shop_id": id,
            "service_ids": [Uuid::new_v4()],
            "appointment_date": "2030-01-07",
            "appointment_time": "10:00"
        }))
        .await;
    assert_eq!(booking.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_authorization_is_rejected() {
    let server = test_server();

    let response = server
        .get("/api/subscription")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_before_storing() {
    let server = test_server();

    let short_password = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "owner@example.com",
            "password": "short",
            "full_name": "Owner",
            "role": "owner"
        }))
        .await;
    assert_eq!(short_password.status_code(), StatusCode::BAD_REQUEST);

    let bad_email = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "not-an-email",
            "password": "long enough password",
            "full_name": "Owner",
            "role": "owner"
        }))
        .await;
    assert_eq!(bad_email.status_code(), StatusCode::BAD_REQUEST);

    let admin = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "root@example.com",
            "password": "long enough password",
            "full_name": "Root",
            "role": "super_admin"
        }))
        .await;
    assert_eq!(admin.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_slots_reject_malformed_dates() {
    let server = test_server();

    let response = server
        .get(&format!("/api/shops/{}/slots", Uuid::new_v4()))
        .add_query_param("date", "2030-13-01")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shop_ids_must_be_uuids() {
    let server = test_server();

    let response = server.get("/api/shops/not-a-uuid").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = test_server();

    let response = server.get("/api/appointments").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
