//! End-to-end tests through the router against an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use club_api::auth::JwtManager;
use club_api::{create_router, AppState};
use cue_core::RateTable;
use cue_db::{Database, DbConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let jwt = JwtManager::new("integration-test-secret".to_string(), 3600);
    create_router(Arc::new(AppState::new(db, RateTable::default(), jwt)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers `frontdesk` and returns a bearer token for it.
async fn login(app: &Router) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": "frontdesk",
            "email": "desk@club.local",
            "password": "break-and-run"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "frontdesk", "password": "break-and-run" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/sessions/active", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/inventory/items",
        Some("not-a-jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "frontdesk");
    assert!(body.get("password_hash").is_none());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "frontdesk", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = app().await;
    login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": "frontdesk",
            "email": "other@club.local",
            "password": "break-and-run"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn test_session_lifecycle_and_bill() {
    let app = app().await;
    let token = login(&app).await;
    let token = Some(token.as_str());

    let (status, item) = send(
        &app,
        Method::POST,
        "/api/inventory/items",
        token,
        Some(json!({ "item_name": "Lime Soda", "selling_price_cents": 2500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_str().unwrap();

    let (status, opened) = send(
        &app,
        Method::POST,
        "/api/sessions",
        token,
        Some(json!({ "table_number": 1, "customer_name": "Ayesha", "number_of_people": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(opened["hourly_rate_cents"], 14_000);
    let session_id = opened["id"].as_str().unwrap().to_string();

    // Table 1 is taken.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sessions",
        token,
        Some(json!({ "table_number": 1, "customer_name": "Bilal", "number_of_people": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (status, line) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{session_id}/items"),
        token,
        Some(json!({ "inventory_item_id": item_id, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(line["total_price_cents"], 5_000);

    let (status, preview) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{session_id}/bill"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["is_final"], false);

    let (_, current) = send(
        &app,
        Method::GET,
        &format!("/api/sessions/{session_id}"),
        token,
        None,
    )
    .await;
    let start: DateTime<Utc> = serde_json::from_value(current["start_time"].clone()).unwrap();
    let end = start + Duration::minutes(90);

    let (status, closed) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{session_id}/end"),
        token,
        Some(json!({ "end_time": end.to_rfc3339() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["session"]["is_active"], false);
    let bill = &closed["bill"];
    assert_eq!(bill["is_final"], true);
    assert_eq!(bill["time_played_minutes"], 90);
    assert_eq!(bill["time_played_hours"].as_f64(), Some(1.5));
    assert_eq!(bill["table_charges"].as_f64(), Some(210.0));
    assert_eq!(bill["items_charges"].as_f64(), Some(50.0));
    assert_eq!(bill["total_amount"].as_f64(), Some(260.0));

    // Already closed.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{session_id}/end"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The table is free again.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sessions",
        token,
        Some(json!({ "table_number": 1, "customer_name": "Bilal", "number_of_people": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(&token),
        Some(json!({ "table_number": 2, "customer_name": "Ayesha", "number_of_people": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/sessions/no-such-session",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inventory_soft_delete_hides_item() {
    let app = app().await;
    let token = login(&app).await;
    let token = Some(token.as_str());

    let (_, item) = send(
        &app,
        Method::POST,
        "/api/inventory/items",
        token,
        Some(json!({ "item_name": "Cue Chalk", "selling_price_cents": 1500, "margin_cents": 700 })),
    )
    .await;
    let item_id = item["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/inventory/items/{item_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, active) = send(&app, Method::GET, "/api/inventory/items", token, None).await;
    assert!(active.as_array().unwrap().is_empty());

    let (_, all) = send(
        &app,
        Method::GET,
        "/api/inventory/items?active_only=false",
        token,
        None,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["is_active"], false);
}

#[tokio::test]
async fn test_rates() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/rates", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default_class"], "pool");
    assert_eq!(body["classes"].as_array().unwrap().len(), 2);
}
