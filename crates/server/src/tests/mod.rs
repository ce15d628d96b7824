// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use helpdesk_api::bootstrap_admin;
use helpdesk_domain::FacilityClock;
use helpdesk_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use super::{AppState, build_router};
use crate::session::USER_ID_HEADER;

pub const ADMIN: i64 = 1;
pub const ARUN: i64 = 2;
pub const RIYA: i64 = 3;

/// Helper to create test app state with a seeded admin.
fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    bootstrap_admin(
        &mut persistence,
        "Admin",
        "admin@example.com",
        OffsetDateTime::now_utc(),
    )
    .unwrap();
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: FacilityClock::default(),
    }
}

/// Sends one request and returns the status with the decoded body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = user {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }
    let body: Body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Router with Arun (engineer, id 2) and Riya (user, id 3) registered.
pub async fn seeded_app() -> Router {
    let app: Router = build_router(create_test_app_state());
    for (name, email, role) in [
        ("Arun", "arun@example.com", "engineer"),
        ("Riya", "riya@example.com", "user"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/users",
            Some(ADMIN),
            Some(json!({
                "name": name,
                "email": email,
                "role": role,
                "department": "ITFM",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app: Router = seeded_app().await;

    let (status, body) = send(&app, "GET", "/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!(true));

    let request = Request::builder()
        .uri("/tickets")
        .header(USER_ID_HEADER, "arun")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/tickets", Some(99), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_user_is_locked_out() {
    let app: Router = seeded_app().await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{RIYA}/active"),
        Some(ADMIN),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], json!(false));

    let (status, _) = send(&app, "GET", "/notifications", Some(RIYA), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let app: Router = seeded_app().await;

    let (status, _) = send(&app, "GET", "/users", Some(RIYA), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/users", Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/engineers", Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["name"], json!("Arun"));

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(ADMIN),
        Some(json!({
            "name": "Arun Again",
            "email": "arun@example.com",
            "role": "engineer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
