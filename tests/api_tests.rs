// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Router tests against an offline database.
//!
//! Requests that pass validation reach storage and fail with 500, so these
//! tests check that bad input is rejected before any storage access.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn send(method: &str, uri: &str, body: Option<&str>) -> axum::response::Response {
    let (app, _state) = common::create_test_app();
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = send("GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("Cache-Control").is_none());

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_unknown_chart_type_rejected() {
    let response = send("GET", "/api/blocks/1/chart?type=pace", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_period_chart_reversed_range_rejected() {
    let response = send(
        "GET",
        "/api/chart?start=2024-03-01&end=2024-02-01&type=time",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_empty_window_rejected() {
    let response = send(
        "POST",
        "/api/sync",
        Some(r#"{"after":"2024-03-01","before":"2024-03-01"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_malformed_date_rejected() {
    let response = send(
        "POST",
        "/api/sync",
        Some(r#"{"after":"March 1st","before":"2024-03-08"}"#),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_block_with_reversed_dates_rejected() {
    let response = send(
        "POST",
        "/api/blocks",
        Some(r#"{"name":"Base","start_date":"2024-03-01","end_date":"2024-02-01"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_block_name_too_long_rejected() {
    let body = format!(
        r#"{{"name":"{}","start_date":"2024-01-01","end_date":"2024-02-01"}}"#,
        "a".repeat(101)
    );
    let response = send("POST", "/api/blocks", Some(&body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_activity_name_rejected() {
    let response = send("PUT", "/api/activities/1/name", Some(r#"{"name":"  "}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_zone_order_rejected() {
    let response = send(
        "PUT",
        "/api/zones",
        Some(r#"{"hr_max":190,"z1_limit":150,"z2_limit":140}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offline_database_reports_500() {
    let response = send("GET", "/api/calendar", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");

    let json = json_body(response).await;
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_non_numeric_activity_id_rejected() {
    let response = send("GET", "/api/activities/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
