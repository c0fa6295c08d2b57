//! JSON envelope, error statuses, pagination and presets over the wire.

use crate::helpers::*;
use reqwest::StatusCode;
use serde_json::json;

/// Cursor pagination truncates the list and fills meta.pagination
#[tokio::test]
async fn test_cursor_paginated_list() {
    let server = TestServer::with_defaults().await;
    let (status, body) = server.get_json("/users").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "meta": {
                "status": "SUCCESS",
                "information": "Fetched users",
                "pagination": {"next": 2, "hasNext": true, "current": 0}
            },
            "data": [{"id": 1}, {"id": 2}]
        })
    );
}

/// Total-count pagination reports the total
#[tokio::test]
async fn test_total_paginated_list() {
    let server = TestServer::with_defaults().await;
    let (_, body) = server.get_json("/orders").await;

    assert_eq!(
        body["meta"]["pagination"],
        json!({"next": 2, "hasNext": true, "current": 0, "total": 5})
    );
}

/// Error code aliases pick the HTTP status
#[tokio::test]
async fn test_fail_json_alias_status() {
    let server = TestServer::with_defaults().await;
    let (status, body) = server.get_json("/users/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["meta"]["status"], "ERROR");
    assert_eq!(
        body["data"],
        json!({"code": "NOT_FOUND", "message": "user not found"})
    );
}

/// Error options land in the error payload
#[tokio::test]
async fn test_error_with_options() {
    let server = TestServer::with_defaults().await;
    let resp = server.request(reqwest::Method::POST, "/users").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["field"], "email");
    assert_eq!(body["data"]["details"], "email has no @");
}

/// Explicit fail status wins, unknown codes fall back to 500
#[tokio::test]
async fn test_fail_status_fallbacks() {
    let server = TestServer::with_defaults().await;

    let resp = server.get("/teapot").await;
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);

    let resp = server.get("/boom").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_header(&resp, "content-type", "application/xml");
}

/// Sender presets run builder presets and send
#[tokio::test]
async fn test_sender_preset() {
    let server = TestServer::with_defaults().await;
    let (status, body) = server.get_json("/preset").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["message"], "Order not found.");
}

/// A second send in the same handler is rejected and the first response stands
#[tokio::test]
async fn test_second_send_rejected() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/double").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_header(&resp, "x-second-send", "rejected");
    assert_eq!(resp.text().await.unwrap(), "once");
}
