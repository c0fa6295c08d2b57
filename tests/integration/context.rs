//! One reply shared by several layers through the request context.

use crate::helpers::*;
use reqwest::StatusCode;

/// Layers see the same reply, including the sent flag
#[tokio::test]
async fn test_use_reply_across_layers() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/context").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_header(&resp, "x-request-id", "req-42");
    assert_header(&resp, "x-layer", "outer");
    assert_header(&resp, "x-api-version", "v2");
    assert_header(&resp, "x-resend", "rejected");

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["information"], "annotated by middleware");
    assert_eq!(body["data"]["ok"], true);
}
