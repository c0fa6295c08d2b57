//! Default headers, custom headers, cookies and tokens.

use crate::helpers::*;

/// Default headers from the client are on every reply
#[tokio::test]
async fn test_default_headers() {
    let server = TestServer::with_defaults().await;

    for path in ["/hello", "/users/missing", "/old"] {
        let resp = server.get(path).await;
        assert_header(&resp, "x-api-version", "v2");
    }
}

/// Cookies are appended as separate Set-Cookie headers
#[tokio::test]
async fn test_cookies_headers_and_tokens() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/session").await;

    assert_header(&resp, "cache-control", "no-store");
    let cookies: Vec<_> = resp
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        cookies,
        ["session=abc123; Path=/; HttpOnly; SameSite=Lax", "theme=dark"]
    );

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["tokens"]["access"], "a.b.c");
    assert_eq!(body["data"]["user"], "ada");
}
