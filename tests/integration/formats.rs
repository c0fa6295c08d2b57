//! XML, text, HTML, binary, stream, redirect and 204 replies.

use crate::helpers::*;
use reqwest::StatusCode;

/// XML replies wrap the envelope in a reply root
#[tokio::test]
async fn test_xml_reply() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/report.xml").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_header(&resp, "content-type", "application/xml");
    let body = resp.text().await.unwrap();
    assert!(body.starts_with("<reply>"), "{}", body);
    assert!(body.contains("<total>3</total>"), "{}", body);
    assert!(body.contains("<status>SUCCESS</status>"), "{}", body);

    let resp = server.request(reqwest::Method::POST, "/report.xml").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

/// Text replies send the raw string
#[tokio::test]
async fn test_text_reply() {
    let server = TestServer::with_defaults().await;

    let resp = server.get("/hello").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_header(&resp, "content-type", "text/plain; charset=utf-8");
    assert_eq!(resp.text().await.unwrap(), "Hello!");

    let resp = server.request(reqwest::Method::POST, "/notes").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.text().await.unwrap(), "saved");
}

/// HTML replies are escaped
#[tokio::test]
async fn test_html_reply_is_escaped() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/page").await;

    assert_header(&resp, "content-type", "text/html; charset=utf-8");
    assert_eq!(
        resp.text().await.unwrap(),
        "&lt;p&gt;Hi &amp; bye&lt;/p&gt;"
    );
}

/// Binary replies send bytes, mismatched data sends nothing
#[tokio::test]
async fn test_binary_reply() {
    let server = TestServer::with_defaults().await;

    let resp = server.get("/logo").await;
    assert_header(&resp, "content-type", "application/octet-stream");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &[0x89, b'P', b'N', b'G']);

    let resp = server.get("/logo-broken").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.bytes().await.unwrap().is_empty());
}

/// Stream replies use the source content type
#[tokio::test]
async fn test_stream_reply() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/events").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_header(&resp, "content-type", "text/event-stream");
    assert_eq!(resp.text().await.unwrap(), "data: one\n\ndata: two\n\n");
}

/// Redirects set Location and a short HTML note for GET
#[tokio::test]
async fn test_redirect() {
    let server = TestServer::with_defaults().await;
    let resp = server.get("/old").await;

    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_header(&resp, "location", "/new");
    assert_eq!(
        resp.text().await.unwrap(),
        "<a href=\"/new\">Moved Permanently</a>.\n"
    );
}

/// No content drops the Content-Type header
#[tokio::test]
async fn test_no_content() {
    let server = TestServer::with_defaults().await;
    let resp = server.request(reqwest::Method::DELETE, "/items/1").await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.headers().get("content-type").is_none());
    assert!(resp.bytes().await.unwrap().is_empty());
}
