//! Test helpers and utilities

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use reqwest::Response as HttpResponse;
use serde_json::json;
use tokio::net::TcpListener;

use tokio_reply::cookie::{Cookie, SameSite};
use tokio_reply::{
    Adapter, Client, ContextAdapter, Data, ErrorOpt, HttpAdapter, ReplyBody, RequestContext,
    StreamSource,
};

/// In-process server answering every route through `tokio_reply`.
pub struct TestServer {
    pub base_url: String,
    pub http: reqwest::Client,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a server on an ephemeral port with `client`.
    pub async fn start(client: Arc<Client>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr: SocketAddr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let client = Arc::clone(&client);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let client = Arc::clone(&client);
                        async move { Ok::<_, Infallible>(route(&client, req)) }
                    });

                    let io = TokioIo::new(stream);
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{}", addr),
            http,
        }
    }

    /// Start a server with the client used by most tests.
    pub async fn with_defaults() -> Self {
        Self::start(default_client()).await
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> HttpResponse {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a request with an arbitrary method
    pub async fn request(&self, method: reqwest::Method, path: &str) -> HttpResponse {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request failed")
    }

    /// GET and decode a JSON body
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let resp = self.get(path).await;
        let status = resp.status();
        let body = resp.json().await.expect("Body is not JSON");
        (status, body)
    }
}

/// Client with the aliases, headers and presets the routes rely on.
pub fn default_client() -> Arc<Client> {
    Client::builder()
        .code_alias("NOT_FOUND", StatusCode::NOT_FOUND)
        .code_alias("BAD_REQUEST", StatusCode::BAD_REQUEST)
        .default_header("X-API-Version", "v2")
        .production(false)
        .add_preset("RESOURCE_NOT_FOUND", |rp, args| {
            let resource = args.first().and_then(|v| v.as_str()).unwrap_or("resource");
            rp.error("NOT_FOUND", format!("{} not found.", resource));
        })
        .add_sender_preset("SEND_NOT_FOUND", |rp, args| {
            rp.use_preset("RESOURCE_NOT_FOUND", args).0.fail_json()
        })
        .build()
}

/// Request router used by the test server.
fn route(client: &Arc<Client>, req: Request<Incoming>) -> Response<ReplyBody> {
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    if path == "/context" {
        return context_route(client, &req);
    }

    let mut adapter = HttpAdapter::for_request(&req);
    let mut rp = client.new_reply(&mut adapter);

    let _ = match (req.method(), path.as_str()) {
        (&Method::GET, "/users") => {
            let limit = if query.contains("limit=1") { 1 } else { 2 };
            rp.success(json!([{"id": 1}, {"id": 2}, {"id": 3}]))
                .paginate_cursor(limit, 0)
                .info("Fetched users")
                .ok_json()
        }
        (&Method::GET, "/orders") => rp
            .success(json!([{"id": 11}, {"id": 12}]))
            .paginate_total(2, 0, 5)
            .ok_json(),
        (&Method::GET, "/users/missing") => rp.error("NOT_FOUND", "user not found").fail_json(),
        (&Method::POST, "/users") => rp
            .error_with(
                "BAD_REQUEST",
                "invalid input",
                [ErrorOpt::field("email"), ErrorOpt::details("email has no @")],
            )
            .fail_json(),
        (&Method::GET, "/teapot") => rp
            .error("TEAPOT", "short and stout")
            .fail_json_with(StatusCode::IM_A_TEAPOT),
        (&Method::GET, "/boom") => rp.error("UNMAPPED", "no alias").fail_xml(),
        (&Method::GET, "/report.xml") => rp.success(json!({"total": 3})).ok_xml(),
        (&Method::POST, "/report.xml") => rp.success(json!({"id": 9})).created_xml(),
        (&Method::GET, "/hello") => rp.success("Hello!").ok_text(),
        (&Method::POST, "/notes") => rp.success("saved").created_text(),
        (&Method::GET, "/page") => rp.success(Data::html("<p>Hi & bye</p>")).ok_html(),
        (&Method::GET, "/logo") => rp
            .success(bytes::Bytes::from_static(&[0x89, b'P', b'N', b'G']))
            .ok_binary(),
        (&Method::GET, "/logo-broken") => rp.success("not bytes").ok_binary(),
        (&Method::GET, "/events") => rp
            .success(StreamSource::new(
                &b"data: one\n\ndata: two\n\n"[..],
                "text/event-stream",
            ))
            .ok_stream(),
        (&Method::GET, "/old") => rp.redirect(StatusCode::MOVED_PERMANENTLY, "/new"),
        (&Method::DELETE, "/items/1") => rp.no_content(),
        (&Method::GET, "/session") => rp
            .set_cookies([
                Cookie::new("session", "abc123")
                    .with_path("/")
                    .with_http_only(true)
                    .with_same_site(SameSite::Lax),
                Cookie::new("theme", "dark"),
            ])
            .set_header("Cache-Control", "no-store")
            .success(json!({"user": "ada"}))
            .tokens([("access", "a.b.c")])
            .ok_json(),
        (&Method::GET, "/preset") => rp.send_preset("SEND_NOT_FOUND", &[json!("Order")]),
        (&Method::GET, "/double") => {
            let first = rp.success("once").ok_text();
            let second = rp.ok_text();
            let header = if second.as_ref().is_err_and(|e| e.is_already_sent()) {
                "rejected"
            } else {
                "accepted"
            };
            rp.adapter_mut()
                .headers_mut()
                .insert("x-second-send", header.parse().expect("static header"));
            first
        }
        _ => rp.error("NOT_FOUND", "no route").fail_json(),
    };

    drop(rp);
    adapter.into_response()
}

/// Two layers sharing one reply through the request context.
fn context_route(client: &Arc<Client>, req: &Request<Incoming>) -> Response<ReplyBody> {
    let mut ctx = RequestContext::with_request_id("req-42");
    ctx.set_response_header("X-Request-Id", ctx.request_id.clone());

    let mut adapter = ContextAdapter::for_request(&mut ctx, req);

    // Outer layer: annotate
    client
        .use_reply(&mut adapter)
        .info("annotated by middleware")
        .set_header("X-Layer", "outer");

    // Handler: send
    let _ = client
        .use_reply(&mut adapter)
        .success(json!({"ok": true}))
        .ok_json();

    // Outer layer again: the reply is already out
    let resent = client.use_reply(&mut adapter).ok_json();
    if resent.is_err() {
        adapter
            .headers_mut()
            .insert("x-resend", "rejected".parse().expect("static header"));
    }

    adapter.into_response()
}

/// Assert that response contains header
pub fn assert_header(response: &HttpResponse, name: &str, expected: &str) {
    let value = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap();
    assert_eq!(value, expected, "Header '{}' mismatch", name);
}
