//! Adapter over a bare `http` request/response pair.

use bytes::{Bytes, BytesMut};
use http::header::{self, HeaderValue};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use super::body::{full_body, streaming_body, BoxReader, ReplyBody};
use super::{content_types, escape_html, Adapter};
use crate::core::{Error, Result};

/// Root element name for XML replies.
const XML_ROOT: &str = "reply";

enum Body {
    Buffered(BytesMut),
    Streaming(BoxReader),
}

/// Adapter that builds an `http::Response<ReplyBody>` for one request.
///
/// It has no per-request store, so `Client::use_reply` hands out a fresh
/// reply on every call. Use [`super::ContextAdapter`] when reuse is needed.
///
/// # Example
///
/// ```rust,ignore
/// async fn handle(req: Request<Incoming>) -> Result<Response<ReplyBody>, Infallible> {
///     let mut adapter = HttpAdapter::for_request(&req);
///     let _ = CLIENT.new_reply(&mut adapter).success("pong").ok_text();
///     Ok(adapter.into_response())
/// }
/// ```
pub struct HttpAdapter {
    method: Method,
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl HttpAdapter {
    /// Create an adapter for a GET request.
    #[inline]
    pub fn new() -> Self {
        Self::with_method(Method::GET)
    }

    /// Create an adapter for a request with the given method.
    #[inline]
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Body::Buffered(BytesMut::new()),
        }
    }

    /// Create an adapter answering `req`.
    #[inline]
    pub fn for_request<B>(req: &Request<B>) -> Self {
        Self::with_method(req.method().clone())
    }

    /// Status written so far.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Number of buffered body bytes (0 for streamed bodies).
    #[inline]
    pub fn buffered_len(&self) -> usize {
        match &self.body {
            Body::Buffered(buf) => buf.len(),
            Body::Streaming(_) => 0,
        }
    }

    /// Check if the body will be streamed.
    #[inline]
    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming(_))
    }

    /// Finish the response.
    pub fn into_response(self) -> Response<ReplyBody> {
        let body = match self.body {
            Body::Buffered(buf) => full_body(buf.freeze()),
            Body::Streaming(reader) => streaming_body(reader),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    #[inline]
    fn set_content_type(&mut self, content_type: &'static str) {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    /// Append to the buffered body.
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.body {
            Body::Buffered(buf) => {
                buf.extend_from_slice(bytes);
                Ok(())
            }
            Body::Streaming(_) => Err(Error::InvalidResponse(
                "body is already streaming".to_string(),
            )),
        }
    }
}

impl Default for HttpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdapter")
            .field("method", &self.method)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("streaming", &self.is_streaming())
            .finish()
    }
}

impl Adapter for HttpAdapter {
    fn send_json(&mut self, status: StatusCode, payload: &Value) -> Result<()> {
        let encoded = serde_json::to_vec(payload)?;
        self.set_content_type(content_types::APPLICATION_JSON);
        self.status = status;
        self.append(&encoded)
    }

    fn send_xml(&mut self, status: StatusCode, payload: &Value) -> Result<()> {
        let encoded = quick_xml::se::to_string_with_root(XML_ROOT, payload)
            .map_err(|e| Error::Xml(e.to_string()))?;
        self.set_content_type(content_types::APPLICATION_XML);
        self.status = status;
        self.append(encoded.as_bytes())
    }

    fn send_binary(&mut self, status: StatusCode, data: Bytes) -> Result<()> {
        self.set_content_type(content_types::OCTET_STREAM);
        self.status = status;
        self.append(&data)
    }

    fn send_text(&mut self, status: StatusCode, text: &str) -> Result<()> {
        self.set_content_type(content_types::TEXT_PLAIN);
        self.status = status;
        self.append(text.as_bytes())
    }

    fn send_html(&mut self, status: StatusCode, html: &str) -> Result<()> {
        self.set_content_type(content_types::TEXT_HTML);
        self.status = status;
        self.append(html.as_bytes())
    }

    fn send_stream(
        &mut self,
        status: StatusCode,
        content_type: &str,
        reader: Option<BoxReader>,
    ) -> Result<()> {
        if content_type.is_empty() {
            self.headers.remove(header::CONTENT_TYPE);
        } else {
            let value = HeaderValue::try_from(content_type)
                .map_err(|e| Error::InvalidResponse(format!("content type: {}", e)))?;
            self.headers.insert(header::CONTENT_TYPE, value);
        }
        self.status = status;

        let Some(reader) = reader else {
            return Ok(());
        };

        let body = std::mem::replace(&mut self.body, Body::Buffered(BytesMut::new()));
        self.body = match body {
            // Anything written before the stream goes out first
            Body::Buffered(prefix) if !prefix.is_empty() => {
                let prefix = std::io::Cursor::new(prefix.freeze());
                Body::Streaming(Box::new(prefix.chain(reader)))
            }
            Body::Buffered(_) => Body::Streaming(reader),
            Body::Streaming(_) => {
                return Err(Error::InvalidResponse(
                    "body is already streaming".to_string(),
                ))
            }
        };
        Ok(())
    }

    fn send_redirect(&mut self, status: StatusCode, location: &str) {
        match HeaderValue::try_from(escape_non_ascii(location)) {
            Ok(value) => {
                self.headers.insert(header::LOCATION, value);
            }
            Err(e) => {
                tracing::warn!(location = location, error = %e, "invalid redirect location");
            }
        }

        let had_content_type = self.headers.contains_key(header::CONTENT_TYPE);
        if !had_content_type && (self.method == Method::GET || self.method == Method::HEAD) {
            self.set_content_type(content_types::TEXT_HTML);
        }
        self.status = status;

        if !had_content_type && self.method == Method::GET {
            let note = format!(
                "<a href=\"{}\">{}</a>.\n",
                escape_html(location),
                status.canonical_reason().unwrap_or("")
            );
            // Redirect has no error path; a streaming body simply keeps its content
            let _ = self.append(note.as_bytes());
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    #[inline]
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[inline]
    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }
}

/// Percent-encode bytes outside printable ASCII so the URL fits in a header.
fn escape_non_ascii(location: &str) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(location.len());
    for b in location.bytes() {
        if b.is_ascii_graphic() {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{:02X}", b);
        }
    }
    out
}
