//! Unified interface for sending HTTP responses.
//!
//! An [`Adapter`] wraps one HTTP context implementation and exposes the same
//! set of send operations for all of them. Replies only ever talk to this
//! trait, so a handler written against [`crate::reply::Reply`] works with
//! any adapter.
//!
//! Two adapters are bundled:
//!
//! - [`HttpAdapter`] - a bare request/response pair built on `http` types
//! - [`ContextAdapter`] - the same, plus a [`RequestContext`] value store so
//!   replies can be reused within one request
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_reply::adapter::{Adapter, HttpAdapter};
//!
//! let mut adapter = HttpAdapter::for_request(&req);
//! adapter.send_text(StatusCode::OK, "ok")?;
//! let response = adapter.into_response();
//! ```
//!
//! [`RequestContext`]: crate::core::RequestContext

pub mod body;
mod context;
mod plain;

use std::any::Any;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::core::Result;

pub use self::body::{BoxReader, ReplyBody};
pub use self::context::ContextAdapter;
pub use self::plain::HttpAdapter;

/// Content types written by the send operations.
pub mod content_types {
    pub const APPLICATION_JSON: &str = "application/json";
    pub const APPLICATION_XML: &str = "application/xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
    pub const TEXT_HTML: &str = "text/html; charset=utf-8";
}

/// Unified response-sending interface over one HTTP context.
///
/// Every `send_*` operation sets its Content-Type, writes the status and
/// writes the body. Errors from the underlying context are returned as-is.
///
/// The key-value operations give access to a per-request store. Adapters
/// without one keep the default implementations, which store nothing and
/// never find anything.
pub trait Adapter: Send {
    /// Send `payload` encoded as JSON.
    fn send_json(&mut self, status: StatusCode, payload: &Value) -> Result<()>;

    /// Send `payload` encoded as XML.
    fn send_xml(&mut self, status: StatusCode, payload: &Value) -> Result<()>;

    /// Send raw bytes as `application/octet-stream`.
    fn send_binary(&mut self, status: StatusCode, data: Bytes) -> Result<()>;

    /// Send UTF-8 plain text.
    fn send_text(&mut self, status: StatusCode, text: &str) -> Result<()>;

    /// Send an HTML string. The string is written as given.
    fn send_html(&mut self, status: StatusCode, html: &str) -> Result<()>;

    /// Stream `reader` to the client with the given content type.
    ///
    /// The reader is copied incrementally. With no reader the body is empty.
    fn send_stream(
        &mut self,
        status: StatusCode,
        content_type: &str,
        reader: Option<BoxReader>,
    ) -> Result<()>;

    /// Redirect to `location`.
    fn send_redirect(&mut self, status: StatusCode, location: &str);

    /// Append raw bytes to the response body.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Response headers.
    fn headers(&self) -> &HeaderMap;

    /// Mutable response headers.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status without writing a body.
    fn set_status(&mut self, status: StatusCode);

    /// Read a value from the per-request store.
    fn get(&self, _key: &str) -> Option<&(dyn Any + Send)> {
        None
    }

    /// Move a value out of the per-request store.
    fn take(&mut self, _key: &str) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Put a value into the per-request store.
    fn set(&mut self, _key: &str, _value: Box<dyn Any + Send>) {}
}

/// Escape the five HTML-special characters.
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
