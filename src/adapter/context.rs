//! Adapter backed by a [`RequestContext`] value store.

use std::any::Any;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use serde_json::Value;

use super::body::{BoxReader, ReplyBody};
use super::{Adapter, HttpAdapter};
use crate::core::{RequestContext, Result};

/// Adapter that writes like [`HttpAdapter`] and keeps per-request values in
/// a borrowed [`RequestContext`].
///
/// Response headers registered on the context are copied in at construction.
/// Because the store outlives any single reply, `Client::use_reply` returns
/// the same reply state on every call within the request.
pub struct ContextAdapter<'c> {
    inner: HttpAdapter,
    ctx: &'c mut RequestContext,
}

impl<'c> ContextAdapter<'c> {
    /// Create an adapter for a GET request.
    pub fn new(ctx: &'c mut RequestContext) -> Self {
        Self::with_method(ctx, Method::GET)
    }

    /// Create an adapter for a request with the given method.
    pub fn with_method(ctx: &'c mut RequestContext, method: Method) -> Self {
        let mut inner = HttpAdapter::with_method(method);
        for (name, value) in ctx.response_headers() {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    inner.headers_mut().insert(name, value);
                }
                _ => {
                    tracing::warn!(
                        request_id = %ctx.request_id,
                        header = %name,
                        "skipping invalid context response header"
                    );
                }
            }
        }
        Self { inner, ctx }
    }

    /// Create an adapter answering `req`.
    pub fn for_request<B>(ctx: &'c mut RequestContext, req: &Request<B>) -> Self {
        Self::with_method(ctx, req.method().clone())
    }

    /// The borrowed request context.
    #[inline]
    pub fn context(&self) -> &RequestContext {
        &*self.ctx
    }

    /// Finish the response.
    #[inline]
    pub fn into_response(self) -> Response<ReplyBody> {
        self.inner.into_response()
    }
}

impl Adapter for ContextAdapter<'_> {
    #[inline]
    fn send_json(&mut self, status: StatusCode, payload: &Value) -> Result<()> {
        self.inner.send_json(status, payload)
    }

    #[inline]
    fn send_xml(&mut self, status: StatusCode, payload: &Value) -> Result<()> {
        self.inner.send_xml(status, payload)
    }

    #[inline]
    fn send_binary(&mut self, status: StatusCode, data: Bytes) -> Result<()> {
        self.inner.send_binary(status, data)
    }

    #[inline]
    fn send_text(&mut self, status: StatusCode, text: &str) -> Result<()> {
        self.inner.send_text(status, text)
    }

    #[inline]
    fn send_html(&mut self, status: StatusCode, html: &str) -> Result<()> {
        self.inner.send_html(status, html)
    }

    #[inline]
    fn send_stream(
        &mut self,
        status: StatusCode,
        content_type: &str,
        reader: Option<BoxReader>,
    ) -> Result<()> {
        self.inner.send_stream(status, content_type, reader)
    }

    #[inline]
    fn send_redirect(&mut self, status: StatusCode, location: &str) {
        self.inner.send_redirect(status, location)
    }

    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner.write(buf)
    }

    #[inline]
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    #[inline]
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    #[inline]
    fn set_status(&mut self, status: StatusCode) {
        self.inner.set_status(status)
    }

    fn get(&self, key: &str) -> Option<&(dyn Any + Send)> {
        self.ctx.get_any(key)
    }

    fn take(&mut self, key: &str) -> Option<Box<dyn Any + Send>> {
        self.ctx.remove_boxed(key)
    }

    fn set(&mut self, key: &str, value: Box<dyn Any + Send>) {
        self.ctx.set_boxed(key, value)
    }
}
