//! Test doubles shared by the reply unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::adapter::{Adapter, BoxReader, HttpAdapter};
use crate::core::{Error, Result};

/// Adapter that counts writes and can be told to fail.
pub(crate) struct SpyAdapter {
    pub(crate) inner: HttpAdapter,
    calls: usize,
    fail: bool,
    log: Option<Arc<Mutex<Vec<String>>>>,
    pub(crate) last_stream: Option<(String, bool)>,
}

impl SpyAdapter {
    pub(crate) fn new() -> Self {
        Self {
            inner: HttpAdapter::new(),
            calls: 0,
            fail: false,
            log: None,
            last_stream: None,
        }
    }

    /// Record each adapter write as `adapter:<op>` in `log`.
    pub(crate) fn with_log(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            log: Some(log),
            ..Self::new()
        }
    }

    /// Every send fails with a broken pipe.
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls
    }

    pub(crate) fn body(self) -> Bytes {
        let response = self.inner.into_response();
        let body = response.into_body();
        tokio_test::block_on(http_body_util::BodyExt::collect(body))
            .map(|c| c.to_bytes())
            .unwrap_or_default()
    }

    fn record(&mut self, op: &str) -> Result<()> {
        self.calls += 1;
        if let Some(log) = &self.log {
            log.lock().unwrap().push(format!("adapter:{}", op));
        }
        if self.fail {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "connection closed",
            )));
        }
        Ok(())
    }
}

impl Adapter for SpyAdapter {
    fn send_json(&mut self, status: StatusCode, payload: &Value) -> Result<()> {
        self.record("send_json")?;
        self.inner.send_json(status, payload)
    }

    fn send_xml(&mut self, status: StatusCode, payload: &Value) -> Result<()> {
        self.record("send_xml")?;
        self.inner.send_xml(status, payload)
    }

    fn send_binary(&mut self, status: StatusCode, data: Bytes) -> Result<()> {
        self.record("send_binary")?;
        self.inner.send_binary(status, data)
    }

    fn send_text(&mut self, status: StatusCode, text: &str) -> Result<()> {
        self.record("send_text")?;
        self.inner.send_text(status, text)
    }

    fn send_html(&mut self, status: StatusCode, html: &str) -> Result<()> {
        self.record("send_html")?;
        self.inner.send_html(status, html)
    }

    fn send_stream(
        &mut self,
        status: StatusCode,
        content_type: &str,
        reader: Option<BoxReader>,
    ) -> Result<()> {
        self.record("send_stream")?;
        self.last_stream = Some((content_type.to_string(), reader.is_some()));
        self.inner.send_stream(status, content_type, reader)
    }

    fn send_redirect(&mut self, status: StatusCode, location: &str) {
        let _ = self.record("send_redirect");
        self.inner.send_redirect(status, location)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner.write(buf)
    }

    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn set_status(&mut self, status: StatusCode) {
        let _ = self.record("set_status");
        self.inner.set_status(status)
    }
}

#[derive(Clone)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return everything it logged.
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let writer = SharedBuf(Arc::clone(&buf));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
