//! Envelope, metadata and data types carried by a reply.

use std::collections::BTreeMap;
use std::path::Path;

use bytes::Bytes;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use tokio::io::AsyncRead;

use crate::adapter::BoxReader;

/// Authentication or session tokens attached to `meta.tokens`.
pub type Tokens = BTreeMap<String, String>;

/// Reply status written to `meta.status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Status {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "ERROR")]
    Error,
}

impl Status {
    /// Wire name of the status.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination metadata.
///
/// `total` is only present for total-count pagination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Next page or offset (0 when there is none).
    pub next: i64,
    /// True if more results exist.
    pub has_next: bool,
    /// Current page or offset.
    pub current: i64,
    /// Total number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

/// Reply metadata.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "information", skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Tokens>,
    /// Only sent when the client runs in debug mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

/// Error body sent as `data` when the status is `ERROR`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ErrorPayload {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Field causing the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Per-field messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ErrorPayload {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Apply one optional mutator.
    pub fn apply(&mut self, opt: ErrorOpt) {
        match opt {
            ErrorOpt::Details(details) => self.details = Some(details),
            ErrorOpt::Field(field) => self.field = Some(field),
            ErrorOpt::Fields(fields) => {
                self.fields.get_or_insert_with(BTreeMap::new).extend(fields)
            }
        }
    }
}

/// Optional parts of an [`ErrorPayload`].
///
/// ```rust,ignore
/// rp.error_with("BAD_REQUEST", "invalid input", [
///     ErrorOpt::details("email has no @"),
///     ErrorOpt::field("email"),
/// ]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorOpt {
    Details(String),
    Field(String),
    Fields(BTreeMap<String, String>),
}

impl ErrorOpt {
    pub fn details(details: impl Into<String>) -> Self {
        ErrorOpt::Details(details.into())
    }

    pub fn field(field: impl Into<String>) -> Self {
        ErrorOpt::Field(field.into())
    }

    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ErrorOpt::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Byte source for stream replies (files, SSE, proxied bodies).
pub struct StreamSource {
    reader: BoxReader,
    content_type: String,
}

impl StreamSource {
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static, content_type: impl Into<String>) -> Self {
        Self {
            reader: Box::new(reader),
            content_type: content_type.into(),
        }
    }

    /// Open a file and guess its content type from the extension.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        Ok(Self::new(file, mime))
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn into_parts(self) -> (BoxReader, String) {
        (self.reader, self.content_type)
    }
}

impl std::fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Reply data. The variant decides which senders can use it as-is.
#[derive(Debug, Default)]
pub enum Data {
    #[default]
    Empty,
    /// Structured data (JSON/XML senders, cursor pagination on arrays).
    Json(Value),
    /// Plain text.
    Text(String),
    /// HTML source. Escaped before sending.
    Html(String),
    /// Raw bytes for the binary sender.
    Bytes(Bytes),
    /// Error body set by `Reply::error`.
    Error(ErrorPayload),
    /// Byte stream for the stream sender.
    Stream(StreamSource),
}

impl Data {
    /// Wrap a string meant for the HTML sender.
    pub fn html(html: impl Into<String>) -> Self {
        Data::Html(html.into())
    }

    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Empty => "empty",
            Data::Json(_) => "json",
            Data::Text(_) => "text",
            Data::Html(_) => "html",
            Data::Bytes(_) => "bytes",
            Data::Error(_) => "error",
            Data::Stream(_) => "stream",
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Data::Empty)
    }

    #[inline]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Data::Json(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_error(&self) -> Option<&ErrorPayload> {
        match self {
            Data::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Data::Empty | Data::Stream(_) => serializer.serialize_unit(),
            Data::Json(v) => v.serialize(serializer),
            Data::Text(s) | Data::Html(s) => serializer.serialize_str(s),
            Data::Bytes(b) => serializer.serialize_bytes(b),
            Data::Error(e) => e.serialize(serializer),
        }
    }
}

impl From<Value> for Data {
    fn from(v: Value) -> Self {
        Data::Json(v)
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::Text(s)
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Text(s.to_string())
    }
}

impl From<Bytes> for Data {
    fn from(b: Bytes) -> Self {
        Data::Bytes(b)
    }
}

impl From<Vec<u8>> for Data {
    fn from(b: Vec<u8>) -> Self {
        Data::Bytes(Bytes::from(b))
    }
}

impl From<&'static [u8]> for Data {
    fn from(b: &'static [u8]) -> Self {
        Data::Bytes(Bytes::from_static(b))
    }
}

impl From<ErrorPayload> for Data {
    fn from(e: ErrorPayload) -> Self {
        Data::Error(e)
    }
}

impl From<StreamSource> for Data {
    fn from(s: StreamSource) -> Self {
        Data::Stream(s)
    }
}

/// Standard `{meta, data}` response envelope.
#[derive(Debug, Default, serde::Serialize)]
pub struct Envelope {
    pub meta: Meta,
    pub data: Data,
}
