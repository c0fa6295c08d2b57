//! Terminal senders.
//!
//! Every method here ends the reply. JSON and XML senders write the
//! finalized payload. Text, HTML, binary and stream senders write the raw
//! data and fall back to an empty body when the data has the wrong variant.

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::StatusCode;
use serde_json::Value;

use super::{log_data_mismatch, Data, Reply};
use crate::adapter::escape_html;
use crate::core::{Error, Result};

static NULL: Value = Value::Null;

impl Reply<'_> {
    /// Send the payload as JSON with `status`.
    #[track_caller]
    pub fn reply_json(&mut self, status: StatusCode) -> Result<()> {
        self.send(|adapter, state, _| {
            adapter.send_json(status, state.payload.as_ref().unwrap_or(&NULL))
        })
    }

    /// Send the payload as JSON with 200.
    #[track_caller]
    pub fn ok_json(&mut self) -> Result<()> {
        self.reply_json(StatusCode::OK)
    }

    /// Send the payload as JSON with 201.
    #[track_caller]
    pub fn created_json(&mut self) -> Result<()> {
        self.reply_json(StatusCode::CREATED)
    }

    /// Send the payload as JSON with the code alias status, or 500.
    #[track_caller]
    pub fn fail_json(&mut self) -> Result<()> {
        let status = self.fail_status(None);
        self.reply_json(status)
    }

    /// Send the payload as JSON with an explicit error status.
    #[track_caller]
    pub fn fail_json_with(&mut self, status: StatusCode) -> Result<()> {
        let status = self.fail_status(Some(status));
        self.reply_json(status)
    }

    /// Send the payload as XML with `status`.
    #[track_caller]
    pub fn reply_xml(&mut self, status: StatusCode) -> Result<()> {
        self.send(|adapter, state, _| {
            adapter.send_xml(status, state.payload.as_ref().unwrap_or(&NULL))
        })
    }

    #[track_caller]
    pub fn ok_xml(&mut self) -> Result<()> {
        self.reply_xml(StatusCode::OK)
    }

    #[track_caller]
    pub fn created_xml(&mut self) -> Result<()> {
        self.reply_xml(StatusCode::CREATED)
    }

    #[track_caller]
    pub fn fail_xml(&mut self) -> Result<()> {
        let status = self.fail_status(None);
        self.reply_xml(status)
    }

    #[track_caller]
    pub fn fail_xml_with(&mut self, status: StatusCode) -> Result<()> {
        let status = self.fail_status(Some(status));
        self.reply_xml(status)
    }

    /// Send `Data::Text` as plain text.
    #[track_caller]
    pub fn reply_text(&mut self, status: StatusCode) -> Result<()> {
        self.send(|adapter, state, location| match &state.envelope.data {
            Data::Text(text) => adapter.send_text(status, text),
            other => {
                log_data_mismatch(location, "text", other);
                adapter.send_text(status, "")
            }
        })
    }

    #[track_caller]
    pub fn ok_text(&mut self) -> Result<()> {
        self.reply_text(StatusCode::OK)
    }

    #[track_caller]
    pub fn created_text(&mut self) -> Result<()> {
        self.reply_text(StatusCode::CREATED)
    }

    /// Send `Data::Html` or `Data::Text` as HTML.
    ///
    /// The content is always HTML-escaped before it is written.
    #[track_caller]
    pub fn reply_html(&mut self, status: StatusCode) -> Result<()> {
        self.send(|adapter, state, location| {
            let html = match &state.envelope.data {
                Data::Html(html) | Data::Text(html) => escape_html(html),
                other => {
                    log_data_mismatch(location, "html", other);
                    String::new()
                }
            };
            adapter.send_html(status, &html)
        })
    }

    #[track_caller]
    pub fn ok_html(&mut self) -> Result<()> {
        self.reply_html(StatusCode::OK)
    }

    #[track_caller]
    pub fn created_html(&mut self) -> Result<()> {
        self.reply_html(StatusCode::CREATED)
    }

    /// Send `Data::Bytes` as `application/octet-stream`.
    #[track_caller]
    pub fn reply_binary(&mut self, status: StatusCode) -> Result<()> {
        self.send(|adapter, state, location| {
            let data = match &state.envelope.data {
                Data::Bytes(bytes) => bytes.clone(),
                other => {
                    log_data_mismatch(location, "bytes", other);
                    Bytes::new()
                }
            };
            adapter.send_binary(status, data)
        })
    }

    #[track_caller]
    pub fn ok_binary(&mut self) -> Result<()> {
        self.reply_binary(StatusCode::OK)
    }

    #[track_caller]
    pub fn created_binary(&mut self) -> Result<()> {
        self.reply_binary(StatusCode::CREATED)
    }

    /// Stream `Data::Stream` with its content type.
    ///
    /// The reader moves into the response, so the data is empty afterwards.
    /// A content type that is not a valid header value is rejected before
    /// the reader is taken, leaving the reply unsent with its data intact.
    #[track_caller]
    pub fn reply_stream(&mut self, status: StatusCode) -> Result<()> {
        self.send(|adapter, state, location| {
            if let Data::Stream(source) = &state.envelope.data {
                HeaderValue::from_str(source.content_type())
                    .map_err(|e| Error::InvalidResponse(format!("content type: {}", e)))?;
            }
            match std::mem::take(&mut state.envelope.data) {
                Data::Stream(source) => {
                    let (reader, content_type) = source.into_parts();
                    adapter.send_stream(status, &content_type, Some(reader))
                }
                other => {
                    log_data_mismatch(location, "stream", &other);
                    state.envelope.data = other;
                    adapter.send_stream(status, "", None)
                }
            }
        })
    }

    #[track_caller]
    pub fn ok_stream(&mut self) -> Result<()> {
        self.reply_stream(StatusCode::OK)
    }

    #[track_caller]
    pub fn created_stream(&mut self) -> Result<()> {
        self.reply_stream(StatusCode::CREATED)
    }

    /// Redirect to `url`.
    #[track_caller]
    pub fn redirect(&mut self, status: StatusCode, url: &str) -> Result<()> {
        self.send(|adapter, _, _| {
            adapter.send_redirect(status, url);
            Ok(())
        })
    }

    /// Send 204 with no body and no Content-Type.
    #[track_caller]
    pub fn no_content(&mut self) -> Result<()> {
        self.send(|adapter, _, _| {
            adapter.headers_mut().remove(header::CONTENT_TYPE);
            adapter.set_status(StatusCode::NO_CONTENT);
            Ok(())
        })
    }
}
