//! Per-request response builder.
//!
//! A [`Reply`] collects the envelope (`meta` + `data`), headers and deferred
//! callbacks for one request, then sends it through an [`Adapter`] with one
//! of the terminal methods (`ok_json`, `fail_xml`, `ok_stream`, ...).
//!
//! The lifecycle is always the same:
//!
//! 1. builder calls mutate the reply in place and return `&mut Self`
//! 2. a terminal call finalizes the payload, runs deferred callbacks and
//!    writes through the adapter
//! 3. any later terminal call fails with [`Error::AlreadySent`]
//!
//! # Example
//!
//! ```rust,ignore
//! let mut adapter = HttpAdapter::for_request(&req);
//! client
//!     .new_reply(&mut adapter)
//!     .success(json!([{"id": 1}, {"id": 2}, {"id": 3}]))
//!     .paginate_cursor(2, 0)
//!     .info("Fetched 2 items")
//!     .ok_json()?;
//! ```

mod builder;
mod header;
mod paginate;
mod preset;
mod send;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

use std::panic::Location;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;

use crate::adapter::Adapter;
use crate::client::Client;
use crate::core::{Error, Result};

pub use self::types::{
    Data, Envelope, ErrorOpt, ErrorPayload, Meta, Pagination, Status, StreamSource, Tokens,
};

type Deferred = Box<dyn FnOnce() + Send>;

/// Mutable state of a reply, kept in the adapter store between `use_reply`
/// calls.
#[derive(Default)]
pub(crate) struct ReplyState {
    envelope: Envelope,
    payload: Option<Value>,
    sent: bool,
    defers: Vec<Deferred>,
}

/// Response builder bound to one adapter.
pub struct Reply<'a> {
    state: ReplyState,
    adapter: &'a mut dyn Adapter,
    client: Arc<Client>,
    /// Write the state back into the adapter store on drop.
    persist: bool,
}

impl<'a> Reply<'a> {
    pub(crate) fn from_parts(
        adapter: &'a mut dyn Adapter,
        client: Arc<Client>,
        state: ReplyState,
        persist: bool,
    ) -> Self {
        Self {
            state,
            adapter,
            client,
            persist,
        }
    }

    pub(crate) fn persistent(mut self) -> Self {
        self.persist = true;
        self
    }

    /// The full envelope.
    #[inline]
    pub fn envelope(&self) -> &Envelope {
        &self.state.envelope
    }

    #[inline]
    pub fn data(&self) -> &Data {
        &self.state.envelope.data
    }

    #[inline]
    pub fn meta(&self) -> &Meta {
        &self.state.envelope.meta
    }

    /// Debug data, regardless of debug mode.
    #[inline]
    pub fn debug_value(&self) -> Option<&Value> {
        self.state.envelope.meta.debug.as_ref()
    }

    /// Payload computed by the last send attempt.
    #[inline]
    pub fn payload(&self) -> Option<&Value> {
        self.state.payload.as_ref()
    }

    /// Check if a terminal send has succeeded.
    #[inline]
    pub fn is_sent(&self) -> bool {
        self.state.sent
    }

    #[inline]
    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    /// The adapter this reply writes to.
    #[inline]
    pub fn adapter(&self) -> &dyn Adapter {
        &*self.adapter
    }

    #[inline]
    pub fn adapter_mut(&mut self) -> &mut dyn Adapter {
        &mut *self.adapter
    }

    /// Register a callback run right before the response is written.
    ///
    /// Callbacks run once, in registration order, whichever sender is used.
    pub fn defer<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.state.defers.push(Box::new(f));
        self
    }

    /// Run one send through the shared lifecycle.
    #[track_caller]
    pub(crate) fn send<F>(&mut self, sender: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Adapter, &mut ReplyState, &'static Location<'static>) -> Result<()>,
    {
        let location = Location::caller();

        if self.state.sent {
            return Err(Error::AlreadySent);
        }

        if let Err(e) = self.finalize() {
            log_error(&e, location);
            return Err(e);
        }
        self.exec_defer();

        if let Err(e) = sender(&mut *self.adapter, &mut self.state, location) {
            log_error(&e, location);
            return Err(e);
        }

        self.state.sent = true;
        Ok(())
    }

    /// Run the finalizer and compute the outgoing payload.
    fn finalize(&mut self) -> Result<()> {
        let client = Arc::clone(&self.client);

        if let Some(finalizer) = &client.finalizer {
            finalizer(self);
        }

        let payload = match &client.transformer {
            Some(transformer) => transformer(self),
            None => {
                let meta = &self.state.envelope.meta;
                let mut value = serde_json::to_value(&self.state.envelope)?;
                if !client.debug_mode() && meta.debug.is_some() {
                    if let Some(meta) = value.get_mut("meta").and_then(Value::as_object_mut) {
                        meta.remove("debug");
                    }
                }
                value
            }
        };

        self.state.payload = Some(payload);
        Ok(())
    }

    fn exec_defer(&mut self) {
        for f in std::mem::take(&mut self.state.defers) {
            f();
        }
    }

    /// Status for `fail_*` senders: explicit, then code alias, then 500.
    fn fail_status(&self, explicit: Option<StatusCode>) -> StatusCode {
        explicit
            .or_else(|| {
                self.state
                    .envelope
                    .data
                    .as_error()
                    .and_then(|e| self.client.code_alias(&e.code))
            })
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Drop for Reply<'_> {
    fn drop(&mut self) {
        if self.persist {
            let state = std::mem::take(&mut self.state);
            self.adapter.set(&self.client.store_key, Box::new(state));
        }
    }
}

impl std::fmt::Debug for Reply<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply")
            .field("envelope", &self.state.envelope)
            .field("payload", &self.state.payload)
            .field("sent", &self.state.sent)
            .field("defers", &self.state.defers.len())
            .finish_non_exhaustive()
    }
}

fn log_error(err: &Error, location: &Location<'_>) {
    tracing::error!(
        file = location.file(),
        line = location.line(),
        error = %err,
        "failed to send reply"
    );
}

/// Log a data/sender mismatch at the caller's location.
fn log_data_mismatch(location: &Location<'_>, expected: &'static str, found: &Data) {
    tracing::error!(
        file = location.file(),
        line = location.line(),
        expected,
        found = found.kind(),
        "reply data type does not match sender, sending empty body"
    );
}
