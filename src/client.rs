//! Shared reply configuration.
//!
//! A [`Client`] is built once (per process or per subsystem) and shared as
//! `Arc<Client>`. Every [`Reply`] holds a reference to it for hooks, code
//! aliases, presets and the pagination strategy.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_reply::{Client, PaginationType};
//!
//! let client = Client::builder()
//!     .code_alias("NOT_FOUND", StatusCode::NOT_FOUND)
//!     .default_header("X-API-Version", "v2")
//!     .pagination(PaginationType::Page)
//!     .add_preset("RESOURCE_NOT_FOUND", |rp, args| {
//!         let resource = args.first().and_then(|v| v.as_str()).unwrap_or("resource");
//!         rp.error("NOT_FOUND", format!("{} not found.", resource));
//!     })
//!     .build();
//!
//! let mut adapter = HttpAdapter::for_request(&req);
//! client.new_reply(&mut adapter).success(users).ok_json()?;
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use serde_json::Value;

use crate::adapter::Adapter;
use crate::config::{self, ReplyConfig};
use crate::core::Result;
use crate::reply::{Reply, ReplyState};

/// Hook run at send time before the payload is computed. Side effects only.
pub type Finalizer = Arc<dyn Fn(&mut Reply<'_>) + Send + Sync>;

/// Hook producing the outgoing JSON/XML payload instead of the envelope.
pub type Transformer = Arc<dyn Fn(&Reply<'_>) -> Value + Send + Sync>;

/// Named builder function applied by `Reply::use_preset`.
pub type Preset = Arc<dyn Fn(&mut Reply<'_>, &[Value]) + Send + Sync>;

/// Named terminal function invoked by `Reply::send_preset`.
pub type SendPreset = Arc<dyn Fn(&mut Reply<'_>, &[Value]) -> Result<()> + Send + Sync>;

/// Pagination strategy used by `paginate_total` and `paginate_cursor`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaginationType {
    /// `current`/`next` are zero-based page numbers.
    Page,
    /// `current`/`next` are item offsets.
    #[default]
    Offset,
}

impl PaginationType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaginationType::Page => "page",
            PaginationType::Offset => "offset",
        }
    }
}

impl FromStr for PaginationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "page" => Ok(PaginationType::Page),
            "offset" => Ok(PaginationType::Offset),
            other => Err(format!("expected 'page' or 'offset', got '{}'", other)),
        }
    }
}

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Shared reply configuration.
pub struct Client {
    pub(crate) finalizer: Option<Finalizer>,
    pub(crate) transformer: Option<Transformer>,
    code_aliases: HashMap<String, StatusCode>,
    default_headers: Vec<(HeaderName, HeaderValue)>,
    pagination_type: PaginationType,
    pub(crate) presets: HashMap<String, Preset>,
    pub(crate) sender_presets: HashMap<String, SendPreset>,
    debug_mode: bool,
    production: bool,
    warned_debug: AtomicBool,
    /// Per-request store key for `use_reply`; unique per client.
    pub(crate) store_key: String,
}

impl Client {
    /// Create a client builder.
    #[inline]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a fresh reply bound to this client and `adapter`.
    ///
    /// Default headers are set on the adapter immediately.
    pub fn new_reply<'a>(self: &Arc<Self>, adapter: &'a mut dyn Adapter) -> Reply<'a> {
        let headers = adapter.headers_mut();
        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }

        if self.debug_mode
            && self.production
            && !self.warned_debug.swap(true, Ordering::Relaxed)
        {
            tracing::warn!(
                "reply debug mode is enabled in a production environment; debug data will be sent to clients"
            );
        }

        Reply::from_parts(adapter, Arc::clone(self), ReplyState::default(), false)
    }

    /// Get the reply for this request, creating it on first use.
    ///
    /// The reply state lives in the adapter's per-request store between
    /// calls, so every `use_reply` within one request sees the same
    /// envelope, deferred callbacks and `sent` flag. Adapters without a store
    /// get a fresh reply each time.
    pub fn use_reply<'a>(self: &Arc<Self>, adapter: &'a mut dyn Adapter) -> Reply<'a> {
        let stored = adapter
            .take(&self.store_key)
            .and_then(|value| value.downcast::<ReplyState>().ok());

        match stored {
            Some(state) => Reply::from_parts(adapter, Arc::clone(self), *state, true),
            None => self.new_reply(adapter).persistent(),
        }
    }

    /// Configured pagination strategy.
    #[inline]
    pub fn pagination_type(&self) -> PaginationType {
        self.pagination_type
    }

    /// Whether debug data is included in envelopes.
    #[inline]
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Whether the client was built for a production environment.
    #[inline]
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// HTTP status mapped to an application error code.
    #[inline]
    pub fn code_alias(&self, code: &str) -> Option<StatusCode> {
        self.code_aliases.get(code).copied()
    }

    /// Headers applied to every new reply.
    #[inline]
    pub fn default_headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.default_headers
    }

    #[inline]
    pub fn has_preset(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    #[inline]
    pub fn has_sender_preset(&self, name: &str) -> bool {
        self.sender_presets.contains_key(name)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut presets: Vec<_> = self.presets.keys().collect();
        presets.sort();
        let mut sender_presets: Vec<_> = self.sender_presets.keys().collect();
        sender_presets.sort();

        f.debug_struct("Client")
            .field("finalizer", &self.finalizer.is_some())
            .field("transformer", &self.transformer.is_some())
            .field("code_aliases", &self.code_aliases)
            .field("default_headers", &self.default_headers)
            .field("pagination_type", &self.pagination_type)
            .field("presets", &presets)
            .field("sender_presets", &sender_presets)
            .field("debug_mode", &self.debug_mode)
            .field("production", &self.production)
            .finish()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    finalizer: Option<Finalizer>,
    transformer: Option<Transformer>,
    code_aliases: HashMap<String, StatusCode>,
    default_headers: Vec<(HeaderName, HeaderValue)>,
    pagination_type: PaginationType,
    presets: HashMap<String, Preset>,
    sender_presets: HashMap<String, SendPreset>,
    debug_mode: bool,
    production: Option<bool>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a builder with no hooks, offset pagination and debug off.
    pub fn new() -> Self {
        Self {
            finalizer: None,
            transformer: None,
            code_aliases: HashMap::new(),
            default_headers: Vec::new(),
            pagination_type: PaginationType::default(),
            presets: HashMap::new(),
            sender_presets: HashMap::new(),
            debug_mode: false,
            production: None,
        }
    }

    /// Create a builder from environment-derived configuration.
    pub fn from_config(config: &ReplyConfig) -> Self {
        let mut builder = Self::new()
            .pagination(config.pagination_type)
            .debug_mode(config.debug_mode)
            .production(config.production)
            .code_aliases(config.code_aliases.iter().map(|(k, v)| (k.clone(), *v)));
        for (name, value) in &config.default_headers {
            builder = builder.default_header(name, value);
        }
        builder
    }

    /// Set the finalizer hook.
    pub fn finalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Reply<'_>) + Send + Sync + 'static,
    {
        self.finalizer = Some(Arc::new(f));
        self
    }

    /// Set the transformer hook.
    pub fn transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Reply<'_>) -> Value + Send + Sync + 'static,
    {
        self.transformer = Some(Arc::new(f));
        self
    }

    /// Map an application error code to an HTTP status for `fail_*` senders.
    pub fn code_alias(mut self, code: impl Into<String>, status: StatusCode) -> Self {
        self.code_aliases.insert(code.into(), status);
        self
    }

    /// Add several code aliases.
    pub fn code_aliases<I, K>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, StatusCode)>,
        K: Into<String>,
    {
        self.code_aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Add a header set on every new reply. Invalid headers are skipped.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.default_headers.retain(|(n, _)| *n != name);
                self.default_headers.push((name, value));
            }
            _ => {
                tracing::warn!(header = name.as_ref(), "skipping invalid default header");
            }
        }
        self
    }

    /// Set the pagination strategy.
    pub fn pagination(mut self, pagination_type: PaginationType) -> Self {
        self.pagination_type = pagination_type;
        self
    }

    /// Include `meta.debug` in envelopes.
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Override production detection (defaults to `APP_ENV`/`RUST_ENV`).
    pub fn production(mut self, production: bool) -> Self {
        self.production = Some(production);
        self
    }

    /// Register a builder preset. A later registration under the same name wins.
    pub fn add_preset<F>(mut self, name: impl Into<String>, preset: F) -> Self
    where
        F: Fn(&mut Reply<'_>, &[Value]) + Send + Sync + 'static,
    {
        self.presets.insert(name.into(), Arc::new(preset));
        self
    }

    /// Register a sender preset. A later registration under the same name wins.
    pub fn add_sender_preset<F>(mut self, name: impl Into<String>, preset: F) -> Self
    where
        F: Fn(&mut Reply<'_>, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.sender_presets.insert(name.into(), Arc::new(preset));
        self
    }

    /// Build the shared client.
    pub fn build(self) -> Arc<Client> {
        let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
        Arc::new(Client {
            finalizer: self.finalizer,
            transformer: self.transformer,
            code_aliases: self.code_aliases,
            default_headers: self.default_headers,
            pagination_type: self.pagination_type,
            presets: self.presets,
            sender_presets: self.sender_presets,
            debug_mode: self.debug_mode,
            production: self.production.unwrap_or_else(config::is_production_env),
            warned_debug: AtomicBool::new(false),
            store_key: format!("tokio_reply.client.{}", id),
        })
    }
}
