//! tokio_reply - uniform HTTP replies for `http`/`hyper` services.
//!
//! Every handler answers through the same builder. It sets data, metadata,
//! pagination, headers and cookies, then sends the result as JSON, XML, text,
//! HTML, raw bytes, a stream, a redirect or an empty 204.
//!
//! # Features
//!
//! - **Standard envelope**: `{"meta": {...}, "data": ...}` for JSON and XML
//! - **Adapters**: one trait over the HTTP context, with a bare `http` adapter
//!   and a request-context adapter for per-request reuse
//! - **Hooks**: finalizer and transformer run at send time
//! - **Presets**: named builder and sender functions registered once
//! - **Pagination**: page or offset strategy, total-count or cursor based
//! - **Streaming**: async readers become hyper bodies without buffering
//! - **Logging**: send failures and data mismatches are logged with the
//!   caller's file and line
//!
//! # Architecture
//!
//! - [`Client`] - shared configuration, built once and shared as `Arc`
//! - [`Reply`] - per-request builder, borrows an [`Adapter`]
//! - [`Adapter`] - writes status, headers and body for one HTTP context
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_reply::{Client, HttpAdapter};
//!
//! let client = Client::builder()
//!     .code_alias("NOT_FOUND", StatusCode::NOT_FOUND)
//!     .build();
//!
//! async fn handle(req: Request<Incoming>) -> Result<Response<ReplyBody>, Infallible> {
//!     let mut adapter = HttpAdapter::for_request(&req);
//!     let mut rp = client.new_reply(&mut adapter);
//!     match find_user(&req).await {
//!         Some(user) => rp.success_json(&user)?.ok_json(),
//!         None => rp.error("NOT_FOUND", "user not found").fail_json(),
//!     };
//!     drop(rp);
//!     Ok(adapter.into_response())
//! }
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapter;
pub mod client;
pub mod config;
pub mod cookie;
pub mod core;
pub mod logging;
pub mod reply;
pub mod time;

// Re-exports for convenience
pub use adapter::{Adapter, ContextAdapter, HttpAdapter, ReplyBody};
pub use client::{Client, ClientBuilder, PaginationType};
pub use config::Config;
pub use cookie::{Cookie, SameSite};
pub use crate::core::{Error, RequestContext, Result};
pub use reply::{Data, ErrorOpt, Reply, StreamSource};
