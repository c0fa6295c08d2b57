//! Core types shared by adapters and replies.
//!
//! - [`RequestContext`] - request-scoped state and value store
//! - [`Error`] - error type for every reply and adapter operation
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_reply::core::RequestContext;
//!
//! let mut ctx = RequestContext::new();
//! ctx.set_response_header("X-Request-Id", ctx.request_id.clone());
//! ctx.set("tenant", "acme".to_string());
//! ```

mod context;
mod error;

pub use context::{generate_request_id, RequestContext};
pub use error::{Error, Result};
