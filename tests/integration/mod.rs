//! Integration tests for tokio_reply
//!
//! Each test starts an in-process hyper server on an ephemeral port whose
//! routes answer through `tokio_reply`, then talks to it with reqwest.
//!
//! Run with: cargo test --test integration

mod helpers;

mod context;
mod envelope;
mod formats;
mod headers;
