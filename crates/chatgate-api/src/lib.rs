//! HTTP application layer for chatgate.
//!
//! Exposed as a library so integration tests can build the router against
//! mock upstreams; the `chatgate` binary lives in `main.rs`.

pub mod http;
pub mod state;
