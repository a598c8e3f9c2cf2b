//! Request extractors: access check and session header.

pub mod auth;
pub mod session;
