//! HTTP middleware
//!
//! Authentication and CORS layers applied in `main`.

pub mod auth;
pub mod cors;
