//! Project configuration
//!
//! Database and environment configuration for the service.

pub mod database;
pub mod environment;

pub use environment::*;
