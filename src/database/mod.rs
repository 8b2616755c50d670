//! Database module
//!
//! Connection pooling, migrations and demo seeding for PostgreSQL.

pub mod connection;
pub mod seed;

pub use connection::{create_pool, run_migrations};
