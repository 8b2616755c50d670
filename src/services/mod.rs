//! Business services
//!
//! The lifecycle engines (trips, maintenance) plus auth and read-only
//! analytics. All multi-entity writes happen here, inside transactions.

pub mod analytics_service;
pub mod auth_service;
pub mod maintenance_service;
pub mod trip_service;
