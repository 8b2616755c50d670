//! Request/response DTOs
//!
//! Wire shapes for the HTTP API, including the legacy field aliases the
//! old frontend still depends on. The domain models stay canonical; all
//! compatibility remapping happens here.

pub mod auth_dto;
pub mod common;
pub mod driver_dto;
pub mod trip_dto;
pub mod vehicle_dto;
