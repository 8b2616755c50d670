//! Cargo shipment model
//!
//! Shipment lifecycle is driven entirely by the trip that references it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Cargo status - maps to the ENUM cargo_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "cargo_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CargoStatus {
    Pending,
    Assigned,
    Completed,
    Cancelled,
}

/// Maps exactly to the cargo_shipments table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CargoShipment {
    pub id: String,
    pub reference_code: String,
    pub weight_kg: i32,
    pub region: String,
    pub status: CargoStatus,
    pub created_at: DateTime<Utc>,
}
