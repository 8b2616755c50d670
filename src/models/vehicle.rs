//! Vehicle model
//!
//! Maps to the `vehicles` table. Status is mutated only by the trip and
//! maintenance lifecycles, plus the administrative status override.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Vehicle type - maps to the ENUM vehicle_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "vehicle_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Truck,
    Van,
    Bike,
}

/// Vehicle status - maps to the ENUM vehicle_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    OnTrip,
    InShop,
    Retired,
}

/// Maps exactly to the vehicles table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub model: String,
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub max_load_kg: i32,
    pub odometer_km: i32,
    pub region: String,
    pub status: VehicleStatus,
    pub acquisition_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_in_wire_format() {
        assert_eq!(
            serde_json::to_string(&VehicleStatus::OnTrip).unwrap(),
            "\"on_trip\""
        );
        assert_eq!(
            serde_json::to_string(&VehicleStatus::InShop).unwrap(),
            "\"in_shop\""
        );
        let parsed: VehicleType = serde_json::from_str("\"truck\"").unwrap();
        assert_eq!(parsed, VehicleType::Truck);
    }
}
