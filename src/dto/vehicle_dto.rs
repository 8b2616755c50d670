//! Vehicle DTOs
//!
//! Create/maintenance/status requests plus the listing response with the
//! legacy `mileage`/`unit_number` aliases. Maintenance history is attached
//! here and suppressed for the finance role.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::common::validate_money;
use crate::models::{
    maintenance::MaintenanceLog,
    vehicle::{Vehicle, VehicleStatus, VehicleType},
};

lazy_static! {
    static ref PLATE_RE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]{2,11}$").unwrap();
}

/// Request to register a vehicle. Legacy callers send `unit_number` and
/// `mileage` instead of name/odometer; defaults are applied in the
/// controller.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2))]
    pub name: Option<String>,

    #[validate(length(min = 1))]
    pub model: Option<String>,

    #[validate(regex = "PLATE_RE")]
    pub plate: String,

    pub vehicle_type: Option<VehicleType>,

    #[validate(range(min = 1))]
    pub max_load_kg: Option<i32>,

    #[validate(range(min = 0))]
    pub odometer_km: Option<i32>,

    #[validate(length(min = 2))]
    pub region: Option<String>,

    #[validate(custom = "validate_money")]
    pub acquisition_cost: Option<Decimal>,

    // legacy fields kept for old frontend calls
    #[validate(length(min = 2))]
    pub unit_number: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
}

/// Administrative status override; bypasses trip-derived logic
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleStatusRequest {
    pub status: VehicleStatus,
}

/// Request to open a maintenance log
#[derive(Debug, Deserialize, Validate)]
pub struct MaintenanceRequest {
    #[validate(length(min = 3))]
    pub note: String,

    #[serde(default)]
    #[validate(custom = "validate_money")]
    pub cost: Decimal,
}

/// Vehicle listing item with legacy aliases and attached maintenance
/// history
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
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
    /// Legacy alias for odometer_km
    pub mileage: i32,
    /// Legacy alias: `<name>-<model>`
    pub unit_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<Vec<MaintenanceLog>>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, maintenance: Option<Vec<MaintenanceLog>>) -> Self {
        Self {
            mileage: vehicle.odometer_km,
            unit_number: format!("{}-{}", vehicle.name, vehicle.model),
            id: vehicle.id,
            name: vehicle.name,
            model: vehicle.model,
            plate: vehicle.plate,
            vehicle_type: vehicle.vehicle_type,
            max_load_kg: vehicle.max_load_kg,
            odometer_km: vehicle.odometer_km,
            region: vehicle.region,
            status: vehicle.status,
            acquisition_cost: vehicle.acquisition_cost,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
            maintenance,
        }
    }
}
