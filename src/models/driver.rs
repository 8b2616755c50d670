//! Driver model
//!
//! Maps to the `drivers` table. The license category gates which vehicle
//! types a driver may be dispatched with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::models::vehicle::VehicleType;

/// Driver status - maps to the ENUM driver_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "driver_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    OnDuty,
    OffDuty,
    Suspended,
}

/// License category - maps to the ENUM license_category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "license_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LicenseCategory {
    Truck,
    Van,
    Bike,
    Multi,
}

impl LicenseCategory {
    /// `multi` matches any vehicle type; otherwise the category must equal
    /// the vehicle type exactly.
    pub fn matches(self, vehicle_type: VehicleType) -> bool {
        match self {
            LicenseCategory::Multi => true,
            LicenseCategory::Truck => vehicle_type == VehicleType::Truck,
            LicenseCategory::Van => vehicle_type == VehicleType::Van,
            LicenseCategory::Bike => vehicle_type == VehicleType::Bike,
        }
    }
}

/// Maps exactly to the drivers table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub license_number: String,
    pub license_category: LicenseCategory,
    pub license_expires_at: DateTime<Utc>,
    pub safety_score: i32,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_category_matches_every_vehicle_type() {
        for vt in [VehicleType::Truck, VehicleType::Van, VehicleType::Bike] {
            assert!(LicenseCategory::Multi.matches(vt));
        }
    }

    #[test]
    fn single_category_only_matches_its_own_type() {
        assert!(LicenseCategory::Van.matches(VehicleType::Van));
        assert!(!LicenseCategory::Van.matches(VehicleType::Truck));
        assert!(!LicenseCategory::Bike.matches(VehicleType::Van));
        assert!(LicenseCategory::Truck.matches(VehicleType::Truck));
    }
}
