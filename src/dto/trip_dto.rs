//! Trip DTOs
//!
//! Wire shapes for the trip lifecycle endpoints. `TripResponse` carries
//! both the canonical `workflow_status` and the legacy `status` alias the
//! old frontend expects (`draft` is surfaced as `planned`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::common::{validate_money, validate_positive_decimal};
use crate::models::{
    driver::Driver,
    finance::FuelLog,
    trip::{Trip, TripStatus},
    vehicle::Vehicle,
};

/// Request to create a draft trip
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    #[validate(length(min = 1))]
    pub vehicle_id: String,

    #[validate(length(min = 1))]
    pub driver_id: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub cargo_weight_kg: i32,

    pub cargo_id: Option<String>,

    #[validate(length(min = 2))]
    pub origin: String,

    #[validate(length(min = 2))]
    pub destination: String,

    pub scheduled_at: DateTime<Utc>,

    #[validate(custom = "validate_money")]
    pub revenue: Option<Decimal>,
}

/// Request to complete a dispatched trip
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteTripRequest {
    #[validate(range(min = 0))]
    pub final_odometer_km: i32,

    #[validate(custom = "validate_positive_decimal")]
    pub fuel_liters: Decimal,

    #[validate(custom = "validate_money")]
    pub fuel_cost: Decimal,

    pub completed_at: Option<DateTime<Utc>>,
}

/// Request to add an ad-hoc fuel log to a trip
#[derive(Debug, Deserialize, Validate)]
pub struct FuelLogRequest {
    #[validate(custom = "validate_positive_decimal")]
    pub liters: Decimal,

    #[validate(custom = "validate_money")]
    pub cost: Decimal,

    pub logged_at: Option<DateTime<Utc>>,
}

/// Trip response with legacy status aliasing
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    pub cargo_id: Option<String>,
    pub cargo_weight_kg: i32,
    pub origin: String,
    pub destination: String,
    pub scheduled_at: DateTime<Utc>,
    /// Legacy status name (`planned` instead of `draft`)
    pub status: String,
    /// Canonical state-machine status
    pub workflow_status: TripStatus,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub start_odometer_km: Option<i32>,
    pub end_odometer_km: Option<i32>,
    pub distance_km: Option<i32>,
    pub revenue: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn legacy_status(status: TripStatus) -> String {
    match status {
        TripStatus::Draft => "planned".to_string(),
        TripStatus::Dispatched => "dispatched".to_string(),
        TripStatus::Completed => "completed".to_string(),
        TripStatus::Cancelled => "cancelled".to_string(),
    }
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            status: legacy_status(trip.status),
            workflow_status: trip.status,
            id: trip.id,
            vehicle_id: trip.vehicle_id,
            driver_id: trip.driver_id,
            cargo_id: trip.cargo_id,
            cargo_weight_kg: trip.cargo_weight_kg,
            origin: trip.origin,
            destination: trip.destination,
            scheduled_at: trip.scheduled_at,
            dispatched_at: trip.dispatched_at,
            completed_at: trip.completed_at,
            cancelled_at: trip.cancelled_at,
            start_odometer_km: trip.start_odometer_km,
            end_odometer_km: trip.end_odometer_km,
            distance_km: trip.distance_km,
            revenue: trip.revenue,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

/// Response for trip completion: the updated trip plus the fuel log it
/// created
#[derive(Debug, Serialize)]
pub struct CompleteTripResponse {
    pub trip: TripResponse,
    pub fuel: FuelLog,
}

/// Dispatch availability snapshot
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
}
