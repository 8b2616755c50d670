//! Trip model
//!
//! Maps to the `trips` table. State machine:
//! `draft -> dispatched -> {completed | cancelled}`, with `draft ->
//! cancelled` also legal. `dispatched` is the sole transient active state;
//! the partial unique indexes on (vehicle_id) and (driver_id) scoped to
//! `status = 'dispatched'` are the structural guarantee that no vehicle or
//! driver ever holds two active trips.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Trip status - maps to the ENUM trip_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "trip_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Draft,
    Dispatched,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }
}

/// Maps exactly to the trips table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    pub cargo_id: Option<String>,
    pub cargo_weight_kg: i32,
    pub origin: String,
    pub destination: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: TripStatus,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_cancelled_are_terminal() {
        assert!(!TripStatus::Draft.is_terminal());
        assert!(!TripStatus::Dispatched.is_terminal());
        assert!(TripStatus::Completed.is_terminal());
        assert!(TripStatus::Cancelled.is_terminal());
    }
}
