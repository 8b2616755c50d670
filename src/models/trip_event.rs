//! Trip event model
//!
//! Append-only audit rows written inside each lifecycle transaction.
//! Business logic never reads this table; it is a write-only side channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserRole;

pub const TRIP_CREATED: &str = "trip_created";
pub const TRIP_DISPATCHED: &str = "trip_dispatched";
pub const TRIP_COMPLETED: &str = "trip_completed";
pub const TRIP_CANCELLED: &str = "trip_cancelled";

/// Maps exactly to the trip_events table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripEvent {
    pub id: String,
    pub trip_id: String,
    pub event_type: String,
    pub message: String,
    pub actor_role: Option<UserRole>,
    pub created_at: DateTime<Utc>,
}
