//! Maintenance log model
//!
//! A log with no `closed_at` is open and blocks the vehicle's return to
//! `available`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserRole;

/// Maps exactly to the maintenance_logs table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceLog {
    pub id: String,
    pub vehicle_id: String,
    pub note: String,
    pub cost: Decimal,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_by_role: UserRole,
}

impl MaintenanceLog {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}
