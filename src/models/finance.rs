//! Financial records
//!
//! Fuel logs and expenses are append-only; they are never mutated after
//! creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Expense type - maps to the ENUM expense_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "expense_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    Fuel,
    Maintenance,
}

/// Maps exactly to the fuel_logs table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelLog {
    pub id: String,
    pub trip_id: String,
    pub vehicle_id: String,
    pub liters: Decimal,
    pub cost: Decimal,
    pub logged_at: DateTime<Utc>,
}

/// Maps exactly to the expenses table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub vehicle_id: String,
    pub trip_id: Option<String>,
    pub maintenance_log_id: Option<String>,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}
