//! Analytics read models
//!
//! Aggregate shapes for the dashboard and finance rollups. Read-only:
//! nothing here participates in a state transition.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Fleet dashboard counters
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub active_fleet: i64,
    pub maintenance_alerts: i64,
    pub utilization_rate: f64,
    pub pending_cargo: i64,
}

/// Raw per-vehicle finance aggregation row
#[derive(Debug, FromRow)]
pub struct VehicleFinanceRow {
    pub vehicle_id: String,
    pub plate: String,
    pub name: String,
    pub model: String,
    pub acquisition_cost: Option<Decimal>,
    pub liters: Decimal,
    pub fuel_cost: Decimal,
    pub maintenance_cost: Decimal,
    pub distance_km: i64,
    pub revenue: Decimal,
}

/// Per-vehicle finance rollup with derived efficiency and ROI
#[derive(Debug, Serialize)]
pub struct VehicleFinanceMetrics {
    pub vehicle_id: String,
    pub plate: String,
    pub name: String,
    pub model: String,
    pub distance_km: i64,
    pub liters: Decimal,
    pub fuel_cost: Decimal,
    pub maintenance_cost: Decimal,
    pub total_operational_cost: Decimal,
    pub fuel_efficiency_km_per_l: Option<f64>,
    pub revenue: Decimal,
    pub acquisition_cost: Option<Decimal>,
    pub roi: Option<f64>,
    pub roi_meta: String,
}

/// Legacy vehicle KPI block
#[derive(Debug, Serialize)]
pub struct VehicleKpis {
    pub total_vehicles: i64,
    pub in_shop: i64,
    pub active: i64,
    pub average_mileage: i64,
}
