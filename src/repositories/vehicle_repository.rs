//! Vehicle repository

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{
    maintenance::MaintenanceLog,
    vehicle::{Vehicle, VehicleStatus, VehicleType},
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::ids;

/// Fully-resolved input for vehicle registration (legacy defaults already
/// applied at the boundary)
#[derive(Debug)]
pub struct NewVehicle {
    pub name: String,
    pub model: String,
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub max_load_kg: i32,
    pub odometer_km: i32,
    pub region: String,
    pub acquisition_cost: Option<Decimal>,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn list_in_shop(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE status = 'in_shop' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Full maintenance history, for attaching to the vehicle listing
    pub async fn list_maintenance(&self) -> AppResult<Vec<MaintenanceLog>> {
        let logs = sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs ORDER BY opened_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    pub async fn plate_exists(&self, plate: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate = $1)")
                .bind(plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn create(&self, input: NewVehicle) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, name, model, plate, vehicle_type, max_load_kg, odometer_km, region, status, acquisition_cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(ids::vehicle_id())
        .bind(&input.name)
        .bind(&input.model)
        .bind(&input.plate)
        .bind(input.vehicle_type)
        .bind(input.max_load_kg)
        .bind(input.odometer_km)
        .bind(&input.region)
        .bind(VehicleStatus::Available)
        .bind(input.acquisition_cost)
        .fetch_one(&self.pool)
        .await
        .map_err(map_plate_conflict)?;

        Ok(vehicle)
    }

    /// Administrative status override. Bypasses all trip-derived logic;
    /// the caller is trusted.
    pub async fn update_status(&self, id: &str, status: VehicleStatus) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("VEHICLE_NOT_FOUND", "Vehicle not found"))
    }
}

/// The unique index on plate backs the friendly pre-check in the handler.
fn map_plate_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505")
            && db.constraint() == Some("vehicles_plate_unique_idx")
        {
            return AppError::conflict("PLATE_CONFLICT", "Vehicle plate already exists");
        }
    }
    AppError::Database(err)
}
