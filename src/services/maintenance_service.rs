//! Maintenance lifecycle
//!
//! Secondary state machine on vehicles: opening a log forces the vehicle
//! into the shop; closing one recomputes availability inside the same
//! transaction as the close write, so a stale read can never resurrect an
//! unavailable vehicle.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::dto::vehicle_dto::MaintenanceRequest;
use crate::models::{
    finance::ExpenseType,
    maintenance::MaintenanceLog,
    user::UserRole,
    vehicle::{Vehicle, VehicleStatus},
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::ids;

pub struct MaintenanceService {
    pool: PgPool,
}

impl MaintenanceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a maintenance log and force the vehicle into the shop. The
    /// status write is unconditional: pulling an on-trip vehicle into
    /// maintenance is an administrative override, not a checked
    /// transition.
    pub async fn open_log(
        &self,
        vehicle_id: &str,
        input: MaintenanceRequest,
        actor: UserRole,
    ) -> AppResult<MaintenanceLog> {
        let mut tx = self.pool.begin().await?;

        fetch_vehicle(&mut tx, vehicle_id).await?;

        let log = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs (id, vehicle_id, note, cost, created_by_role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ids::maintenance_id())
        .bind(vehicle_id)
        .bind(&input.note)
        .bind(input.cost)
        .bind(actor)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE vehicles SET status = $2, updated_at = now() WHERE id = $1")
            .bind(vehicle_id)
            .bind(VehicleStatus::InShop)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, type, vehicle_id, maintenance_log_id, amount, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(ids::expense_id())
        .bind(ExpenseType::Maintenance)
        .bind(vehicle_id)
        .bind(&log.id)
        .bind(input.cost)
        .bind(&input.note)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(vehicle_id = %vehicle_id, log_id = %log.id, "Maintenance log opened");

        Ok(log)
    }

    /// Close a maintenance log. The vehicle returns to `available` only if
    /// no dispatched trip and no other open log exist and the vehicle is
    /// not retired; all three facts are re-queried inside this
    /// transaction.
    pub async fn close_log(&self, vehicle_id: &str, log_id: &str) -> AppResult<MaintenanceLog> {
        let mut tx = self.pool.begin().await?;

        let vehicle = fetch_vehicle(&mut tx, vehicle_id).await?;

        let log = sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs WHERE id = $1 AND vehicle_id = $2",
        )
        .bind(log_id)
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("MAINT_NOT_FOUND", "Maintenance log not found"))?;

        if !log.is_open() {
            return Err(AppError::conflict(
                "MAINT_DONE",
                "Maintenance already completed",
            ));
        }

        let closed = sqlx::query_as::<_, MaintenanceLog>(
            "UPDATE maintenance_logs SET closed_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(log_id)
        .fetch_one(&mut *tx)
        .await?;

        let dispatched_trip: Option<String> = sqlx::query_scalar(
            "SELECT id FROM trips WHERE vehicle_id = $1 AND status = 'dispatched' LIMIT 1",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        let open_log: Option<String> = sqlx::query_scalar(
            "SELECT id FROM maintenance_logs WHERE vehicle_id = $1 AND closed_at IS NULL LIMIT 1",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        if may_return_to_available(dispatched_trip.is_some(), open_log.is_some(), vehicle.status) {
            sqlx::query("UPDATE vehicles SET status = $2, updated_at = now() WHERE id = $1")
                .bind(vehicle_id)
                .bind(VehicleStatus::Available)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(vehicle_id = %vehicle_id, log_id = %log_id, "Maintenance log closed");

        Ok(closed)
    }
}

/// A vehicle leaves the shop only when nothing else holds it.
fn may_return_to_available(
    has_dispatched_trip: bool,
    has_open_log: bool,
    status: VehicleStatus,
) -> bool {
    !has_dispatched_trip && !has_open_log && status != VehicleStatus::Retired
}

async fn fetch_vehicle(tx: &mut Transaction<'_, Postgres>, id: &str) -> AppResult<Vehicle> {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found("VEHICLE_NOT_FOUND", "Vehicle not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_returns_to_available_only_when_fully_released() {
        assert!(may_return_to_available(false, false, VehicleStatus::InShop));

        // A dispatched trip, another open log, or retirement each block it.
        assert!(!may_return_to_available(true, false, VehicleStatus::InShop));
        assert!(!may_return_to_available(false, true, VehicleStatus::InShop));
        assert!(!may_return_to_available(false, false, VehicleStatus::Retired));
    }
}
