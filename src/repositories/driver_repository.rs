//! Driver repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::dto::driver_dto::UpdateDriverRequest;
use crate::models::driver::Driver;
use crate::utils::errors::{AppError, AppResult};

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Driver>> {
        let drivers =
            sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(drivers)
    }

    /// Drivers whose licence expires on or before the horizon
    pub async fn list_expiring(&self, horizon: DateTime<Utc>) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE license_expires_at <= $1 ORDER BY license_expires_at",
        )
        .bind(horizon)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    /// Partial update; absent fields keep their current value
    pub async fn update(&self, id: &str, patch: UpdateDriverRequest) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET status = coalesce($2, status),
                license_expires_at = coalesce($3, license_expires_at),
                license_category = coalesce($4, license_category),
                safety_score = coalesce($5, safety_score),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.license_expires_at)
        .bind(patch.license_category)
        .bind(patch.safety_score)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("DRIVER_NOT_FOUND", "Driver not found"))
    }
}
