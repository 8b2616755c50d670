//! Demo data seeding
//!
//! Inserts a small baseline fleet (two vehicles, two drivers, one draft
//! trip, one user per role) when the database is empty, so a fresh
//! environment is immediately usable. Idempotent: skips when any vehicle
//! exists.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::models::{
    driver::{DriverStatus, LicenseCategory},
    user::UserRole,
    vehicle::{VehicleStatus, VehicleType},
};
use crate::utils::ids;

pub async fn seed_if_empty(pool: &PgPool) -> Result<()> {
    let vehicle_count: i64 = sqlx::query_scalar("SELECT count(*) FROM vehicles")
        .fetch_one(pool)
        .await?;

    if vehicle_count > 0 {
        return Ok(());
    }

    info!("Empty database detected, seeding demo fleet");

    sqlx::query(
        r#"
        INSERT INTO vehicles (id, name, model, plate, vehicle_type, max_load_kg, odometer_km, region, status, acquisition_cost)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind("veh-001")
    .bind("Van")
    .bind("05")
    .bind("FF-1024")
    .bind(VehicleType::Van)
    .bind(500_i32)
    .bind(78320_i32)
    .bind("west")
    .bind(VehicleStatus::Available)
    .bind(Decimal::from(45000))
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO vehicles (id, name, model, plate, vehicle_type, max_load_kg, odometer_km, region, status, acquisition_cost)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind("veh-002")
    .bind("Truck")
    .bind("12")
    .bind("FF-1188")
    .bind(VehicleType::Truck)
    .bind(3200_i32)
    .bind(121402_i32)
    .bind("west")
    .bind(VehicleStatus::InShop)
    .bind(Decimal::from(92000))
    .execute(pool)
    .await?;

    // veh-002 is seeded in_shop; give it the matching open log so closing it
    // through the API behaves like any other maintenance cycle.
    sqlx::query(
        r#"
        INSERT INTO maintenance_logs (id, vehicle_id, note, cost, created_by_role)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(ids::maintenance_id())
    .bind("veh-002")
    .bind("Brake pads and rotor replacement")
    .bind(Decimal::new(48050, 2))
    .bind(UserRole::Manager)
    .execute(pool)
    .await?;

    let expires_1: DateTime<Utc> =
        DateTime::parse_from_rfc3339("2026-08-20T00:00:00Z")?.with_timezone(&Utc);
    let expires_2: DateTime<Utc> =
        DateTime::parse_from_rfc3339("2026-09-14T00:00:00Z")?.with_timezone(&Utc);

    sqlx::query(
        r#"
        INSERT INTO drivers (id, name, license_number, license_category, license_expires_at, status, safety_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind("drv-001")
    .bind("Marcus Hill")
    .bind("CA-DL-5521")
    .bind(LicenseCategory::Multi)
    .bind(expires_1)
    .bind(DriverStatus::OnDuty)
    .bind(88_i32)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO drivers (id, name, license_number, license_category, license_expires_at, status, safety_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind("drv-002")
    .bind("Angela Ruiz")
    .bind("CA-DL-6710")
    .bind(LicenseCategory::Van)
    .bind(expires_2)
    .bind(DriverStatus::OffDuty)
    .bind(93_i32)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO trips (id, vehicle_id, driver_id, cargo_weight_kg, origin, destination, scheduled_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind("trp-001")
    .bind("veh-001")
    .bind("drv-001")
    .bind(450_i32)
    .bind("Los Angeles, CA")
    .bind("San Diego, CA")
    .bind(Utc::now() + Duration::hours(1))
    .execute(pool)
    .await?;

    for (email, name, role, password) in [
        ("manager@fleetflow.test", "Dana Whitfield", UserRole::Manager, "manager123"),
        ("dispatch@fleetflow.test", "Omar Reyes", UserRole::Dispatcher, "dispatch123"),
        ("safety@fleetflow.test", "Priya Nair", UserRole::Safety, "safety123"),
        ("finance@fleetflow.test", "Ken Osei", UserRole::Finance, "finance123"),
    ] {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ids::user_id())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .execute(pool)
        .await?;
    }

    info!("Demo fleet seeded (2 vehicles, 2 drivers, 1 draft trip, 4 users)");

    Ok(())
}
