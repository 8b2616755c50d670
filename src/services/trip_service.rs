//! Trip lifecycle engine
//!
//! The state machine over trips and the entities they commit:
//! `draft -> dispatched -> {completed | cancelled}` (and `draft ->
//! cancelled`). Every transition runs as a single transaction spanning all
//! of its reads and writes, so a partially applied transition is never
//! observable. Dispatch is the correctness-critical path: its availability
//! checks are re-validated inside the write transaction and the partial
//! unique indexes on dispatched trips reject the loser of any remaining
//! race at commit time.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

use crate::dto::trip_dto::{
    AvailabilityResponse, CompleteTripRequest, CreateTripRequest, FuelLogRequest,
};
use crate::models::{
    cargo::CargoStatus,
    driver::{Driver, DriverStatus},
    finance::{ExpenseType, FuelLog},
    trip::{Trip, TripStatus},
    trip_event,
    user::UserRole,
    vehicle::{Vehicle, VehicleStatus},
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::ids;

/// Bounded transparent retries for store-level dispatch races.
const MAX_DISPATCH_ATTEMPTS: u32 = 3;

pub struct TripService {
    pool: PgPool,
}

impl TripService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_trips(&self) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(trips)
    }

    /// Insert a trip in `draft`. A draft is a plan, not a commitment:
    /// vehicle and driver status are untouched and availability is not
    /// checked until dispatch.
    pub async fn create_trip(&self, input: CreateTripRequest, actor: UserRole) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (id, vehicle_id, driver_id, cargo_id, cargo_weight_kg, origin, destination, scheduled_at, revenue)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(ids::trip_id())
        .bind(&input.vehicle_id)
        .bind(&input.driver_id)
        .bind(&input.cargo_id)
        .bind(input.cargo_weight_kg)
        .bind(&input.origin)
        .bind(&input.destination)
        .bind(input.scheduled_at)
        .bind(input.revenue)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_trip_reference_error)?;

        append_event(
            &mut tx,
            &trip.id,
            trip_event::TRIP_CREATED,
            "Trip created in draft state".to_string(),
            actor,
        )
        .await?;

        tx.commit().await?;

        info!(trip_id = %trip.id, "Trip created in draft state");

        Ok(trip)
    }

    /// Dispatch a draft trip, committing its vehicle and driver.
    ///
    /// Serialization failures and partial-unique-index violations mean we
    /// lost a race against a concurrent dispatch; those are retried a
    /// bounded number of times (the re-read then usually produces the
    /// friendlier unavailability error) before a conflict is surfaced.
    pub async fn dispatch_trip(
        &self,
        id: &str,
        actor: UserRole,
        now: DateTime<Utc>,
    ) -> AppResult<Trip> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_dispatch(id, actor, now).await {
                Err(AppError::Database(err)) if is_dispatch_race(&err) => {
                    if attempt >= MAX_DISPATCH_ATTEMPTS {
                        warn!(trip_id = %id, attempts = attempt, "Dispatch retries exhausted");
                        return Err(AppError::conflict(
                            "DISPATCH_CONFLICT",
                            "Vehicle or driver was claimed by a concurrent dispatch",
                        ));
                    }
                    let jitter_ms = rand::thread_rng().gen_range(5..25) * u64::from(attempt);
                    tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
                }
                other => return other,
            }
        }
    }

    async fn try_dispatch(
        &self,
        id: &str,
        actor: UserRole,
        now: DateTime<Utc>,
    ) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = fetch_trip(&mut tx, id).await?;

        if trip.status != TripStatus::Draft {
            return Err(AppError::conflict(
                "INVALID_TRIP_STATE",
                "Only draft trips can be dispatched",
            ));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(&trip.vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("VEHICLE_NOT_FOUND", "Vehicle not found"))?;

        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(&trip.driver_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("DRIVER_NOT_FOUND", "Driver not found"))?;

        dispatch_preconditions(&trip, &vehicle, &driver, now)?;

        // Re-validate the one-active-trip invariants inside the write
        // transaction; the partial unique indexes remain the backstop for
        // anything that commits between these reads and ours.
        let busy_vehicle: Option<String> = sqlx::query_scalar(
            "SELECT id FROM trips WHERE vehicle_id = $1 AND status = 'dispatched' LIMIT 1",
        )
        .bind(&trip.vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        if busy_vehicle.is_some() {
            return Err(AppError::conflict(
                "VEHICLE_UNAVAILABLE",
                "Vehicle already on dispatched trip",
            ));
        }

        let busy_driver: Option<String> = sqlx::query_scalar(
            "SELECT id FROM trips WHERE driver_id = $1 AND status = 'dispatched' LIMIT 1",
        )
        .bind(&trip.driver_id)
        .fetch_optional(&mut *tx)
        .await?;

        if busy_driver.is_some() {
            return Err(AppError::conflict(
                "DRIVER_UNAVAILABLE",
                "Driver already on dispatched trip",
            ));
        }

        // The trip's start odometer is a snapshot of the vehicle's reading
        // at dispatch time.
        let updated = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $2, dispatched_at = $3, start_odometer_km = $4, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&trip.id)
        .bind(TripStatus::Dispatched)
        .bind(now)
        .bind(vehicle.odometer_km)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE vehicles SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(&trip.vehicle_id)
            .bind(VehicleStatus::OnTrip)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if let Some(cargo_id) = &trip.cargo_id {
            sqlx::query("UPDATE cargo_shipments SET status = $2 WHERE id = $1")
                .bind(cargo_id)
                .bind(CargoStatus::Assigned)
                .execute(&mut *tx)
                .await?;
        }

        append_event(
            &mut tx,
            &trip.id,
            trip_event::TRIP_DISPATCHED,
            "Trip dispatched".to_string(),
            actor,
        )
        .await?;

        tx.commit().await?;

        info!(
            trip_id = %updated.id,
            vehicle_id = %updated.vehicle_id,
            driver_id = %updated.driver_id,
            "Trip dispatched"
        );

        Ok(updated)
    }

    /// Complete a dispatched trip: record the final odometer, settle the
    /// vehicle's next status, and book the trip's fuel.
    pub async fn complete_trip(
        &self,
        id: &str,
        payload: CompleteTripRequest,
        actor: UserRole,
    ) -> AppResult<(Trip, FuelLog)> {
        let mut tx = self.pool.begin().await?;

        let trip = fetch_trip(&mut tx, id).await?;

        if trip.status != TripStatus::Dispatched {
            return Err(AppError::conflict(
                "INVALID_TRIP_STATE",
                "Only dispatched trips can be completed",
            ));
        }

        let start_odometer = trip.start_odometer_km.ok_or_else(|| {
            AppError::conflict("INVALID_TRIP_STATE", "Trip start odometer missing")
        })?;

        let distance_km = trip_distance(start_odometer, payload.final_odometer_km)?;
        let completed_at = payload.completed_at.unwrap_or_else(Utc::now);

        let updated = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $2, completed_at = $3, end_odometer_km = $4, distance_km = $5, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&trip.id)
        .bind(TripStatus::Completed)
        .bind(completed_at)
        .bind(payload.final_odometer_km)
        .bind(distance_km)
        .fetch_one(&mut *tx)
        .await?;

        let next_status = vehicle_status_after_trip(
            has_open_maintenance(&mut tx, &trip.vehicle_id).await?,
        );

        sqlx::query(
            "UPDATE vehicles SET odometer_km = $2, status = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(&trip.vehicle_id)
        .bind(payload.final_odometer_km)
        .bind(next_status)
        .bind(completed_at)
        .execute(&mut *tx)
        .await?;

        let fuel = insert_fuel_log(
            &mut tx,
            &trip.id,
            &trip.vehicle_id,
            &FuelLogRequest {
                liters: payload.fuel_liters,
                cost: payload.fuel_cost,
                logged_at: Some(completed_at),
            },
        )
        .await?;

        if let Some(cargo_id) = &trip.cargo_id {
            sqlx::query("UPDATE cargo_shipments SET status = $2 WHERE id = $1")
                .bind(cargo_id)
                .bind(CargoStatus::Completed)
                .execute(&mut *tx)
                .await?;
        }

        append_event(
            &mut tx,
            &trip.id,
            trip_event::TRIP_COMPLETED,
            format!("Trip completed; distance {} km", distance_km),
            actor,
        )
        .await?;

        tx.commit().await?;

        info!(trip_id = %updated.id, distance_km, "Trip completed");

        Ok((updated, fuel))
    }

    /// Cancel a trip. A dispatched trip releases its vehicle (unless an
    /// open maintenance log keeps it in the shop); the driver is not
    /// touched and becomes reassignable as soon as no dispatched trip
    /// references them.
    pub async fn cancel_trip(&self, id: &str, actor: UserRole) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = fetch_trip(&mut tx, id).await?;

        if trip.status == TripStatus::Completed {
            return Err(AppError::conflict(
                "INVALID_TRIP_STATE",
                "Completed trips cannot be cancelled",
            ));
        }

        if trip.status == TripStatus::Cancelled {
            return Err(AppError::conflict(
                "INVALID_TRIP_STATE",
                "Trip already cancelled",
            ));
        }

        let now = Utc::now();

        let updated = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $2, cancelled_at = $3, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&trip.id)
        .bind(TripStatus::Cancelled)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        if trip.status == TripStatus::Dispatched {
            let next_status = vehicle_status_after_trip(
                has_open_maintenance(&mut tx, &trip.vehicle_id).await?,
            );

            sqlx::query("UPDATE vehicles SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(&trip.vehicle_id)
                .bind(next_status)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(cargo_id) = &trip.cargo_id {
            sqlx::query("UPDATE cargo_shipments SET status = $2 WHERE id = $1")
                .bind(cargo_id)
                .bind(CargoStatus::Pending)
                .execute(&mut *tx)
                .await?;
        }

        append_event(
            &mut tx,
            &trip.id,
            trip_event::TRIP_CANCELLED,
            "Trip cancelled".to_string(),
            actor,
        )
        .await?;

        tx.commit().await?;

        info!(trip_id = %updated.id, "Trip cancelled");

        Ok(updated)
    }

    /// Ad-hoc fuel entry, usable mid-trip; mirrors into a fuel expense and
    /// has no state-machine effect.
    pub async fn add_fuel_log(&self, id: &str, payload: FuelLogRequest) -> AppResult<FuelLog> {
        let mut tx = self.pool.begin().await?;

        let trip = fetch_trip(&mut tx, id).await?;

        let fuel = insert_fuel_log(&mut tx, &trip.id, &trip.vehicle_id, &payload).await?;

        tx.commit().await?;

        Ok(fuel)
    }

    /// Dispatch availability snapshot: available vehicles, plus on-duty
    /// license-valid drivers minus those tied to a dispatched trip. The
    /// two-step set subtraction is consistent because driver-busy is
    /// guaranteed by the partial-uniqueness invariant enforced at dispatch.
    pub async fn dispatch_availability(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<AvailabilityResponse> {
        let vehicles_fut = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE status = 'available' ORDER BY created_at",
        )
        .fetch_all(&self.pool);

        let driver_pool_fut = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE status = 'on_duty' AND license_expires_at >= $1 ORDER BY created_at",
        )
        .bind(now)
        .fetch_all(&self.pool);

        let busy_fut = sqlx::query_scalar::<_, String>(
            "SELECT driver_id FROM trips WHERE status = 'dispatched'",
        )
        .fetch_all(&self.pool);

        let (vehicles, driver_pool, busy) =
            futures::future::try_join3(vehicles_fut, driver_pool_fut, busy_fut).await?;

        let busy: HashSet<String> = busy.into_iter().collect();
        let drivers = driver_pool
            .into_iter()
            .filter(|driver| !busy.contains(&driver.id))
            .collect();

        Ok(AvailabilityResponse { vehicles, drivers })
    }
}

/// Dispatch preconditions beyond trip state: vehicle availability, driver
/// duty status, license validity at `now`, category match, and capacity.
/// Checked in order; each failure carries its own code.
fn dispatch_preconditions(
    trip: &Trip,
    vehicle: &Vehicle,
    driver: &Driver,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if vehicle.status != VehicleStatus::Available {
        return Err(AppError::conflict(
            "VEHICLE_UNAVAILABLE",
            "Vehicle is unavailable",
        ));
    }

    if driver.status != DriverStatus::OnDuty {
        return Err(AppError::conflict(
            "DRIVER_UNAVAILABLE",
            "Driver is unavailable",
        ));
    }

    // License must be valid strictly beyond the dispatch instant.
    if driver.license_expires_at <= now {
        return Err(AppError::unprocessable(
            "LICENSE_EXPIRED",
            "Driver license expired",
        ));
    }

    if !driver.license_category.matches(vehicle.vehicle_type) {
        return Err(AppError::unprocessable(
            "CATEGORY_MISMATCH",
            "Driver category does not match vehicle type",
        ));
    }

    if trip.cargo_weight_kg > vehicle.max_load_kg {
        return Err(AppError::unprocessable(
            "CAPACITY_EXCEEDED",
            "Cargo exceeds vehicle max capacity",
        ));
    }

    Ok(())
}

/// Distance covered by a completed trip; rejects a final odometer below
/// the recorded start.
fn trip_distance(start_km: i32, final_km: i32) -> AppResult<i32> {
    if final_km < start_km {
        return Err(AppError::unprocessable(
            "INVALID_ODOMETER",
            "Final odometer cannot be lower than start",
        ));
    }
    Ok(final_km - start_km)
}

/// Where a vehicle lands when a trip releases it.
fn vehicle_status_after_trip(has_open_maintenance: bool) -> VehicleStatus {
    if has_open_maintenance {
        VehicleStatus::InShop
    } else {
        VehicleStatus::Available
    }
}

/// The loser of a concurrent dispatch surfaces as a serialization failure
/// or a violation of one of the dispatched-trip partial unique indexes.
fn is_dispatch_race(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("40001") => true,
            Some("23505") => db
                .constraint()
                .map_or(false, |c| c.starts_with("trips_dispatched_")),
            _ => false,
        },
        _ => false,
    }
}

/// Map foreign-key violations on trip creation to not-found errors for
/// the entity the caller referenced.
fn map_trip_reference_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23503") {
            return match db.constraint() {
                Some(c) if c.contains("vehicle_id") => {
                    AppError::not_found("VEHICLE_NOT_FOUND", "Vehicle not found")
                }
                Some(c) if c.contains("driver_id") => {
                    AppError::not_found("DRIVER_NOT_FOUND", "Driver not found")
                }
                Some(c) if c.contains("cargo_id") => {
                    AppError::not_found("CARGO_NOT_FOUND", "Cargo shipment not found")
                }
                _ => AppError::Database(err),
            };
        }
    }
    AppError::Database(err)
}

async fn fetch_trip(tx: &mut Transaction<'_, Postgres>, id: &str) -> AppResult<Trip> {
    sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found("TRIP_NOT_FOUND", "Trip not found"))
}

async fn has_open_maintenance(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: &str,
) -> AppResult<bool> {
    let open: Option<String> = sqlx::query_scalar(
        "SELECT id FROM maintenance_logs WHERE vehicle_id = $1 AND closed_at IS NULL LIMIT 1",
    )
    .bind(vehicle_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(open.is_some())
}

async fn insert_fuel_log(
    tx: &mut Transaction<'_, Postgres>,
    trip_id: &str,
    vehicle_id: &str,
    payload: &FuelLogRequest,
) -> AppResult<FuelLog> {
    let logged_at = payload.logged_at.unwrap_or_else(Utc::now);

    let fuel = sqlx::query_as::<_, FuelLog>(
        r#"
        INSERT INTO fuel_logs (id, trip_id, vehicle_id, liters, cost, logged_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(ids::fuel_log_id())
    .bind(trip_id)
    .bind(vehicle_id)
    .bind(payload.liters)
    .bind(payload.cost)
    .bind(logged_at)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO expenses (id, type, vehicle_id, trip_id, amount, notes, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(ids::expense_id())
    .bind(ExpenseType::Fuel)
    .bind(vehicle_id)
    .bind(trip_id)
    .bind(payload.cost)
    .bind(format!("Fuel log: {}L", payload.liters))
    .bind(logged_at)
    .execute(&mut **tx)
    .await?;

    Ok(fuel)
}

async fn append_event(
    tx: &mut Transaction<'_, Postgres>,
    trip_id: &str,
    event_type: &str,
    message: String,
    actor: UserRole,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO trip_events (id, trip_id, event_type, message, actor_role)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(ids::event_id())
    .bind(trip_id)
    .bind(event_type)
    .bind(message)
    .bind(actor)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::driver::LicenseCategory;
    use crate::models::vehicle::VehicleType;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn test_vehicle() -> Vehicle {
        Vehicle {
            id: "veh-001".to_string(),
            name: "Van".to_string(),
            model: "05".to_string(),
            plate: "FF-1024".to_string(),
            vehicle_type: VehicleType::Van,
            max_load_kg: 500,
            odometer_km: 78320,
            region: "west".to_string(),
            status: VehicleStatus::Available,
            acquisition_cost: Some(Decimal::from(45000)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_driver(now: DateTime<Utc>) -> Driver {
        Driver {
            id: "drv-001".to_string(),
            name: "Marcus Hill".to_string(),
            license_number: "CA-DL-5521".to_string(),
            license_category: LicenseCategory::Multi,
            license_expires_at: now + Duration::days(365),
            safety_score: 88,
            status: DriverStatus::OnDuty,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_trip(cargo_weight_kg: i32) -> Trip {
        let now = Utc::now();
        Trip {
            id: "trp-001".to_string(),
            vehicle_id: "veh-001".to_string(),
            driver_id: "drv-001".to_string(),
            cargo_id: None,
            cargo_weight_kg,
            origin: "Los Angeles, CA".to_string(),
            destination: "San Diego, CA".to_string(),
            scheduled_at: now,
            status: TripStatus::Draft,
            dispatched_at: None,
            completed_at: None,
            cancelled_at: None,
            start_odometer_km: None,
            end_odometer_km: None,
            distance_km: None,
            revenue: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn dispatch_allows_eligible_pairing() {
        let now = Utc::now();
        let result = dispatch_preconditions(&test_trip(450), &test_vehicle(), &test_driver(now), now);
        assert!(result.is_ok());
    }

    #[test]
    fn dispatch_rejects_unavailable_vehicle() {
        let now = Utc::now();
        let mut vehicle = test_vehicle();
        vehicle.status = VehicleStatus::InShop;

        let err =
            dispatch_preconditions(&test_trip(450), &vehicle, &test_driver(now), now).unwrap_err();
        assert_eq!(err.code(), "VEHICLE_UNAVAILABLE");
    }

    #[test]
    fn dispatch_rejects_off_duty_driver() {
        let now = Utc::now();
        let mut driver = test_driver(now);
        driver.status = DriverStatus::OffDuty;

        let err =
            dispatch_preconditions(&test_trip(450), &test_vehicle(), &driver, now).unwrap_err();
        assert_eq!(err.code(), "DRIVER_UNAVAILABLE");
    }

    #[test]
    fn dispatch_rejects_suspended_driver() {
        let now = Utc::now();
        let mut driver = test_driver(now);
        driver.status = DriverStatus::Suspended;

        let err =
            dispatch_preconditions(&test_trip(450), &test_vehicle(), &driver, now).unwrap_err();
        assert_eq!(err.code(), "DRIVER_UNAVAILABLE");
    }

    #[test]
    fn dispatch_rejects_expired_license() {
        let now = Utc::now();
        let mut driver = test_driver(now);
        driver.license_expires_at = now - Duration::days(1);

        let err =
            dispatch_preconditions(&test_trip(450), &test_vehicle(), &driver, now).unwrap_err();
        assert_eq!(err.code(), "LICENSE_EXPIRED");
    }

    #[test]
    fn license_expiring_exactly_now_is_rejected() {
        let now = Utc::now();
        let mut driver = test_driver(now);
        driver.license_expires_at = now;

        let err =
            dispatch_preconditions(&test_trip(450), &test_vehicle(), &driver, now).unwrap_err();
        assert_eq!(err.code(), "LICENSE_EXPIRED");
    }

    #[test]
    fn dispatch_rejects_category_mismatch() {
        let now = Utc::now();
        let mut driver = test_driver(now);
        driver.license_category = LicenseCategory::Bike;

        let err =
            dispatch_preconditions(&test_trip(450), &test_vehicle(), &driver, now).unwrap_err();
        assert_eq!(err.code(), "CATEGORY_MISMATCH");
    }

    #[test]
    fn dispatch_rejects_overloaded_cargo() {
        let now = Utc::now();
        let err = dispatch_preconditions(&test_trip(501), &test_vehicle(), &test_driver(now), now)
            .unwrap_err();
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");
    }

    #[test]
    fn cargo_at_exact_capacity_is_allowed() {
        let now = Utc::now();
        assert!(
            dispatch_preconditions(&test_trip(500), &test_vehicle(), &test_driver(now), now)
                .is_ok()
        );
    }

    #[test]
    fn precondition_order_reports_vehicle_before_driver() {
        // Both entities are ineligible; the vehicle check fires first.
        let now = Utc::now();
        let mut vehicle = test_vehicle();
        vehicle.status = VehicleStatus::Retired;
        let mut driver = test_driver(now);
        driver.status = DriverStatus::Suspended;

        let err = dispatch_preconditions(&test_trip(450), &vehicle, &driver, now).unwrap_err();
        assert_eq!(err.code(), "VEHICLE_UNAVAILABLE");
    }

    #[test]
    fn distance_is_final_minus_start() {
        assert_eq!(trip_distance(78320, 78470).unwrap(), 150);
        assert_eq!(trip_distance(100, 100).unwrap(), 0);
    }

    #[test]
    fn distance_rejects_regressing_odometer() {
        let err = trip_distance(78470, 78320).unwrap_err();
        assert_eq!(err.code(), "INVALID_ODOMETER");
    }

    #[test]
    fn released_vehicle_lands_in_shop_only_with_open_maintenance() {
        assert_eq!(vehicle_status_after_trip(true), VehicleStatus::InShop);
        assert_eq!(vehicle_status_after_trip(false), VehicleStatus::Available);
    }
}
