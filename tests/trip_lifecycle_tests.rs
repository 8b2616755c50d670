//! Trip lifecycle integration tests
//!
//! These run against a real PostgreSQL instance and are ignored unless a
//! database is provided:
//!
//! ```sh
//! DATABASE_URL=postgres://localhost/fleet_test cargo test -- --ignored
//! ```
//!
//! Each test creates its own vehicle/driver fixtures with unique plates
//! and licence numbers, so the suite can run repeatedly against the same
//! database without cleanup.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use fleet_dispatch::database;
use fleet_dispatch::dto::trip_dto::{CompleteTripRequest, CreateTripRequest, FuelLogRequest};
use fleet_dispatch::dto::vehicle_dto::MaintenanceRequest;
use fleet_dispatch::models::driver::{DriverStatus, LicenseCategory};
use fleet_dispatch::models::trip::TripStatus;
use fleet_dispatch::models::user::UserRole;
use fleet_dispatch::models::vehicle::{Vehicle, VehicleStatus, VehicleType};
use fleet_dispatch::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use fleet_dispatch::services::maintenance_service::MaintenanceService;
use fleet_dispatch::services::trip_service::TripService;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    let pool = database::create_pool(Some(&url)).await.expect("pool");
    database::run_migrations(&pool).await.expect("migrations");
    pool
}

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn create_vehicle(pool: &PgPool, max_load_kg: i32, odometer_km: i32) -> Vehicle {
    VehicleRepository::new(pool.clone())
        .create(NewVehicle {
            name: "Van".to_string(),
            model: "05".to_string(),
            plate: format!("T-{}", suffix().to_uppercase()),
            vehicle_type: VehicleType::Van,
            max_load_kg,
            odometer_km,
            region: "west".to_string(),
            acquisition_cost: Some(Decimal::from(45000)),
        })
        .await
        .expect("vehicle fixture")
}

async fn create_driver(pool: &PgPool, category: LicenseCategory, status: DriverStatus) -> String {
    let id = format!("drv-{}", Uuid::new_v4());
    sqlx::query(
        r#"
        INSERT INTO drivers (id, name, license_number, license_category, license_expires_at, status, safety_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&id)
    .bind("Test Driver")
    .bind(format!("DL-{}", suffix()))
    .bind(category)
    .bind(Utc::now() + Duration::days(365))
    .bind(status)
    .bind(88_i32)
    .execute(pool)
    .await
    .expect("driver fixture");
    id
}

fn draft_trip(vehicle_id: &str, driver_id: &str, cargo_weight_kg: i32) -> CreateTripRequest {
    CreateTripRequest {
        vehicle_id: vehicle_id.to_string(),
        driver_id: driver_id.to_string(),
        cargo_weight_kg,
        cargo_id: None,
        origin: "Los Angeles, CA".to_string(),
        destination: "San Diego, CA".to_string(),
        scheduled_at: Utc::now() + Duration::hours(1),
        revenue: Some(Decimal::from(1000)),
    }
}

async fn vehicle_by_id(pool: &PgPool, id: &str) -> Vehicle {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("vehicle row")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn round_trip_create_dispatch_complete() {
    let pool = test_pool().await;
    let service = TripService::new(pool.clone());

    let vehicle = create_vehicle(&pool, 500, 78320).await;
    let driver_id = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;

    let trip = service
        .create_trip(draft_trip(&vehicle.id, &driver_id, 450), UserRole::Dispatcher)
        .await
        .expect("create");
    assert_eq!(trip.status, TripStatus::Draft);

    let dispatched = service
        .dispatch_trip(&trip.id, UserRole::Dispatcher, Utc::now())
        .await
        .expect("dispatch");
    assert_eq!(dispatched.status, TripStatus::Dispatched);
    assert_eq!(dispatched.start_odometer_km, Some(78320));
    assert_eq!(
        vehicle_by_id(&pool, &vehicle.id).await.status,
        VehicleStatus::OnTrip
    );

    let (completed, fuel) = service
        .complete_trip(
            &trip.id,
            CompleteTripRequest {
                final_odometer_km: 78470,
                fuel_liters: Decimal::from(30),
                fuel_cost: Decimal::from(45),
                completed_at: None,
            },
            UserRole::Dispatcher,
        )
        .await
        .expect("complete");

    assert_eq!(completed.status, TripStatus::Completed);
    assert_eq!(completed.distance_km, Some(150));
    assert_eq!(completed.end_odometer_km, Some(78470));
    assert_eq!(fuel.liters, Decimal::from(30));
    assert_eq!(fuel.cost, Decimal::from(45));

    let vehicle_after = vehicle_by_id(&pool, &vehicle.id).await;
    assert_eq!(vehicle_after.odometer_km, 78470);
    assert_eq!(vehicle_after.status, VehicleStatus::Available);

    // One fuel log and one matching fuel expense were booked.
    let fuel_count: i64 = sqlx::query_scalar("SELECT count(*) FROM fuel_logs WHERE trip_id = $1")
        .bind(&trip.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let expense_count: i64 =
        sqlx::query_scalar("SELECT count(*) FROM expenses WHERE trip_id = $1 AND type = 'fuel'")
            .bind(&trip.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(fuel_count, 1);
    assert_eq!(expense_count, 1);

    // The audit trail recorded every transition.
    let events: Vec<String> = sqlx::query_scalar(
        "SELECT event_type FROM trip_events WHERE trip_id = $1 ORDER BY created_at",
    )
    .bind(&trip.id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(events, vec!["trip_created", "trip_dispatched", "trip_completed"]);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn dispatch_rejects_busy_vehicle_and_driver() {
    let pool = test_pool().await;
    let service = TripService::new(pool.clone());

    let vehicle = create_vehicle(&pool, 500, 1000).await;
    let other_vehicle = create_vehicle(&pool, 500, 1000).await;
    let driver = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;
    let other_driver = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;

    let first = service
        .create_trip(draft_trip(&vehicle.id, &driver, 100), UserRole::Dispatcher)
        .await
        .unwrap();
    service
        .dispatch_trip(&first.id, UserRole::Dispatcher, Utc::now())
        .await
        .unwrap();

    // Same vehicle, different driver: the vehicle is no longer available.
    let second = service
        .create_trip(draft_trip(&vehicle.id, &other_driver, 100), UserRole::Dispatcher)
        .await
        .unwrap();
    let err = service
        .dispatch_trip(&second.id, UserRole::Dispatcher, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VEHICLE_UNAVAILABLE");

    // Different vehicle, same driver: the driver is tied to a dispatched trip.
    let third = service
        .create_trip(draft_trip(&other_vehicle.id, &driver, 100), UserRole::Dispatcher)
        .await
        .unwrap();
    let err = service
        .dispatch_trip(&third.id, UserRole::Dispatcher, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DRIVER_UNAVAILABLE");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_dispatch_admits_exactly_one_winner() {
    let pool = test_pool().await;
    let service = TripService::new(pool.clone());

    let vehicle = create_vehicle(&pool, 500, 1000).await;
    let driver_a = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;
    let driver_b = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;

    let trip_a = service
        .create_trip(draft_trip(&vehicle.id, &driver_a, 100), UserRole::Dispatcher)
        .await
        .unwrap();
    let trip_b = service
        .create_trip(draft_trip(&vehicle.id, &driver_b, 100), UserRole::Dispatcher)
        .await
        .unwrap();

    let now = Utc::now();
    let (result_a, result_b) = tokio::join!(
        service.dispatch_trip(&trip_a.id, UserRole::Dispatcher, now),
        service.dispatch_trip(&trip_b.id, UserRole::Dispatcher, now),
    );

    let successes = [&result_a, &result_b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one dispatch must win the vehicle");

    let loser = if result_a.is_ok() { result_b } else { result_a };
    let code = loser.unwrap_err().code();
    assert!(
        code == "VEHICLE_UNAVAILABLE" || code == "DISPATCH_CONFLICT",
        "unexpected loser code: {code}"
    );

    let dispatched: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM trips WHERE vehicle_id = $1 AND status = 'dispatched'",
    )
    .bind(&vehicle.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(dispatched, 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn cancelling_dispatched_trip_releases_vehicle_unless_in_maintenance() {
    let pool = test_pool().await;
    let service = TripService::new(pool.clone());
    let maintenance = MaintenanceService::new(pool.clone());

    let vehicle = create_vehicle(&pool, 500, 1000).await;
    let driver = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;

    let trip = service
        .create_trip(draft_trip(&vehicle.id, &driver, 100), UserRole::Dispatcher)
        .await
        .unwrap();
    service
        .dispatch_trip(&trip.id, UserRole::Dispatcher, Utc::now())
        .await
        .unwrap();

    // Maintenance opened mid-trip (administrative override) keeps the
    // vehicle in the shop when the trip is cancelled.
    maintenance
        .open_log(
            &vehicle.id,
            MaintenanceRequest {
                note: "Gearbox inspection".to_string(),
                cost: Decimal::from(200),
            },
            UserRole::Manager,
        )
        .await
        .unwrap();

    let cancelled = service
        .cancel_trip(&trip.id, UserRole::Dispatcher)
        .await
        .unwrap();
    assert_eq!(cancelled.status, TripStatus::Cancelled);
    assert_eq!(
        vehicle_by_id(&pool, &vehicle.id).await.status,
        VehicleStatus::InShop
    );

    // Terminal states reject a second cancellation.
    let err = service
        .cancel_trip(&trip.id, UserRole::Dispatcher)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRIP_STATE");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn maintenance_close_restores_availability_only_when_free() {
    let pool = test_pool().await;
    let maintenance = MaintenanceService::new(pool.clone());

    let vehicle = create_vehicle(&pool, 500, 1000).await;

    let first = maintenance
        .open_log(
            &vehicle.id,
            MaintenanceRequest {
                note: "Brake pads".to_string(),
                cost: Decimal::from(150),
            },
            UserRole::Manager,
        )
        .await
        .unwrap();
    let second = maintenance
        .open_log(
            &vehicle.id,
            MaintenanceRequest {
                note: "Tire rotation".to_string(),
                cost: Decimal::from(80),
            },
            UserRole::Manager,
        )
        .await
        .unwrap();

    // Closing one of two open logs leaves the vehicle in the shop.
    maintenance.close_log(&vehicle.id, &first.id).await.unwrap();
    assert_eq!(
        vehicle_by_id(&pool, &vehicle.id).await.status,
        VehicleStatus::InShop
    );

    // Closing the last one releases it.
    maintenance.close_log(&vehicle.id, &second.id).await.unwrap();
    assert_eq!(
        vehicle_by_id(&pool, &vehicle.id).await.status,
        VehicleStatus::Available
    );

    // A closed log cannot be closed again.
    let err = maintenance
        .close_log(&vehicle.id, &first.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "MAINT_DONE");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn ad_hoc_fuel_log_mirrors_an_expense() {
    let pool = test_pool().await;
    let service = TripService::new(pool.clone());

    let vehicle = create_vehicle(&pool, 500, 1000).await;
    let driver = create_driver(&pool, LicenseCategory::Multi, DriverStatus::OnDuty).await;

    let trip = service
        .create_trip(draft_trip(&vehicle.id, &driver, 100), UserRole::Dispatcher)
        .await
        .unwrap();

    // Usable regardless of trip status; the trip is still a draft here.
    let fuel = service
        .add_fuel_log(
            &trip.id,
            FuelLogRequest {
                liters: Decimal::new(125, 1),
                cost: Decimal::new(2150, 2),
                logged_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(fuel.liters, Decimal::new(125, 1));

    let expense_amount: Decimal = sqlx::query_scalar(
        "SELECT amount FROM expenses WHERE trip_id = $1 AND type = 'fuel'",
    )
    .bind(&trip.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(expense_amount, Decimal::new(2150, 2));
}
