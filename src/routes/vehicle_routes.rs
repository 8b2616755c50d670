//! Vehicle endpoints
//!
//! Listing (with maintenance history and legacy aliases), registration,
//! the administrative status override, and the maintenance lifecycle.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, MaintenanceRequest, UpdateVehicleStatusRequest, VehicleResponse,
};
use crate::middleware::auth::{require_role, AuthenticatedUser};
use crate::models::analytics::VehicleKpis;
use crate::models::maintenance::MaintenanceLog;
use crate::models::user::UserRole;
use crate::models::vehicle::{Vehicle, VehicleType};
use crate::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use crate::services::analytics_service::AnalyticsService;
use crate::services::maintenance_service::MaintenanceService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/", post(create_vehicle))
        .route("/kpis", get(get_kpis))
        .route("/in-shop", get(list_in_shop))
        .route("/:id/status", patch(update_status))
        .route("/:id/maintenance", post(open_maintenance))
        .route("/:id/maintenance/:log_id/complete", patch(close_maintenance))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<VehicleResponse>>>> {
    let repository = VehicleRepository::new(state.pool.clone());
    let vehicles = repository.list_all().await?;
    let logs = repository.list_maintenance().await?;

    let mut by_vehicle: HashMap<String, Vec<MaintenanceLog>> = HashMap::new();
    for log in logs {
        by_vehicle.entry(log.vehicle_id.clone()).or_default().push(log);
    }

    // Maintenance history is hidden from the finance role.
    let responses = vehicles
        .into_iter()
        .map(|vehicle| {
            let maintenance = if user.role == UserRole::Finance {
                None
            } else {
                Some(by_vehicle.remove(&vehicle.id).unwrap_or_default())
            };
            VehicleResponse::from_vehicle(vehicle, maintenance)
        })
        .collect();

    Ok(Json(ApiResponse::list(responses)))
}

async fn get_kpis(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<VehicleKpis>>> {
    require_role(&user, &[UserRole::Manager, UserRole::Finance])?;

    let service = AnalyticsService::new(state.pool.clone());
    let kpis = service.vehicle_kpis().await?;

    Ok(Json(ApiResponse::success(kpis)))
}

async fn list_in_shop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<Vehicle>>>> {
    require_role(&user, &[UserRole::Manager, UserRole::Dispatcher])?;

    let repository = VehicleRepository::new(state.pool.clone());
    let vehicles = repository.list_in_shop().await?;

    Ok(Json(ApiResponse::list(vehicles)))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vehicle>>)> {
    require_role(&user, &[UserRole::Manager])?;
    request.validate()?;

    let repository = VehicleRepository::new(state.pool.clone());

    if repository.plate_exists(&request.plate).await? {
        return Err(AppError::conflict(
            "PLATE_CONFLICT",
            "Vehicle plate already exists",
        ));
    }

    // Legacy callers send unit_number/mileage; resolve both generations of
    // field names to one canonical input.
    let vehicle = repository
        .create(NewVehicle {
            name: request
                .name
                .or(request.unit_number)
                .unwrap_or_else(|| "Fleet Vehicle".to_string()),
            model: request.model.unwrap_or_else(|| "GEN".to_string()),
            plate: request.plate,
            vehicle_type: request.vehicle_type.unwrap_or(VehicleType::Van),
            max_load_kg: request.max_load_kg.unwrap_or(1000),
            odometer_km: request.odometer_km.or(request.mileage).unwrap_or(0),
            region: request.region.unwrap_or_else(|| "unspecified".to_string()),
            acquisition_cost: request.acquisition_cost,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(vehicle))))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateVehicleStatusRequest>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    require_role(&user, &[UserRole::Manager])?;

    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository.update_status(&id, request.status).await?;

    Ok(Json(ApiResponse::success(vehicle)))
}

async fn open_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<MaintenanceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MaintenanceLog>>)> {
    require_role(&user, &[UserRole::Manager])?;
    request.validate()?;

    let service = MaintenanceService::new(state.pool.clone());
    let log = service.open_log(&id, request, user.role).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(log))))
}

async fn close_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, log_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<MaintenanceLog>>> {
    require_role(&user, &[UserRole::Manager])?;

    let service = MaintenanceService::new(state.pool.clone());
    let log = service.close_log(&id, &log_id).await?;

    Ok(Json(ApiResponse::success(log)))
}
