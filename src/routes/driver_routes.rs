//! Driver endpoints

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::driver_dto::{ExpiringLicencesQuery, UpdateDriverRequest};
use crate::middleware::auth::{require_role, AuthenticatedUser};
use crate::models::driver::Driver;
use crate::models::user::UserRole;
use crate::repositories::driver_repository::DriverRepository;
use crate::state::AppState;
use crate::utils::errors::AppResult;

const DEFAULT_EXPIRY_HORIZON_DAYS: i64 = 45;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers))
        .route("/expiring-licences", get(list_expiring))
        .route("/:id", patch(update_driver))
}

async fn list_drivers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Driver>>>> {
    let repository = DriverRepository::new(state.pool.clone());
    let drivers = repository.list_all().await?;

    Ok(Json(ApiResponse::list(drivers)))
}

async fn list_expiring(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ExpiringLicencesQuery>,
) -> AppResult<Json<ApiResponse<Vec<Driver>>>> {
    require_role(&user, &[UserRole::Manager, UserRole::Safety])?;

    let days = query.days.unwrap_or(DEFAULT_EXPIRY_HORIZON_DAYS);
    let horizon = Utc::now() + Duration::days(days);

    let repository = DriverRepository::new(state.pool.clone());
    let drivers = repository.list_expiring(horizon).await?;

    Ok(Json(ApiResponse::list(drivers)))
}

async fn update_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDriverRequest>,
) -> AppResult<Json<ApiResponse<Driver>>> {
    require_role(&user, &[UserRole::Manager, UserRole::Safety])?;
    request.validate()?;

    let repository = DriverRepository::new(state.pool.clone());
    let driver = repository.update(&id, request).await?;

    Ok(Json(ApiResponse::success(driver)))
}
