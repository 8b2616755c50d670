//! Dispatch availability endpoint

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;

use crate::dto::common::ApiResponse;
use crate::dto::trip_dto::AvailabilityResponse;
use crate::middleware::auth::{require_role, AuthenticatedUser};
use crate::models::user::UserRole;
use crate::services::trip_service::TripService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_dispatch_router() -> Router<AppState> {
    Router::new().route("/available", get(get_availability))
}

async fn get_availability(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    require_role(&user, &[UserRole::Dispatcher, UserRole::Manager])?;

    let service = TripService::new(state.pool.clone());
    let availability = service.dispatch_availability(Utc::now()).await?;

    Ok(Json(ApiResponse::success(availability)))
}
