//! Trip lifecycle endpoints
//!
//! Creation and the dispatch/complete/cancel transitions, plus ad-hoc
//! fuel logging. Handlers validate input shape and gate roles; the
//! lifecycle engine does the rest.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::trip_dto::{
    CompleteTripRequest, CompleteTripResponse, CreateTripRequest, FuelLogRequest, TripResponse,
};
use crate::middleware::auth::{require_role, AuthenticatedUser};
use crate::models::finance::FuelLog;
use crate::models::user::UserRole;
use crate::services::trip_service::TripService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

const DISPATCH_ROLES: &[UserRole] = &[UserRole::Dispatcher, UserRole::Manager];
const CREATE_ROLES: &[UserRole] = &[UserRole::Manager, UserRole::Dispatcher];

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips))
        .route("/", post(create_trip))
        .route("/:id/dispatch", post(dispatch_trip))
        .route("/:id/complete", post(complete_trip))
        .route("/:id/cancel", post(cancel_trip))
        .route("/:id/fuel-log", post(add_fuel_log))
}

async fn list_trips(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TripResponse>>>> {
    let service = TripService::new(state.pool.clone());
    let trips = service.list_trips().await?;

    let responses = trips.into_iter().map(TripResponse::from).collect();
    Ok(Json(ApiResponse::list(responses)))
}

async fn create_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTripRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TripResponse>>)> {
    require_role(&user, CREATE_ROLES)?;
    request.validate()?;

    let service = TripService::new(state.pool.clone());
    let trip = service.create_trip(request, user.role).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(trip.into())),
    ))
}

async fn dispatch_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TripResponse>>> {
    require_role(&user, DISPATCH_ROLES)?;

    let service = TripService::new(state.pool.clone());
    let trip = service.dispatch_trip(&id, user.role, Utc::now()).await?;

    Ok(Json(ApiResponse::success(trip.into())))
}

async fn complete_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<CompleteTripRequest>,
) -> AppResult<Json<ApiResponse<CompleteTripResponse>>> {
    require_role(&user, DISPATCH_ROLES)?;
    request.validate()?;

    let service = TripService::new(state.pool.clone());
    let (trip, fuel) = service.complete_trip(&id, request, user.role).await?;

    Ok(Json(ApiResponse::success(CompleteTripResponse {
        trip: trip.into(),
        fuel,
    })))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TripResponse>>> {
    require_role(&user, DISPATCH_ROLES)?;

    let service = TripService::new(state.pool.clone());
    let trip = service.cancel_trip(&id, user.role).await?;

    Ok(Json(ApiResponse::success(trip.into())))
}

async fn add_fuel_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<FuelLogRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<FuelLog>>)> {
    require_role(&user, DISPATCH_ROLES)?;
    request.validate()?;

    let service = TripService::new(state.pool.clone());
    let fuel = service.add_fuel_log(&id, request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(fuel))))
}
