//! API routers
//!
//! One router per resource, assembled under `/api`. Everything except
//! login sits behind the JWT authentication layer; per-handler role gates
//! mirror the old API's access matrix.

pub mod analytics_routes;
pub mod auth_routes;
pub mod dispatch_routes;
pub mod driver_routes;
pub mod expense_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::{middleware::from_fn_with_state, Router};

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Assemble the /api router
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/trips", trip_routes::create_trip_router())
        .nest("/dispatch", dispatch_routes::create_dispatch_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/expenses", expense_routes::create_expense_router())
        .nest("/analytics", analytics_routes::create_analytics_router())
        .layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .nest("/auth", auth_routes::create_auth_router())
        .merge(protected)
}
