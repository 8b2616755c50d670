//! Analytics endpoints

use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::dto::common::ApiResponse;
use crate::middleware::auth::{require_role, AuthenticatedUser};
use crate::models::analytics::{DashboardMetrics, VehicleFinanceMetrics};
use crate::models::user::UserRole;
use crate::services::analytics_service::AnalyticsService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/finance", get(get_finance))
}

async fn get_dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardMetrics>>> {
    let service = AnalyticsService::new(state.pool.clone());
    let metrics = service.dashboard_metrics().await?;

    Ok(Json(ApiResponse::success(metrics)))
}

async fn get_finance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<VehicleFinanceMetrics>>>> {
    require_role(&user, &[UserRole::Finance, UserRole::Manager])?;

    let service = AnalyticsService::new(state.pool.clone());
    let metrics = service.finance_metrics().await?;

    Ok(Json(ApiResponse::list(metrics)))
}
