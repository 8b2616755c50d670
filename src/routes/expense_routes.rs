//! Expense ledger endpoint

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde_json::json;

use crate::dto::common::ApiResponse;
use crate::middleware::auth::{require_role, AuthenticatedUser};
use crate::models::finance::Expense;
use crate::models::user::UserRole;
use crate::services::analytics_service::AnalyticsService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_expense_router() -> Router<AppState> {
    Router::new().route("/", get(list_expenses))
}

async fn list_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<Expense>>>> {
    require_role(&user, &[UserRole::Finance, UserRole::Manager])?;

    let service = AnalyticsService::new(state.pool.clone());
    let (items, total) = service.list_expenses().await?;

    Ok(Json(
        ApiResponse::list(items).with_meta(json!({ "total_amount": total })),
    ))
}
