use anyhow::Result;
use axum::{error_handling::HandleErrorLayer, http::StatusCode, routing::get, Json, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::{error, info};

use fleet_dispatch::config::environment::EnvironmentConfig;
use fleet_dispatch::database;
use fleet_dispatch::database::seed::seed_if_empty;
use fleet_dispatch::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use fleet_dispatch::routes;
use fleet_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 FleetFlow Dispatch API");
    info!("=========================");

    let config = EnvironmentConfig::default();

    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Database connection failed: {}", e);
            return Err(e);
        }
    };

    database::run_migrations(&pool).await?;
    info!("✅ Migrations applied");

    if config.seed_demo_data {
        seed_if_empty(&pool).await?;
    }

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    };

    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::create_api_router(app_state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Server starting on http://{}", addr);
    info!("🔑 Auth:");
    info!("   POST  /api/auth/login - Obtain bearer token");
    info!("🚛 Trips:");
    info!("   GET   /api/trips - List trips");
    info!("   POST  /api/trips - Create draft trip");
    info!("   POST  /api/trips/:id/dispatch - Dispatch trip");
    info!("   POST  /api/trips/:id/complete - Complete trip");
    info!("   POST  /api/trips/:id/cancel - Cancel trip");
    info!("   POST  /api/trips/:id/fuel-log - Add fuel log");
    info!("   GET   /api/dispatch/available - Availability snapshot");
    info!("🚗 Vehicles:");
    info!("   GET   /api/vehicles - List vehicles");
    info!("   POST  /api/vehicles - Register vehicle");
    info!("   PATCH /api/vehicles/:id/status - Status override");
    info!("   POST  /api/vehicles/:id/maintenance - Open maintenance log");
    info!("   PATCH /api/vehicles/:id/maintenance/:log_id/complete - Close log");
    info!("👤 Drivers:");
    info!("   GET   /api/drivers - List drivers");
    info!("   GET   /api/drivers/expiring-licences - Expiring licences");
    info!("   PATCH /api/drivers/:id - Update driver");
    info!("📊 Analytics:");
    info!("   GET   /api/analytics/dashboard - Dashboard metrics");
    info!("   GET   /api/analytics/finance - Finance rollup");
    info!("   GET   /api/expenses - Expense ledger");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-dispatch",
        "status": "healthy"
    }))
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("🛑 Shutdown signal received, draining connections");
    }
}
