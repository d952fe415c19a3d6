//! attendance-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use attendance_gateway::api;
use attendance_gateway::app_state::AppState;
use attendance_gateway::config::AttendanceConfig;
use attendance_gateway::directory::{InMemoryFacility, InMemoryRoster, InMemorySchedule};
use attendance_gateway::domain::{EventBus, EventLedger, HallPolicy, RecordStore};
use attendance_gateway::persistence::AttendancePersistence;
use attendance_gateway::service::{AttendanceService, CorrectionService};
use attendance_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AttendanceConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting attendance-gateway");

    // Optional audit persistence
    let persistence = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        tracing::info!("audit persistence enabled");
        Some(AttendancePersistence::new(pool))
    } else {
        None
    };

    // Build domain layer
    let store = Arc::new(RecordStore::new());
    let ledger = Arc::new(EventLedger::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let service = Arc::new(AttendanceService::new(
        Arc::new(InMemoryRoster::new()),
        Arc::new(InMemoryFacility::new()),
        Arc::new(InMemorySchedule::new()),
        Arc::clone(&store),
        ledger,
        event_bus.clone(),
        persistence.clone(),
    ));
    let corrections = Arc::new(CorrectionService::new(store));

    // Periodic audit cleanup
    if let Some(persistence) = persistence
        && config.cleanup_after_days > 0
    {
        let after_days = config.cleanup_after_days;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
            loop {
                interval.tick().await;
                match persistence.delete_old_events(after_days).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "cleaned up old audit events");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "audit cleanup failed"),
                }
            }
        });
    }

    // Build application state
    let app_state = AppState {
        service,
        corrections,
        event_bus,
        policy_defaults: HallPolicy::from(&config),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
