//! Absence Review Backend
//!
//! Supervisors walk through their employees' pending absences one at a time, justifying or
//! confirming each; decisions land in a flat CSV ledger.

mod api;
mod config;
mod errors;
mod export;
mod models;
mod review;
mod session;
mod store;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use session::{SessionStore, SESSION_HEADER};
use store::{AbsenceSource, ResponseLedger, SupervisorDirectory};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub absences: Arc<AbsenceSource>,
    pub ledger: Arc<ResponseLedger>,
    pub directory: Arc<SupervisorDirectory>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            absences: Arc::new(AbsenceSource::new(
                config.absences_path.clone(),
                config.header_row,
            )),
            ledger: Arc::new(ResponseLedger::new(config.ledger_path.clone())),
            directory: Arc::new(SupervisorDirectory::new(config.supervisors_path.clone())),
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Absence Review Backend");
    tracing::info!("Absence spreadsheet: {:?}", config.absences_path);
    tracing::info!("Response ledger: {:?}", config.ledger_path);
    tracing::info!("Supervisor list: {:?}", config.supervisors_path);
    tracing::info!("Export directory: {:?}", config.export_dir);

    if !config.supervisors_path.exists() {
        tracing::warn!("Supervisor list not found; no supervisor can be selected");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration; the session token header must be readable by browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route("/", get(api::selection_page).post(api::select_supervisor))
        .route("/acao", post(api::submit_action))
        .route("/resumo", get(api::summary))
        .route("/exportacao", post(api::export_weekly))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
