//! Documentation of the Elite tournées dashboard.
//!
//! Wall screen in the depot showing today's delivery routes (tournées), the
//! delivery notes (BL) on each truck and how far along they are. All data
//! lives in Odoo; this service only reads it.
//!
//!
//!
//! # General Infrastructure
//! - Browser polls `GET /deliveries` every 10 seconds
//! - Server answers from memory when the last build is younger than `CACHE_TTL`
//! - Otherwise it rebuilds from Odoo over JSON-RPC, one session per process
//! - Any other path is served from the files mounted at `STATIC_DIR`
//!
//!
//!
//! # Keeping Load Off Odoo
//!
//! **Goal**: Any number of screens costs Odoo at most one rebuild per TTL.
//!
//! - One cache entry for the whole dashboard
//! - Concurrent misses queue behind the rebuild in flight, then read its result
//! - A failed rebuild caches nothing, the next request tries again
//!
//!
//!
//! # Notes
//!
//! ## Cache key
//! The key does not include a date range. Every screen sees the same tournées,
//! the ones flagged `x_display` in Odoo.
//!
//! ## Time zone
//! Odoo stores datetimes in UTC without an offset. Lateness is judged in
//! Europe/Zurich, which is also where "today" is.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! export ODOO_URL=https://erp.example.ch
//! export ODOO_DB=elite
//! export ODOO_LOGIN=dashboard
//! export ODOO_PASSWORD=...   # or /run/secrets/ODOO_PASSWORD
//! export CACHE_TTL=10
//! ```
//!
//! Run.
//! ```sh
//! RUST_LOG=info cargo run --bin tournees-dashboard
//! ```
//!
//! Per-picking debug output.
//! ```sh
//! RUST_LOG=debug cargo run --bin tournees-dashboard --features tournees/verbose
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;

use config::Config;
use routes::{deliveries_handler, health_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load();

    info!("Initializing state...");
    let state = AppState::new(config).expect("Failed to build Odoo client");

    info!("Starting server...");

    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind listener");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shutting down...");
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/deliveries", get(deliveries_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
