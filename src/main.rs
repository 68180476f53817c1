//! Exam Distributor · per-student question assignment service
//!
//! - Axum HTTP API
//! - Pure distribution engine (quantity split, filtering, recycling selection)
//! - Optional exam backend integration (catalog, registrations, bulk assignment)
//!
//! Important env variables:
//!   PORT                     : u16 (default 3000)
//!   BACKEND_BASE_URL         : enables assignment runs against the exam backend
//!   BACKEND_TOKEN            : bearer token sent to the backend
//!   DISTRIBUTOR_CONFIG_PATH  : path to TOML config (backend + assignment defaults)
//!   LOG_LEVEL                : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT               : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod error;
mod config;
mod distribution;
mod backend;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crate::config::load_service_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Config file + env overrides, then shared state (backend client, assignment defaults).
  let config = load_service_config_from_env();
  let state = Arc::new(AppState::new(config));

  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "distributor", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "distributor", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "distributor", error = %e, "Failed to listen for ctrl-c; running until killed");
    std::future::pending::<()>().await;
  }
  info!(target: "distributor", "Shutdown signal received");
}
