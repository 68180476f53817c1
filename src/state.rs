//! Application state: service configuration and the optional backend client.
//!
//! Planning endpoints work without a backend. Assignment runs need one; when no base URL is
//! configured they fail with `backend_not_configured`.

use tracing::{info, instrument};

use crate::backend::BackendClient;
use crate::config::ServiceConfig;
use crate::distribution::PointsPolicy;
use crate::error::DistributionError;

#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    pub backend: Option<BackendClient>,
}

impl AppState {
    /// Build state from a loaded config; constructs the backend client if a base URL is set.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: ServiceConfig) -> Self {
        let backend = BackendClient::from_config(&config.backend);
        if let Some(be) = &backend {
            info!(
                target: "distributor",
                base_url = %be.base_url,
                authenticated = config.backend.token.is_some(),
                page_size = be.registration_page_size,
                "Exam backend enabled."
            );
        } else {
            info!(target: "distributor", "Exam backend disabled (no BACKEND_BASE_URL). Only planning endpoints are usable.");
        }
        info!(target: "distributor", points = ?config.assignment.points(), "Assignment defaults");

        Self { config, backend }
    }

    pub fn points(&self) -> PointsPolicy {
        self.config.assignment.points()
    }

    pub fn backend(&self) -> Result<&BackendClient, DistributionError> {
        self.backend.as_ref().ok_or(DistributionError::NotConfigured)
    }
}
