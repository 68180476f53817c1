//! Loading service configuration (backend connection + assignment defaults) from TOML.
//!
//! Example file:
//!   [backend]
//!   base_url = "http://localhost:8000"
//!   token = "..."
//!   timeout_secs = 20
//!   registration_page_size = 100
//!
//!   [assignment]
//!   points_policy = "fixed"   # or "max_score"
//!   fixed_points = 1
//!
//! BACKEND_BASE_URL and BACKEND_TOKEN override the file.

use serde::Deserialize;
use tracing::{info, error};

use crate::distribution::PointsPolicy;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ServiceConfig {
  #[serde(default)]
  pub backend: BackendConfig,
  #[serde(default)]
  pub assignment: AssignmentDefaults,
}

/// Connection to the exam platform's REST backend.
#[derive(Clone, Debug, Deserialize)]
pub struct BackendConfig {
  #[serde(default)] pub base_url: Option<String>,
  #[serde(default)] pub token: Option<String>,
  #[serde(default = "default_timeout_secs")] pub timeout_secs: u64,
  #[serde(default = "default_page_size")] pub registration_page_size: u32,
}

fn default_timeout_secs() -> u64 { 20 }
fn default_page_size() -> u32 { 100 }

impl Default for BackendConfig {
  fn default() -> Self {
    Self {
      base_url: None,
      token: None,
      timeout_secs: default_timeout_secs(),
      registration_page_size: default_page_size(),
    }
  }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PointsPolicyKind {
  #[default]
  Fixed,
  MaxScore,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssignmentDefaults {
  #[serde(default)] pub points_policy: PointsPolicyKind,
  #[serde(default = "default_fixed_points")] pub fixed_points: i64,
}

fn default_fixed_points() -> i64 { 1 }

impl Default for AssignmentDefaults {
  fn default() -> Self {
    Self { points_policy: PointsPolicyKind::default(), fixed_points: default_fixed_points() }
  }
}

impl AssignmentDefaults {
  pub fn points(&self) -> PointsPolicy {
    match self.points_policy {
      PointsPolicyKind::Fixed => PointsPolicy::Fixed(self.fixed_points),
      PointsPolicyKind::MaxScore => PointsPolicy::MaxScore,
    }
  }
}

impl ServiceConfig {
  /// Apply BACKEND_BASE_URL / BACKEND_TOKEN on top of whatever the file said.
  pub fn with_env_overrides(mut self) -> Self {
    if let Ok(url) = std::env::var("BACKEND_BASE_URL") {
      if !url.trim().is_empty() {
        self.backend.base_url = Some(url);
      }
    }
    if let Ok(token) = std::env::var("BACKEND_TOKEN") {
      if !token.trim().is_empty() {
        self.backend.token = Some(token);
      }
    }
    self
  }
}

pub fn parse_service_config(s: &str) -> Result<ServiceConfig, toml::de::Error> {
  toml::from_str::<ServiceConfig>(s)
}

/// Load `ServiceConfig` from DISTRIBUTOR_CONFIG_PATH, then apply env overrides.
/// A missing path means defaults; a read or parse error is logged and also falls back to defaults.
pub fn load_service_config_from_env() -> ServiceConfig {
  let from_file = match std::env::var("DISTRIBUTOR_CONFIG_PATH") {
    Ok(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match parse_service_config(&s) {
        Ok(cfg) => {
          info!(target: "distributor", %path, "Loaded service config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "distributor", %path, error = %e, "Failed to parse TOML config");
          ServiceConfig::default()
        }
      },
      Err(e) => {
        error!(target: "distributor", %path, error = %e, "Failed to read TOML config file");
        ServiceConfig::default()
      }
    },
    Err(_) => ServiceConfig::default(),
  };
  from_file.with_env_overrides()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = parse_service_config("").unwrap();
    assert!(cfg.backend.base_url.is_none());
    assert_eq!(cfg.backend.timeout_secs, 20);
    assert_eq!(cfg.backend.registration_page_size, 100);
    assert_eq!(cfg.assignment.points(), PointsPolicy::Fixed(1));
  }

  #[test]
  fn sections_override_defaults() {
    let cfg = parse_service_config(
      r#"
        [backend]
        base_url = "http://exams.local:8000"
        timeout_secs = 5

        [assignment]
        points_policy = "max_score"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.backend.base_url.as_deref(), Some("http://exams.local:8000"));
    assert_eq!(cfg.backend.timeout_secs, 5);
    assert_eq!(cfg.backend.registration_page_size, 100);
    assert_eq!(cfg.assignment.points(), PointsPolicy::MaxScore);
  }

  #[test]
  fn unknown_policy_is_a_parse_error() {
    assert!(parse_service_config("[assignment]\npoints_policy = \"double\"\n").is_err());
  }
}
