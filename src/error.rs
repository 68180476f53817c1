//! Error taxonomy shared by the distribution engine and the assignment run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributionError {
  /// Configuration invariant violated. Raised before any selection work.
  #[error("invalid configuration at `{field}`: {reason}")]
  InvalidConfig { field: String, reason: String },

  /// Every bucket in scope is empty; nothing can be assigned.
  #[error("no candidate items available for {scope}")]
  NoCandidatesAvailable { scope: String },

  /// Clearing or writing assignments failed. The whole run must be retried.
  #[error("{operation} failed: {message}")]
  SubmissionFailure { operation: &'static str, message: String },

  /// Fetching the snapshot (catalog, enrollments, exam) failed.
  #[error("{operation} failed: {message}")]
  Upstream { operation: &'static str, message: String },

  #[error("backend is not configured (set BACKEND_BASE_URL or [backend].base_url)")]
  NotConfigured,

  #[error("exam {exam_id} has no locked assignment configuration")]
  NotLocked { exam_id: String },
}

impl DistributionError {
  pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
    DistributionError::InvalidConfig { field: field.into(), reason: reason.into() }
  }

  /// Stable machine-readable code used in HTTP error bodies.
  pub fn code(&self) -> &'static str {
    match self {
      DistributionError::InvalidConfig { .. } => "invalid_config",
      DistributionError::NoCandidatesAvailable { .. } => "no_candidates_available",
      DistributionError::SubmissionFailure { .. } => "submission_failure",
      DistributionError::Upstream { .. } => "upstream_failure",
      DistributionError::NotConfigured => "backend_not_configured",
      DistributionError::NotLocked { .. } => "configuration_not_locked",
    }
  }
}
