//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve the service and its callers independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::distribution::{AssignmentBatch, AssignmentConfiguration};
use crate::domain::{EnrollmentRecord, Item};
use crate::error::DistributionError;

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    #[serde(rename = "backendConfigured")]
    pub backend_configured: bool,
}

/// Offline planning: the caller supplies the snapshot, nothing is written anywhere.
#[derive(Debug, Deserialize)]
pub struct PlanIn {
    #[serde(rename = "examId")]
    pub exam_id: String,
    pub items: Vec<Item>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentRecord>,
    /// Parsed separately so shape errors come back as `invalid_config`.
    pub configuration: Value,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fixed points per record, overriding the service's configured policy.
    #[serde(default)]
    pub points: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PlanOut {
    pub seed: u64,
    #[serde(flatten)]
    pub batch: AssignmentBatch,
}

#[derive(Debug, Deserialize)]
pub struct PoolCheckIn {
    pub items: Vec<Item>,
    pub configuration: Value,
    #[serde(rename = "studentCount")]
    pub student_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AssignIn {
    pub configuration: Value,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReassignIn {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
    pub message: String,
}

/// Decode a configuration body. Negative or fractional counts, unknown modes and missing
/// fields are all reported as invalid configuration rather than a generic 400.
pub fn parse_configuration(v: Value) -> Result<AssignmentConfiguration, DistributionError> {
    AssignmentConfiguration::from_json(v)
}
