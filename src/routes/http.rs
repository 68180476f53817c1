//! HTTP endpoint handlers. These are thin wrappers that forward to the planner or the run logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}, Json};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info, instrument, warn};

use crate::distribution::{check_pool, AssignmentPlanner, PlanRequest, PointsPolicy, PoolReport};
use crate::error::DistributionError;
use crate::logic::{self, resolve_seed, RunOutcome};
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for DistributionError {
  fn into_response(self) -> Response {
    let status = match &self {
      DistributionError::InvalidConfig { .. } => StatusCode::UNPROCESSABLE_ENTITY,
      DistributionError::NoCandidatesAvailable { .. } => StatusCode::CONFLICT,
      DistributionError::SubmissionFailure { .. } | DistributionError::Upstream { .. } => StatusCode::BAD_GATEWAY,
      DistributionError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
      DistributionError::NotLocked { .. } => StatusCode::NOT_FOUND,
    };
    if status.is_server_error() {
      error!(target: "assignment", code = self.code(), error = %self, "Request failed");
    } else {
      warn!(target: "assignment", code = self.code(), error = %self, "Request rejected");
    }
    (status, Json(ErrorOut { error: self.code().to_string(), message: self.to_string() })).into_response()
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, backend_configured: state.backend.is_some() })
}

#[instrument(level = "info", skip(state, body), fields(exam_id = %body.exam_id, items = body.items.len(), students = body.enrollments.len()))]
pub async fn http_post_plan(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PlanIn>,
) -> Result<Json<PlanOut>, DistributionError> {
  let configuration = parse_configuration(body.configuration)?;
  let seed = resolve_seed(body.seed);
  let mut rng = StdRng::seed_from_u64(seed);
  let points = body.points.map(PointsPolicy::Fixed).unwrap_or_else(|| state.points());
  let batch = AssignmentPlanner::new(points).plan(
    PlanRequest { exam_id: &body.exam_id, items: &body.items, enrollments: &body.enrollments, configuration: &configuration },
    &mut rng,
  )?;
  info!(target: "assignment", exam_id = %body.exam_id, seed, records = batch.records.len(), warnings = batch.warnings.len(), "Plan computed");
  Ok(Json(PlanOut { seed, batch }))
}

#[instrument(level = "info", skip(body), fields(items = body.items.len(), students = body.student_count))]
pub async fn http_post_pool_check(Json(body): Json<PoolCheckIn>) -> Result<Json<PoolReport>, DistributionError> {
  let configuration = parse_configuration(body.configuration)?;
  let report = check_pool(&body.items, &configuration, body.student_count)?;
  info!(target: "assignment", sufficient = report.sufficient, shortages = report.shortages.len(), "Pool checked");
  Ok(Json(report))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_assign(
  State(state): State<Arc<AppState>>,
  Path(exam_id): Path<String>,
  Json(body): Json<AssignIn>,
) -> Result<Json<RunOutcome>, DistributionError> {
  let configuration = parse_configuration(body.configuration)?;
  let backend = state.backend()?;
  let out = logic::run_assignment(backend, state.points(), &exam_id, configuration, body.seed).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_reassign(
  State(state): State<Arc<AppState>>,
  Path(exam_id): Path<String>,
  body: Option<Json<ReassignIn>>,
) -> Result<Json<RunOutcome>, DistributionError> {
  let seed = body.map(|Json(b)| b.seed).unwrap_or_default();
  let backend = state.backend()?;
  let out = logic::reassign(backend, state.points(), &exam_id, seed).await?;
  Ok(Json(out))
}
