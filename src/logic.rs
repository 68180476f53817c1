//! Assignment runs: the I/O shell around the distribution engine.
//!
//! A run is:
//!   1. validate the configuration (no I/O, no randomness)
//!   2. fetch the catalog + enrollment snapshot
//!   3. plan every student's list
//!   4. clear the exam's old assignments, then write the new batch
//!   5. lock the configuration on the exam so re-assignment can replay it
//!
//! Any failure before step 4 leaves the backend untouched. A failure during step 4 leaves the
//! exam with no assignments rather than a mix of old and new; the caller retries the whole run.

use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend::ExamBackend;
use crate::distribution::planner::PoolExhaustionWarning;
use crate::distribution::{AssignmentConfiguration, AssignmentPlanner, PlanRequest, PointsPolicy};
use crate::domain::{AssignmentRecord, ItemKind};
use crate::error::DistributionError;

/// Summary returned to the caller after a successful run.
#[derive(Debug, Serialize)]
pub struct RunOutcome {
  #[serde(rename = "runId")]
  pub run_id: Uuid,
  #[serde(rename = "examId")]
  pub exam_id: String,
  #[serde(rename = "itemKind")]
  pub item_kind: ItemKind,
  /// Seed of the run's RNG; passing it back reproduces the same plan on the same snapshot.
  pub seed: u64,
  #[serde(rename = "studentCount")]
  pub student_count: usize,
  #[serde(rename = "perStudent")]
  pub per_student: usize,
  #[serde(rename = "recordsWritten")]
  pub records_written: usize,
  #[serde(rename = "clearedRecords")]
  pub cleared_records: usize,
  #[serde(rename = "poolItemIds")]
  pub pool_item_ids: Vec<String>,
  pub warnings: Vec<PoolExhaustionWarning>,
}

pub fn resolve_seed(seed: Option<u64>) -> u64 {
  seed.unwrap_or_else(rand::random)
}

/// Clear the exam's existing assignments, then write `records`. Returns how many were cleared.
pub async fn replace_assignments<B: ExamBackend>(
  backend: &B,
  exam_id: &str,
  kind: ItemKind,
  records: &[AssignmentRecord],
) -> Result<usize, DistributionError> {
  let cleared = backend.clear_assignments(exam_id, kind).await?;
  if records.is_empty() {
    return Ok(cleared);
  }
  if let Err(e) = backend.bulk_assign(kind, records).await {
    warn!(target: "assignment", %exam_id, cleared, error = %e, "Write failed after clearing; exam has no assignments until the run is retried");
    return Err(e);
  }
  Ok(cleared)
}

/// Full assignment run for one exam with a caller-supplied configuration.
#[instrument(level = "info", skip(backend, configuration), fields(kind = ?configuration.item_kind))]
pub async fn run_assignment<B: ExamBackend>(
  backend: &B,
  points: PointsPolicy,
  exam_id: &str,
  configuration: AssignmentConfiguration,
  seed: Option<u64>,
) -> Result<RunOutcome, DistributionError> {
  configuration.validate()?;
  let run_id = Uuid::new_v4();
  let kind = configuration.item_kind;

  let items = backend.fetch_items(kind).await?;
  let enrollments = backend.fetch_enrollments(exam_id).await?;
  if enrollments.is_empty() {
    warn!(target: "assignment", %exam_id, "No students enrolled; configuration will still be locked for future enrollment");
  }

  let seed = resolve_seed(seed);
  let batch = {
    let mut rng = StdRng::seed_from_u64(seed);
    AssignmentPlanner::new(points).plan(
      PlanRequest { exam_id, items: &items, enrollments: &enrollments, configuration: &configuration },
      &mut rng,
    )?
  };

  let cleared = replace_assignments(backend, exam_id, kind, &batch.records).await?;
  backend.lock_configuration(exam_id, &configuration).await?;

  info!(
    target: "assignment",
    %run_id, %exam_id, seed,
    students = batch.student_count,
    records = batch.records.len(),
    cleared,
    warnings = batch.warnings.len(),
    "Assignment run complete"
  );

  Ok(RunOutcome {
    run_id,
    exam_id: exam_id.to_string(),
    item_kind: kind,
    seed,
    student_count: batch.student_count,
    per_student: batch.per_student,
    records_written: batch.records.len(),
    cleared_records: cleared,
    pool_item_ids: batch.pool_item_ids(),
    warnings: batch.warnings,
  })
}

/// Replay the configuration locked on the exam (after new enrollments or pool edits).
#[instrument(level = "info", skip(backend))]
pub async fn reassign<B: ExamBackend>(
  backend: &B,
  points: PointsPolicy,
  exam_id: &str,
  seed: Option<u64>,
) -> Result<RunOutcome, DistributionError> {
  let configuration = backend
    .load_locked_configuration(exam_id)
    .await?
    .ok_or_else(|| DistributionError::NotLocked { exam_id: exam_id.to_string() })?;
  info!(target: "assignment", %exam_id, kind = ?configuration.item_kind, "Replaying locked configuration");
  run_assignment(backend, points, exam_id, configuration, seed).await
}
