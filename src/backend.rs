//! Client for the exam platform's REST backend.
//!
//! Covers what an assignment run needs: the item catalog, exam registrations, clearing and
//! bulk-writing student assignments, and reading/writing the locked configuration on the exam.
//! Calls are instrumented with the operation name and sizes, never with the token.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument};

use crate::config::BackendConfig;
use crate::distribution::AssignmentConfiguration;
use crate::domain::{AssignmentRecord, EnrollmentRecord, Item, ItemKind};
use crate::error::DistributionError;

/// The external collaborator an assignment run talks to.
pub trait ExamBackend: Sync {
  fn fetch_items(&self, kind: ItemKind) -> impl Future<Output = Result<Vec<Item>, DistributionError>> + Send;

  fn fetch_enrollments(&self, exam_id: &str) -> impl Future<Output = Result<Vec<EnrollmentRecord>, DistributionError>> + Send;

  /// Delete every existing student assignment of `kind` for the exam. Returns how many were removed.
  fn clear_assignments(&self, exam_id: &str, kind: ItemKind) -> impl Future<Output = Result<usize, DistributionError>> + Send;

  /// Write the batch in one call; succeeds or fails as a whole.
  fn bulk_assign(&self, kind: ItemKind, records: &[AssignmentRecord]) -> impl Future<Output = Result<(), DistributionError>> + Send;

  fn load_locked_configuration(
    &self,
    exam_id: &str,
  ) -> impl Future<Output = Result<Option<AssignmentConfiguration>, DistributionError>> + Send;

  fn lock_configuration(
    &self,
    exam_id: &str,
    configuration: &AssignmentConfiguration,
  ) -> impl Future<Output = Result<(), DistributionError>> + Send;
}

impl ItemKind {
  fn catalog_path(&self) -> &'static str {
    match self {
      ItemKind::Question => "/questions/",
      ItemKind::Mcq => "/mcqs/",
    }
  }

  fn exam_assignments_path(&self, exam_id: &str) -> String {
    match self {
      ItemKind::Question => format!("/exams/{exam_id}/student-questions/"),
      ItemKind::Mcq => format!("/exams/{exam_id}/student-mcqs/"),
    }
  }

  fn assignment_path(&self, id: &str) -> String {
    match self {
      ItemKind::Question => format!("/student-exam-questions/{id}"),
      ItemKind::Mcq => format!("/student-exam-mcqs/{id}"),
    }
  }

  fn bulk_assign_path(&self) -> &'static str {
    match self {
      ItemKind::Question => "/student-exam-questions/bulk-assign/",
      ItemKind::Mcq => "/student-exam-mcqs/bulk-assign/",
    }
  }

  /// Name of the item id column in bulk-assign rows.
  fn id_field(&self) -> &'static str {
    match self {
      ItemKind::Question => "question_id",
      ItemKind::Mcq => "mcq_id",
    }
  }
}

#[derive(Deserialize)]
struct RegistrationRow {
  id: String,
  exam_id: String,
  student_id: String,
}

#[derive(Deserialize)]
struct AssignmentRow {
  id: String,
}

#[derive(Clone)]
pub struct BackendClient {
  pub client: reqwest::Client,
  pub base_url: String,
  token: Option<String>,
  pub registration_page_size: u32,
}

impl BackendClient {
  /// Construct the client if a base URL is configured; otherwise return None.
  pub fn from_config(cfg: &BackendConfig) -> Option<Self> {
    let base_url = cfg.base_url.as_ref()?.trim_end_matches('/').to_string();
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .map_err(|e| error!(target: "distributor", error = %e, "Failed to build HTTP client"))
      .ok()?;
    Some(Self {
      client,
      base_url,
      token: cfg.token.clone(),
      registration_page_size: cfg.registration_page_size,
    })
  }

  fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
    let url = format!("{}{}", self.base_url, path);
    let mut req = self.client
      .request(method, url)
      .header(USER_AGENT, "exam-distributor/0.1")
      .header(CONTENT_TYPE, "application/json");
    if let Some(token) = &self.token {
      req = req.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    req
  }

  async fn get_exam(&self, exam_id: &str) -> Result<Value, DistributionError> {
    let op = "fetch exam";
    let res = self.request(Method::GET, &format!("/exams/{exam_id}")).send().await.map_err(|e| upstream(op, e))?;
    let res = ensure_success(res).await.map_err(|m| DistributionError::Upstream { operation: op, message: m })?;
    res.json::<Value>().await.map_err(|e| upstream(op, e))
  }
}

fn upstream(operation: &'static str, e: impl std::fmt::Display) -> DistributionError {
  DistributionError::Upstream { operation, message: e.to_string() }
}

fn submission(operation: &'static str, e: impl std::fmt::Display) -> DistributionError {
  DistributionError::SubmissionFailure { operation, message: e.to_string() }
}

/// Pass successful responses through; turn anything else into a readable message.
async fn ensure_success(res: reqwest::Response) -> Result<reqwest::Response, String> {
  if res.status().is_success() {
    return Ok(res);
  }
  let status = res.status();
  let body = res.text().await.unwrap_or_default();
  let msg = extract_detail(&body).unwrap_or(body);
  Err(format!("backend HTTP {}: {}", status, msg))
}

/// FastAPI-style `{"detail": ...}` bodies.
fn extract_detail(body: &str) -> Option<String> {
  let v: Value = serde_json::from_str(body).ok()?;
  match v.get("detail")? {
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

fn bulk_payload(kind: ItemKind, records: &[AssignmentRecord]) -> Value {
  let rows: Vec<Value> = records
    .iter()
    .map(|r| {
      let mut row = Map::new();
      row.insert("exam_id".into(), Value::String(r.exam_id.clone()));
      row.insert("student_id".into(), Value::String(r.student_id.clone()));
      row.insert(kind.id_field().into(), Value::String(r.question_id.clone()));
      row.insert("question_order".into(), Value::from(r.order));
      row.insert("points".into(), Value::from(r.points));
      Value::Object(row)
    })
    .collect();
  serde_json::json!({ "assignments": rows })
}

impl ExamBackend for BackendClient {
  #[instrument(level = "info", skip(self))]
  async fn fetch_items(&self, kind: ItemKind) -> Result<Vec<Item>, DistributionError> {
    let op = "fetch catalog";
    let res = self.request(Method::GET, kind.catalog_path()).send().await.map_err(|e| upstream(op, e))?;
    let res = ensure_success(res).await.map_err(|m| DistributionError::Upstream { operation: op, message: m })?;
    let mut items: Vec<Item> = res.json().await.map_err(|e| upstream(op, e))?;
    for it in &mut items {
      it.kind = kind;
    }
    info!(target: "distributor", count = items.len(), "Catalog fetched");
    Ok(items)
  }

  #[instrument(level = "info", skip(self))]
  async fn fetch_enrollments(&self, exam_id: &str) -> Result<Vec<EnrollmentRecord>, DistributionError> {
    let op = "fetch enrollments";
    let limit = self.registration_page_size.max(1) as usize;
    let mut seen = HashSet::new();
    let mut enrolled = Vec::new();
    let mut skip = 0usize;
    loop {
      let path = format!("/exam-registrations/?skip={skip}&limit={limit}");
      let res = self.request(Method::GET, &path).send().await.map_err(|e| upstream(op, e))?;
      let res = ensure_success(res).await.map_err(|m| DistributionError::Upstream { operation: op, message: m })?;
      let rows: Vec<RegistrationRow> = res.json().await.map_err(|e| upstream(op, e))?;
      let page_len = rows.len();
      let mut fresh = 0;
      for r in rows {
        if !seen.insert(r.id.clone()) {
          continue;
        }
        fresh += 1;
        if r.exam_id == exam_id {
          enrolled.push(EnrollmentRecord { student_id: r.student_id, registration_id: r.id });
        }
      }
      debug!(target: "distributor", skip, page_len, "Registration page fetched");
      // A short page ends the listing; a page of repeats means the backend ignored `skip`.
      if page_len < limit || fresh == 0 {
        break;
      }
      skip += page_len;
    }
    info!(target: "distributor", count = enrolled.len(), "Enrollments fetched");
    Ok(enrolled)
  }

  #[instrument(level = "info", skip(self))]
  async fn clear_assignments(&self, exam_id: &str, kind: ItemKind) -> Result<usize, DistributionError> {
    let op = "clear assignments";
    let res = self.request(Method::GET, &kind.exam_assignments_path(exam_id)).send().await.map_err(|e| submission(op, e))?;
    // The backend answers 404 when the exam has no assignments yet.
    if res.status() == StatusCode::NOT_FOUND {
      debug!(target: "distributor", "No existing assignments");
      return Ok(0);
    }
    let res = ensure_success(res).await.map_err(|m| DistributionError::SubmissionFailure { operation: op, message: m })?;
    let rows: Vec<AssignmentRow> = res.json().await.map_err(|e| submission(op, e))?;

    for row in &rows {
      let res = self.request(Method::DELETE, &kind.assignment_path(&row.id)).send().await.map_err(|e| submission(op, e))?;
      ensure_success(res).await.map_err(|m| DistributionError::SubmissionFailure {
        operation: op,
        message: format!("assignment {}: {}", row.id, m),
      })?;
    }
    info!(target: "distributor", cleared = rows.len(), "Existing assignments cleared");
    Ok(rows.len())
  }

  #[instrument(level = "info", skip(self, records), fields(count = records.len()))]
  async fn bulk_assign(&self, kind: ItemKind, records: &[AssignmentRecord]) -> Result<(), DistributionError> {
    let op = "bulk assign";
    let payload = bulk_payload(kind, records);
    let res = self.request(Method::POST, kind.bulk_assign_path()).json(&payload).send().await.map_err(|e| submission(op, e))?;
    ensure_success(res).await.map_err(|m| DistributionError::SubmissionFailure { operation: op, message: m })?;
    info!(target: "distributor", "Bulk assignment accepted");
    Ok(())
  }

  #[instrument(level = "info", skip(self))]
  async fn load_locked_configuration(&self, exam_id: &str) -> Result<Option<AssignmentConfiguration>, DistributionError> {
    let exam = self.get_exam(exam_id).await?;
    let extra = exam.get("extra_data");
    let locked = extra
      .and_then(|e| e.get("configurationLocked"))
      .and_then(Value::as_bool)
      .unwrap_or(false);
    let stored = extra.and_then(|e| e.get("assignmentConfiguration")).filter(|v| !v.is_null());
    match (locked, stored) {
      (true, Some(v)) => serde_json::from_value::<AssignmentConfiguration>(v.clone())
        .map(Some)
        .map_err(|e| DistributionError::invalid("assignmentConfiguration", format!("stored configuration is not readable: {e}"))),
      _ => Ok(None),
    }
  }

  #[instrument(level = "info", skip(self, configuration))]
  async fn lock_configuration(&self, exam_id: &str, configuration: &AssignmentConfiguration) -> Result<(), DistributionError> {
    let op = "lock configuration";
    let mut exam = self.get_exam(exam_id).await.map_err(|e| submission(op, e))?;
    let cfg_value = serde_json::to_value(configuration).map_err(|e| submission(op, e))?;

    let obj = exam
      .as_object_mut()
      .ok_or_else(|| submission(op, "exam record is not a JSON object"))?;
    let extra = obj.entry("extra_data").or_insert_with(|| Value::Object(Map::new()));
    if !extra.is_object() {
      *extra = Value::Object(Map::new());
    }
    if let Some(extra) = extra.as_object_mut() {
      extra.insert("assignmentConfiguration".into(), cfg_value);
      extra.insert("configurationLocked".into(), Value::Bool(true));
      extra.insert("questions_per_student".into(), Value::from(configuration.distribution.per_student_total()));
    }

    let res = self.request(Method::PUT, &format!("/exams/{exam_id}")).json(&exam).send().await.map_err(|e| submission(op, e))?;
    ensure_success(res).await.map_err(|m| DistributionError::SubmissionFailure { operation: op, message: m })?;
    info!(target: "distributor", "Assignment configuration locked on exam");
    Ok(())
  }
}
