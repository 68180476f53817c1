//! Distribution configuration: the shape an instructor submits and that gets locked on an exam.
//!
//! JSON shape (flat):
//!   { "mode": "flat", "totalCount": 4, "difficultyPercentages": {"easy":50,"medium":25,"hard":25},
//!     "categoryFilter": ["<category id>"] }
//! JSON shape (per category):
//!   { "mode": "per_category", "categories": {
//!       "<id>": { "count": 3, "difficulties": ["easy"] },
//!       "<id>": { "count": 5, "difficultyDistribution": {"easy":2,"medium":2,"hard":1} } } }

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::distribution::quantity::validate_percentages;
use crate::domain::{Difficulty, DifficultySplit, ItemKind};
use crate::error::DistributionError;

/// Current version stamped on locked configurations.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DistributionConfig {
  Flat {
    #[serde(rename = "totalCount")]
    total_count: i64,
    #[serde(rename = "difficultyPercentages")]
    difficulty_percentages: DifficultySplit<i64>,
    #[serde(default, rename = "categoryFilter", skip_serializing_if = "Option::is_none")]
    category_filter: Option<BTreeSet<String>>,
  },
  PerCategory {
    categories: BTreeMap<String, CategoryQuota>,
  },
}

/// Hard ceiling on items per student. Counts above it are rejected before any allocation.
pub const MAX_ITEMS_PER_STUDENT: i64 = 1000;

/// Quota for one category. A present `difficultyDistribution` selects the bucketed branch;
/// otherwise `count` items are drawn from the category, optionally narrowed by `difficulties`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryQuota {
  pub count: i64,
  #[serde(rename = "difficultyDistribution", default, skip_serializing_if = "Option::is_none")]
  pub difficulty_distribution: Option<DifficultySplit<i64>>,
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub difficulties: BTreeSet<Difficulty>,
}

impl CategoryQuota {
  #[cfg(test)]
  pub fn distributed(count: i64, distribution: DifficultySplit<i64>) -> Self {
    Self { count, difficulty_distribution: Some(distribution), difficulties: BTreeSet::new() }
  }

  #[cfg(test)]
  pub fn filtered(count: i64, difficulties: &[Difficulty]) -> Self {
    Self { count, difficulty_distribution: None, difficulties: difficulties.iter().copied().collect() }
  }
}

fn check_cap(field: impl Into<String>, count: i64) -> Result<(), DistributionError> {
  if count > MAX_ITEMS_PER_STUDENT {
    return Err(DistributionError::invalid(
      field,
      format!("{count} items per student exceeds the limit of {MAX_ITEMS_PER_STUDENT}"),
    ));
  }
  Ok(())
}

impl DistributionConfig {
  /// Check every invariant before any randomness is drawn.
  pub fn validate(&self) -> Result<(), DistributionError> {
    match self {
      DistributionConfig::Flat { total_count, difficulty_percentages, .. } => {
        if *total_count < 0 {
          return Err(DistributionError::invalid("totalCount", format!("must be non-negative, got {total_count}")));
        }
        check_cap("totalCount", *total_count)?;
        validate_percentages("difficultyPercentages", difficulty_percentages)
      }
      DistributionConfig::PerCategory { categories } => {
        let mut total: i64 = 0;
        for (id, quota) in categories {
          let count = quota.count;
          if count < 0 {
            return Err(DistributionError::invalid(
              format!("categories.{id}.count"),
              format!("must be non-negative, got {count}"),
            ));
          }
          check_cap(format!("categories.{id}.count"), count)?;
          total = total.saturating_add(count);
          if let Some(dist) = &quota.difficulty_distribution {
            for d in Difficulty::ALL {
              if dist.get(d) < 0 {
                return Err(DistributionError::invalid(
                  format!("categories.{id}.difficultyDistribution.{d}"),
                  format!("must be non-negative, got {}", dist.get(d)),
                ));
              }
              check_cap(format!("categories.{id}.difficultyDistribution.{d}"), dist.get(d))?;
            }
            if dist.sum() != count {
              return Err(DistributionError::invalid(
                format!("categories.{id}.difficultyDistribution"),
                format!("distribution sums to {}, expected count {count}", dist.sum()),
              ));
            }
          }
        }
        check_cap("categories", total)
      }
    }
  }

  /// Items each student receives under this configuration (assumes a valid config).
  pub fn per_student_total(&self) -> i64 {
    match self {
      DistributionConfig::Flat { total_count, .. } => *total_count,
      DistributionConfig::PerCategory { categories } => categories.values().fold(0i64, |acc, q| acc.saturating_add(q.count)),
    }
  }
}

/// What gets stored on the exam and replayed on re-assignment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssignmentConfiguration {
  #[serde(rename = "schemaVersion", default = "default_schema_version")]
  pub schema_version: u32,
  #[serde(rename = "itemKind", default)]
  pub item_kind: ItemKind,
  #[serde(flatten)]
  pub distribution: DistributionConfig,
  /// Restrict candidates to these item ids (an instructor-picked pool).
  #[serde(rename = "selectedPool", default, skip_serializing_if = "Option::is_none")]
  pub selected_pool: Option<BTreeSet<String>>,
}

fn default_schema_version() -> u32 { CONFIG_SCHEMA_VERSION }

impl AssignmentConfiguration {
  #[cfg(test)]
  pub fn new(item_kind: ItemKind, distribution: DistributionConfig) -> Self {
    Self { schema_version: CONFIG_SCHEMA_VERSION, item_kind, distribution, selected_pool: None }
  }

  /// Decode a configuration from JSON. Shape errors are reported as `InvalidConfig`, with the
  /// offending category's path when one can be pinned down.
  pub fn from_json(v: Value) -> Result<Self, DistributionError> {
    serde_json::from_value::<AssignmentConfiguration>(v.clone())
      .map_err(|e| locate_shape_error(&v).unwrap_or_else(|| DistributionError::invalid("configuration", e.to_string())))
  }

  pub fn validate(&self) -> Result<(), DistributionError> {
    if self.schema_version != CONFIG_SCHEMA_VERSION {
      return Err(DistributionError::invalid(
        "schemaVersion",
        format!("unsupported version {} (this service understands {CONFIG_SCHEMA_VERSION})", self.schema_version),
      ));
    }
    if matches!(&self.selected_pool, Some(p) if p.is_empty()) {
      return Err(DistributionError::invalid("selectedPool", "must not be empty when present"));
    }
    self.distribution.validate()
  }
}

/// Re-parse each per-category quota on its own to name the category that failed.
fn locate_shape_error(v: &Value) -> Option<DistributionError> {
  let categories = v.get("categories")?.as_object()?;
  for (id, quota) in categories {
    if let Some(dist) = quota.get("difficultyDistribution").filter(|d| !d.is_null()) {
      if let Err(e) = serde_json::from_value::<DifficultySplit<i64>>(dist.clone()) {
        return Some(DistributionError::invalid(format!("categories.{id}.difficultyDistribution"), e.to_string()));
      }
    }
    if let Err(e) = serde_json::from_value::<CategoryQuota>(quota.clone()) {
      return Some(DistributionError::invalid(format!("categories.{id}"), e.to_string()));
    }
  }
  None
}
