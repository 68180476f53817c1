//! Per-student assignment planning.
//!
//! The configuration is validated and turned into buckets (candidates + per-student need) once
//! per run. Each student then draws independently from every bucket, the draws are concatenated
//! and shuffled, and positions `0..n` are assigned.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::distribution::config::{AssignmentConfiguration, DistributionConfig};
use crate::distribution::filter::{filter, PoolPredicate};
use crate::distribution::quantity::plan_flat;
use crate::distribution::selector::{shuffle, RandomSource, RecyclingSelector, Selector};
use crate::domain::{AssignmentRecord, Difficulty, DifficultySplit, EnrollmentRecord, Item};
use crate::error::DistributionError;

/// How many points each assignment record carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointsPolicy {
  /// Same value for every record.
  Fixed(i64),
  /// The item's own `max_score`, rounded.
  MaxScore,
}

impl PointsPolicy {
  fn points_for(&self, item: &Item) -> i64 {
    match self {
      PointsPolicy::Fixed(p) => *p,
      PointsPolicy::MaxScore => item.max_score.round() as i64,
    }
  }
}

/// Identifies a bucket in warnings: a category, a difficulty, or both.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BucketKey {
  #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
  pub category_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub difficulty: Option<Difficulty>,
}

impl fmt::Display for BucketKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (&self.category_id, self.difficulty) {
      (Some(c), Some(d)) => write!(f, "{c}/{d}"),
      (Some(c), None) => write!(f, "{c}"),
      (None, Some(d)) => write!(f, "{d}"),
      (None, None) => f.write_str("pool"),
    }
  }
}

/// A bucket that needed more items than it holds, so items were (or will be) recycled.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PoolExhaustionWarning {
  pub bucket: BucketKey,
  pub needed: usize,
  pub available: usize,
  /// `needed / available`; absent when the bucket is empty.
  pub ratio: Option<f64>,
}

impl PoolExhaustionWarning {
  fn new(bucket: BucketKey, needed: usize, available: usize) -> Self {
    let ratio = (available > 0).then(|| needed as f64 / available as f64);
    Self { bucket, needed, available, ratio }
  }
}

/// Result of a pool sufficiency check across all students.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PoolReport {
  pub sufficient: bool,
  pub shortages: Vec<PoolExhaustionWarning>,
}

#[derive(Clone, Debug)]
struct Bucket {
  key: BucketKey,
  candidates: Vec<Item>,
  needed: usize,
}

/// Everything one planning run reads.
#[derive(Clone, Copy, Debug)]
pub struct PlanRequest<'a> {
  pub exam_id: &'a str,
  pub items: &'a [Item],
  pub enrollments: &'a [EnrollmentRecord],
  pub configuration: &'a AssignmentConfiguration,
}

/// The full output of one run, ready for the bulk-assignment collaborator.
#[derive(Clone, Debug, Serialize)]
pub struct AssignmentBatch {
  #[serde(rename = "examId")]
  pub exam_id: String,
  #[serde(rename = "studentCount")]
  pub student_count: usize,
  #[serde(rename = "perStudent")]
  pub per_student: usize,
  pub records: Vec<AssignmentRecord>,
  pub warnings: Vec<PoolExhaustionWarning>,
}

impl AssignmentBatch {
  /// Distinct item ids used by the batch, in first-use order.
  pub fn pool_item_ids(&self) -> Vec<String> {
    let mut seen = HashSet::new();
    self.records
      .iter()
      .filter(|r| seen.insert(r.question_id.as_str()))
      .map(|r| r.question_id.clone())
      .collect()
  }

  #[cfg(test)]
  pub fn for_student<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a AssignmentRecord> + 'a {
    self.records.iter().filter(move |r| r.student_id == student_id)
  }
}

pub struct AssignmentPlanner<S = RecyclingSelector> {
  selector: S,
  points: PointsPolicy,
}

impl AssignmentPlanner<RecyclingSelector> {
  pub fn new(points: PointsPolicy) -> Self {
    Self { selector: RecyclingSelector, points }
  }
}

impl<S: Selector> AssignmentPlanner<S> {
  #[cfg(test)]
  pub fn with_selector(selector: S, points: PointsPolicy) -> Self {
    Self { selector, points }
  }

  #[cfg(test)]
  pub fn selector(&self) -> &S {
    &self.selector
  }

  /// Plan a whole exam: one independently randomized list per enrolled student.
  ///
  /// Fails before drawing any randomness when the configuration is invalid or when every
  /// bucket in scope is empty.
  #[instrument(level = "info", skip_all, fields(exam_id = %req.exam_id, items = req.items.len(), students = req.enrollments.len()))]
  pub fn plan(&mut self, req: PlanRequest<'_>, rng: &mut dyn RandomSource) -> Result<AssignmentBatch, DistributionError> {
    req.configuration.validate()?;
    let buckets = build_buckets(req.items, req.configuration)?;

    let warnings: Vec<PoolExhaustionWarning> = buckets
      .iter()
      .filter(|b| b.needed > b.candidates.len())
      .map(|b| PoolExhaustionWarning::new(b.key.clone(), b.needed, b.candidates.len()))
      .collect();
    for w in &warnings {
      warn!(target: "assignment", bucket = %w.bucket, needed = w.needed, available = w.available, "Bucket oversubscribed; items will be recycled");
    }

    let mut records = Vec::new();
    let mut per_student = 0;
    for enrollment in req.enrollments {
      let picked = self.plan_student(&buckets, rng);
      per_student = per_student.max(picked.len());
      debug!(target: "assignment", student_id = %enrollment.student_id, count = picked.len(), "Student list planned");
      records.extend(picked.into_iter().enumerate().map(|(order, item)| AssignmentRecord {
        exam_id: req.exam_id.to_string(),
        student_id: enrollment.student_id.clone(),
        points: self.points.points_for(&item),
        question_id: item.id,
        order,
      }));
    }

    Ok(AssignmentBatch {
      exam_id: req.exam_id.to_string(),
      student_count: req.enrollments.len(),
      per_student,
      records,
      warnings,
    })
  }

  fn plan_student(&mut self, buckets: &[Bucket], rng: &mut dyn RandomSource) -> Vec<Item> {
    let mut picked = Vec::new();
    for b in buckets.iter().filter(|b| b.needed > 0) {
      picked.extend(self.selector.select(&b.candidates, b.needed, rng));
    }
    // Second shuffle so easy items are not all listed first.
    shuffle(&mut picked, rng);
    picked
  }
}

/// Report buckets whose per-student need, multiplied by `student_count`, exceeds what they hold.
/// Those buckets can only be served by giving some students the same items.
pub fn check_pool(
  items: &[Item],
  configuration: &AssignmentConfiguration,
  student_count: usize,
) -> Result<PoolReport, DistributionError> {
  configuration.validate()?;
  let buckets = build_buckets(items, configuration)?;
  let shortages: Vec<PoolExhaustionWarning> = buckets
    .iter()
    .map(|b| (b, b.needed.saturating_mul(student_count.max(1))))
    .filter(|(b, needed)| *needed > b.candidates.len())
    .map(|(b, needed)| PoolExhaustionWarning::new(b.key.clone(), needed, b.candidates.len()))
    .collect();
  Ok(PoolReport { sufficient: shortages.is_empty(), shortages })
}

fn scoped_pool(items: &[Item], configuration: &AssignmentConfiguration) -> Vec<Item> {
  items
    .iter()
    .filter(|it| it.is_active)
    .filter(|it| configuration.selected_pool.as_ref().map_or(true, |p| p.contains(&it.id)))
    .cloned()
    .collect()
}

fn difficulty_buckets(pool: &[Item], category: Option<&str>, counts: DifficultySplit<usize>) -> Vec<Bucket> {
  Difficulty::ALL
    .into_iter()
    .map(|d| {
      let mut pred = PoolPredicate::default().difficulty(d);
      if let Some(c) = category {
        pred = pred.category(c);
      }
      Bucket {
        key: BucketKey { category_id: category.map(str::to_string), difficulty: Some(d) },
        candidates: filter(pool, &pred),
        needed: counts.get(d),
      }
    })
    .collect()
}

fn build_buckets(items: &[Item], configuration: &AssignmentConfiguration) -> Result<Vec<Bucket>, DistributionError> {
  let pool = scoped_pool(items, configuration);
  let buckets = match &configuration.distribution {
    DistributionConfig::Flat { total_count, difficulty_percentages, category_filter } => {
      let counts = plan_flat(*total_count, difficulty_percentages)?;
      let narrowed = match category_filter {
        Some(cats) => filter(&pool, &PoolPredicate::default().any_category_of(cats)),
        None => pool,
      };
      difficulty_buckets(&narrowed, None, counts)
    }
    DistributionConfig::PerCategory { categories } => {
      let mut out = Vec::new();
      for (category_id, quota) in categories {
        match &quota.difficulty_distribution {
          Some(dist) => {
            let counts = DifficultySplit::new(dist.easy as usize, dist.medium as usize, dist.hard as usize);
            out.extend(difficulty_buckets(&pool, Some(category_id.as_str()), counts));
          }
          None => {
            let pred = PoolPredicate::default().category(category_id).any_difficulty_of(&quota.difficulties);
            out.push(Bucket {
              key: BucketKey { category_id: Some(category_id.clone()), difficulty: None },
              candidates: filter(&pool, &pred),
              needed: quota.count as usize,
            });
          }
        }
      }
      out
    }
  };

  if buckets.iter().all(|b| b.candidates.is_empty()) {
    let scope = match &configuration.distribution {
      DistributionConfig::Flat { category_filter: Some(cats), .. } => {
        format!("categories [{}]", cats.iter().cloned().collect::<Vec<_>>().join(", "))
      }
      DistributionConfig::Flat { .. } => "the item pool".to_string(),
      DistributionConfig::PerCategory { categories } => {
        format!("categories [{}]", categories.keys().cloned().collect::<Vec<_>>().join(", "))
      }
    };
    return Err(DistributionError::NoCandidatesAvailable { scope });
  }
  Ok(buckets)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::distribution::config::CategoryQuota;
  use crate::domain::ItemKind;
  use rand::{rngs::StdRng, SeedableRng};
  use std::collections::{BTreeMap, HashMap};

  fn item(id: &str, d: Difficulty, cat: &str) -> Item {
    Item {
      id: id.into(),
      difficulty: d,
      category_id: Some(cat.into()),
      max_score: 10.0,
      kind: ItemKind::Question,
      is_active: true,
    }
  }

  fn students(n: usize) -> Vec<EnrollmentRecord> {
    (0..n)
      .map(|i| EnrollmentRecord { student_id: format!("s{i}"), registration_id: format!("r{i}") })
      .collect()
  }

  fn flat(total: i64, e: i64, m: i64, h: i64) -> AssignmentConfiguration {
    AssignmentConfiguration::new(
      ItemKind::Question,
      DistributionConfig::Flat {
        total_count: total,
        difficulty_percentages: DifficultySplit::new(e, m, h),
        category_filter: None,
      },
    )
  }

  /// 5 easy, 3 medium, 2 hard.
  fn pool_5_3_2() -> Vec<Item> {
    let mut v = Vec::new();
    for i in 0..5 { v.push(item(&format!("e{i}"), Difficulty::Easy, "c")); }
    for i in 0..3 { v.push(item(&format!("m{i}"), Difficulty::Medium, "c")); }
    for i in 0..2 { v.push(item(&format!("h{i}"), Difficulty::Hard, "c")); }
    v
  }

  fn assert_orders_are_dense(batch: &AssignmentBatch, student_id: &str) {
    let mut orders: Vec<usize> = batch.for_student(student_id).map(|r| r.order).collect();
    orders.sort_unstable();
    assert_eq!(orders, (0..orders.len()).collect::<Vec<_>>(), "student {student_id}");
  }

  /// Counts calls and delegates to the real selector.
  struct SpySelector {
    calls: usize,
  }

  impl Selector for SpySelector {
    fn select(&mut self, candidates: &[Item], needed: usize, rng: &mut dyn RandomSource) -> Vec<Item> {
      self.calls += 1;
      RecyclingSelector.select(candidates, needed, rng)
    }
  }

  #[test]
  fn flat_scenario_draws_from_matching_buckets() {
    let pool = pool_5_3_2();
    let cfg = flat(4, 50, 25, 25);
    let enrolled = students(1);
    let mut planner = AssignmentPlanner::new(PointsPolicy::Fixed(1));
    let batch = planner
      .plan(
        PlanRequest { exam_id: "x1", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(11),
      )
      .unwrap();

    assert_eq!(batch.records.len(), 4);
    assert_orders_are_dense(&batch, "s0");
    assert!(batch.warnings.is_empty());

    let by_id: HashMap<&str, Difficulty> = pool.iter().map(|i| (i.id.as_str(), i.difficulty)).collect();
    let mut per_difficulty: HashMap<Difficulty, usize> = HashMap::new();
    for r in &batch.records {
      assert_eq!(r.exam_id, "x1");
      assert_eq!(r.points, 1);
      *per_difficulty.entry(by_id[r.question_id.as_str()]).or_insert(0) += 1;
    }
    assert_eq!(per_difficulty[&Difficulty::Easy], 2);
    assert_eq!(per_difficulty[&Difficulty::Medium], 1);
    assert_eq!(per_difficulty[&Difficulty::Hard], 1);
  }

  #[test]
  fn single_item_is_recycled_to_fill_the_quota() {
    let pool = vec![item("only", Difficulty::Easy, "c")];
    let cfg = flat(3, 100, 0, 0);
    let enrolled = students(1);
    let batch = AssignmentPlanner::new(PointsPolicy::Fixed(1))
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(5),
      )
      .unwrap();

    assert_eq!(batch.records.len(), 3);
    assert!(batch.records.iter().all(|r| r.question_id == "only"));
    let orders: Vec<usize> = batch.records.iter().map(|r| r.order).collect();
    assert_eq!(orders, [0, 1, 2]);
    assert_eq!(batch.warnings.len(), 1);
    let w = &batch.warnings[0];
    assert_eq!(w.bucket.difficulty, Some(Difficulty::Easy));
    assert_eq!((w.needed, w.available), (3, 1));
    assert_eq!(w.ratio, Some(3.0));
    assert_eq!(batch.pool_item_ids(), ["only"]);
  }

  #[test]
  fn students_get_independent_selections() {
    let mut pool = Vec::new();
    for i in 0..24 {
      let d = Difficulty::ALL[i % 3];
      pool.push(item(&format!("q{i}"), d, "c"));
    }
    let cfg = flat(6, 50, 30, 20);
    let enrolled = students(2);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut planner = AssignmentPlanner::new(PointsPolicy::Fixed(1));

    let trials = 200;
    let mut differing = 0;
    for _ in 0..trials {
      let batch = planner
        .plan(PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg }, &mut rng)
        .unwrap();
      let a: Vec<&str> = batch.for_student("s0").map(|r| r.question_id.as_str()).collect();
      let b: Vec<&str> = batch.for_student("s1").map(|r| r.question_id.as_str()).collect();
      assert_eq!(a.len(), 6);
      assert_eq!(b.len(), 6);
      if a != b { differing += 1; }
    }
    assert!(differing * 100 >= trials * 95, "only {differing}/{trials} trials differed");
  }

  #[test]
  fn invalid_distribution_is_rejected_before_any_selection() {
    let mut categories = BTreeMap::new();
    categories.insert(
      "c".to_string(),
      CategoryQuota::distributed(4, DifficultySplit::new(1, 1, 1)),
    );
    let cfg = AssignmentConfiguration::new(ItemKind::Question, DistributionConfig::PerCategory { categories });
    let pool = pool_5_3_2();
    let enrolled = students(3);
    let mut planner = AssignmentPlanner::with_selector(SpySelector { calls: 0 }, PointsPolicy::Fixed(1));

    let err = planner
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(1),
      )
      .unwrap_err();
    assert!(matches!(err, DistributionError::InvalidConfig { ref field, .. } if field == "categories.c.difficultyDistribution"));
    assert_eq!(planner.selector().calls, 0);
  }

  #[test]
  fn empty_scope_fails_without_records() {
    let pool = pool_5_3_2();
    let mut cfg = flat(4, 50, 25, 25);
    if let DistributionConfig::Flat { category_filter, .. } = &mut cfg.distribution {
      *category_filter = Some(["missing".to_string()].into());
    }
    let enrolled = students(2);
    let mut planner = AssignmentPlanner::with_selector(SpySelector { calls: 0 }, PointsPolicy::Fixed(1));
    let err = planner
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(1),
      )
      .unwrap_err();
    assert!(matches!(err, DistributionError::NoCandidatesAvailable { ref scope } if scope.contains("missing")));
    assert_eq!(planner.selector().calls, 0);
  }

  #[test]
  fn category_filter_narrows_every_difficulty_bucket() {
    let mut pool = pool_5_3_2();
    for i in 0..4 { pool.push(item(&format!("g-e{i}"), Difficulty::Easy, "graphs")); }
    for i in 0..2 { pool.push(item(&format!("g-m{i}"), Difficulty::Medium, "graphs")); }
    for i in 0..2 { pool.push(item(&format!("g-h{i}"), Difficulty::Hard, "graphs")); }
    let mut cfg = flat(4, 50, 25, 25);
    if let DistributionConfig::Flat { category_filter, .. } = &mut cfg.distribution {
      *category_filter = Some(["graphs".to_string()].into());
    }
    let enrolled = students(2);
    let batch = AssignmentPlanner::new(PointsPolicy::Fixed(1))
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(31),
      )
      .unwrap();

    assert!(batch.warnings.is_empty(), "{:?}", batch.warnings);
    let by_id: HashMap<&str, &Item> = pool.iter().map(|i| (i.id.as_str(), i)).collect();
    for s in &enrolled {
      let mut per_difficulty: HashMap<Difficulty, usize> = HashMap::new();
      for r in batch.for_student(&s.student_id) {
        let it = by_id[r.question_id.as_str()];
        assert_eq!(it.category_id.as_deref(), Some("graphs"), "{} leaked through the filter", it.id);
        *per_difficulty.entry(it.difficulty).or_insert(0) += 1;
      }
      assert_eq!(per_difficulty[&Difficulty::Easy], 2);
      assert_eq!(per_difficulty[&Difficulty::Medium], 1);
      assert_eq!(per_difficulty[&Difficulty::Hard], 1);
    }
  }

  #[test]
  fn huge_total_is_rejected_before_selection() {
    let cfg = flat(i64::MAX / 100, 100, 0, 0);
    let pool = pool_5_3_2();
    let enrolled = students(1);
    let mut planner = AssignmentPlanner::with_selector(SpySelector { calls: 0 }, PointsPolicy::Fixed(1));
    let err = planner
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(1),
      )
      .unwrap_err();
    assert!(matches!(err, DistributionError::InvalidConfig { ref field, .. } if field == "totalCount"));
    assert_eq!(planner.selector().calls, 0);
  }

  #[test]
  fn empty_bucket_is_a_warning_not_a_failure() {
    // only easy items, but hard is requested
    let pool: Vec<Item> = (0..4).map(|i| item(&format!("e{i}"), Difficulty::Easy, "c")).collect();
    let cfg = flat(4, 50, 0, 50);
    let enrolled = students(1);
    let batch = AssignmentPlanner::new(PointsPolicy::Fixed(1))
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(9),
      )
      .unwrap();
    assert_eq!(batch.records.len(), 2);
    assert_orders_are_dense(&batch, "s0");
    assert_eq!(batch.warnings.len(), 1);
    assert_eq!(batch.warnings[0].bucket.difficulty, Some(Difficulty::Hard));
    assert_eq!(batch.warnings[0].ratio, None);
  }

  #[test]
  fn per_category_mixes_bucketed_and_filtered_quotas() {
    let mut pool = pool_5_3_2();
    pool.push(item("g-e", Difficulty::Easy, "graphs"));
    pool.push(item("g-h1", Difficulty::Hard, "graphs"));
    pool.push(item("g-h2", Difficulty::Hard, "graphs"));
    pool.push(item("g-m", Difficulty::Medium, "graphs"));

    let mut categories = BTreeMap::new();
    categories.insert(
      "c".to_string(),
      CategoryQuota::distributed(3, DifficultySplit::new(1, 1, 1)),
    );
    categories.insert(
      "graphs".to_string(),
      CategoryQuota::filtered(2, &[Difficulty::Hard]),
    );
    let cfg = AssignmentConfiguration::new(ItemKind::Question, DistributionConfig::PerCategory { categories });
    let enrolled = students(4);

    let batch = AssignmentPlanner::new(PointsPolicy::MaxScore)
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(77),
      )
      .unwrap();

    assert_eq!(batch.per_student, 5);
    assert_eq!(batch.records.len(), 20);
    for s in &enrolled {
      assert_orders_are_dense(&batch, &s.student_id);
      let ids: Vec<&str> = batch.for_student(&s.student_id).map(|r| r.question_id.as_str()).collect();
      let graphs = ids.iter().filter(|id| id.starts_with("g-")).count();
      assert_eq!(graphs, 2);
      assert!(ids.iter().filter(|id| id.starts_with("g-")).all(|id| *id == "g-h1" || *id == "g-h2"));
    }
    assert!(batch.records.iter().all(|r| r.points == 10));
  }

  #[test]
  fn selected_pool_and_inactive_items_narrow_candidates() {
    let mut pool = pool_5_3_2();
    pool[0].is_active = false; // e0
    let mut cfg = flat(2, 100, 0, 0);
    cfg.selected_pool = Some(["e0".to_string(), "e1".to_string(), "m0".to_string()].into());
    let enrolled = students(1);
    let batch = AssignmentPlanner::new(PointsPolicy::Fixed(2))
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &enrolled, configuration: &cfg },
        &mut StdRng::seed_from_u64(3),
      )
      .unwrap();
    assert_eq!(batch.records.len(), 2);
    assert!(batch.records.iter().all(|r| r.question_id == "e1"));
  }

  #[test]
  fn no_students_yields_empty_batch() {
    let pool = pool_5_3_2();
    let cfg = flat(4, 50, 25, 25);
    let batch = AssignmentPlanner::new(PointsPolicy::Fixed(1))
      .plan(
        PlanRequest { exam_id: "x", items: &pool, enrollments: &[], configuration: &cfg },
        &mut StdRng::seed_from_u64(3),
      )
      .unwrap();
    assert!(batch.records.is_empty());
    assert_eq!(batch.student_count, 0);
  }

  #[test]
  fn pool_check_scales_need_by_student_count() {
    let pool = pool_5_3_2();
    let cfg = flat(4, 50, 25, 25); // 2 easy, 1 medium, 1 hard each
    let ok = check_pool(&pool, &cfg, 2).unwrap();
    assert!(ok.sufficient);

    let report = check_pool(&pool, &cfg, 3).unwrap();
    assert!(!report.sufficient);
    let mut short: Vec<(Option<Difficulty>, usize, usize)> =
      report.shortages.iter().map(|s| (s.bucket.difficulty, s.needed, s.available)).collect();
    short.sort_by_key(|s| s.0);
    assert_eq!(
      short,
      [(Some(Difficulty::Easy), 6, 5), (Some(Difficulty::Hard), 3, 2)]
    );
  }
}
