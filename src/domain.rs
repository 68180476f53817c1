//! Domain models used by the service: assessment items, enrollments, and assignment records.

use serde::{Deserialize, Serialize};

/// Difficulty tag carried by every question and MCQ.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  /// Bucket iteration order. Remainder ties and bucket walks follow it.
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Which catalog an item comes from. Coding questions and MCQs live behind different endpoints.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
  #[default]
  Question,
  Mcq,
}

/// One easy/medium/hard triple. Used for percentages, explicit counts, and planned quantities.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DifficultySplit<T> {
  pub easy: T,
  pub medium: T,
  pub hard: T,
}

impl<T: Copy> DifficultySplit<T> {
  pub fn new(easy: T, medium: T, hard: T) -> Self {
    Self { easy, medium, hard }
  }

  pub fn get(&self, difficulty: Difficulty) -> T {
    match difficulty {
      Difficulty::Easy => self.easy,
      Difficulty::Medium => self.medium,
      Difficulty::Hard => self.hard,
    }
  }

  pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut T {
    match difficulty {
      Difficulty::Easy => &mut self.easy,
      Difficulty::Medium => &mut self.medium,
      Difficulty::Hard => &mut self.hard,
    }
  }
}

impl DifficultySplit<i64> {
  pub fn sum(&self) -> i64 {
    self.easy + self.medium + self.hard
  }
}

fn default_active() -> bool { true }

/// A question or MCQ as fetched from the catalog. Extra catalog fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
  pub id: String,
  pub difficulty: Difficulty,
  #[serde(default)] pub category_id: Option<String>,
  #[serde(default)] pub max_score: f64,
  #[serde(default)] pub kind: ItemKind,
  #[serde(default = "default_active")] pub is_active: bool,
}

/// A student eligible for assignment in one exam.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrollmentRecord {
  pub student_id: String,
  pub registration_id: String,
}

/// One row of the output batch: item `question_id` at position `order` for `student_id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssignmentRecord {
  pub exam_id: String,
  pub student_id: String,
  pub question_id: String,
  pub order: usize,
  pub points: i64,
}
