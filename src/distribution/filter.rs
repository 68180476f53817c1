//! Pool filtering: order-preserving subsequences of the candidate set.

use std::collections::BTreeSet;

use crate::domain::{Difficulty, Item};

/// Predicate over item metadata. `None` fields place no constraint.
#[derive(Clone, Debug, Default)]
pub struct PoolPredicate<'a> {
  pub difficulty: Option<Difficulty>,
  pub category_id: Option<&'a str>,
  /// Item difficulty must be one of these (when set and non-empty).
  pub difficulties: Option<&'a BTreeSet<Difficulty>>,
  /// Item category must be one of these (when set and non-empty).
  pub category_ids: Option<&'a BTreeSet<String>>,
}

impl<'a> PoolPredicate<'a> {
  pub fn difficulty(mut self, d: Difficulty) -> Self {
    self.difficulty = Some(d);
    self
  }

  pub fn category(mut self, category_id: &'a str) -> Self {
    self.category_id = Some(category_id);
    self
  }

  pub fn any_difficulty_of(mut self, set: &'a BTreeSet<Difficulty>) -> Self {
    self.difficulties = Some(set);
    self
  }

  pub fn any_category_of(mut self, set: &'a BTreeSet<String>) -> Self {
    self.category_ids = Some(set);
    self
  }

  pub fn matches(&self, item: &Item) -> bool {
    if let Some(d) = self.difficulty {
      if item.difficulty != d { return false; }
    }
    if let Some(c) = self.category_id {
      if item.category_id.as_deref() != Some(c) { return false; }
    }
    if let Some(set) = self.difficulties.filter(|s| !s.is_empty()) {
      if !set.contains(&item.difficulty) { return false; }
    }
    if let Some(set) = self.category_ids.filter(|s| !s.is_empty()) {
      match &item.category_id {
        Some(c) if set.contains(c) => {}
        _ => return false,
      }
    }
    true
  }
}

/// Keep the items matching `predicate`, in their original order. An empty result is not an error.
pub fn filter(items: &[Item], predicate: &PoolPredicate<'_>) -> Vec<Item> {
  items.iter().filter(|it| predicate.matches(it)).cloned().collect()
}
