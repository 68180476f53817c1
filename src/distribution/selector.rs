//! Randomized selection with recycling.
//!
//! Randomness is always passed in explicitly so a seeded `StdRng` reproduces a run.

use rand::Rng;

use crate::domain::Item;

/// Source of uniform indices for shuffling.
pub trait RandomSource {
  /// Uniform index in `0..=upper`.
  fn index_inclusive(&mut self, upper: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
  fn index_inclusive(&mut self, upper: usize) -> usize {
    self.gen_range(0..=upper)
  }
}

/// Fisher–Yates: walk from the last index down to 1, swapping with a uniform index in `[0, i]`.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
  for i in (1..items.len()).rev() {
    let j = rng.index_inclusive(i);
    items.swap(i, j);
  }
}

/// Picks `needed` items out of a bucket.
pub trait Selector {
  fn select(&mut self, candidates: &[Item], needed: usize, rng: &mut dyn RandomSource) -> Vec<Item>;
}

/// Shuffles the candidates and takes from the front; when the shuffled copy runs out, a fresh
/// shuffle of the original candidates is appended. Items repeat once `needed` exceeds the pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecyclingSelector;

impl Selector for RecyclingSelector {
  fn select(&mut self, candidates: &[Item], needed: usize, rng: &mut dyn RandomSource) -> Vec<Item> {
    if candidates.is_empty() {
      return Vec::new();
    }
    let mut selected = Vec::with_capacity(needed.min(candidates.len()));
    while selected.len() < needed {
      let mut round = candidates.to_vec();
      shuffle(&mut round, rng);
      let take = (needed - selected.len()).min(round.len());
      selected.extend(round.into_iter().take(take));
    }
    selected
  }
}
