//! Splitting a total item count into difficulty buckets by percentage.
//!
//! Uses largest-remainder apportionment so the three buckets always add up to the total;
//! rounding each bucket on its own would not.

use crate::domain::{Difficulty, DifficultySplit};
use crate::error::DistributionError;

/// Validate a percentage triple: each in `0..=100`, summing to exactly 100.
pub fn validate_percentages(field: &str, pct: &DifficultySplit<i64>) -> Result<(), DistributionError> {
  for d in Difficulty::ALL {
    let p = pct.get(d);
    if !(0..=100).contains(&p) {
      return Err(DistributionError::invalid(format!("{field}.{d}"), format!("percentage {p} is outside 0..=100")));
    }
  }
  let sum = pct.sum();
  if sum != 100 {
    return Err(DistributionError::invalid(field, format!("percentages sum to {sum}, expected 100")));
  }
  Ok(())
}

/// Compute integer bucket sizes for `total` items split by `pct`.
///
/// Each bucket gets `floor(total * pct / 100)`; the leftover units go one at a time to the
/// buckets with the largest fractional part, ties resolved easy, medium, hard.
pub fn plan_flat(total: i64, pct: &DifficultySplit<i64>) -> Result<DifficultySplit<usize>, DistributionError> {
  if total < 0 {
    return Err(DistributionError::invalid("totalCount", format!("must be non-negative, got {total}")));
  }
  validate_percentages("difficultyPercentages", pct)?;

  let mut floors = DifficultySplit::<i64>::default();
  // (bucket, fractional part scaled by 100)
  let mut fractions: Vec<(Difficulty, i64)> = Vec::with_capacity(3);
  for d in Difficulty::ALL {
    let scaled = total
      .checked_mul(pct.get(d))
      .ok_or_else(|| DistributionError::invalid("totalCount", format!("{total} is too large")))?;
    *floors.get_mut(d) = scaled / 100;
    fractions.push((d, scaled % 100));
  }

  let mut remainder = total - floors.sum();
  // Stable sort keeps easy/medium/hard order among equal fractions.
  fractions.sort_by(|a, b| b.1.cmp(&a.1));
  for (d, _) in fractions {
    if remainder == 0 { break; }
    *floors.get_mut(d) += 1;
    remainder -= 1;
  }

  Ok(DifficultySplit::new(floors.easy as usize, floors.medium as usize, floors.hard as usize))
}
