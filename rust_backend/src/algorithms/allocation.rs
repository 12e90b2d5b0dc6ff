//! Proportional distribution of the leftover hour pool.

use log::debug;
use serde::{Deserialize, Serialize};

use super::weights::WeightVector;
use crate::config::RoundingMode;
use crate::core::domain::Subject;
use crate::error::{Error, Result};

/// Extra hours per weighted subject, for one class group.
///
/// Entries are rounded independently, so their sum may differ from the pool
/// they were cut from; the schedule assembler reconciles the difference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourAllocation {
    entries: Vec<(Subject, i32)>,
}

impl HourAllocation {
    pub fn get(&self, subject: Subject) -> i32 {
        self.entries
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|(_, h)| *h)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, i32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn total(&self) -> i32 {
        self.entries.iter().map(|(_, h)| h).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits a fixed pool of hours proportionally to subject weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HourAllocator {
    rounding: RoundingMode,
}

impl HourAllocator {
    pub fn new(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    /// Allocate `pool` hours across the subjects of `weights`.
    ///
    /// Each share `w / sum(w) * pool` is rounded on its own. When every weight
    /// is zero the pool is split evenly before rounding.
    ///
    /// # Errors
    ///
    /// `InvalidWeight` for a negative or non-finite weight.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_hours::algorithms::allocation::HourAllocator;
    /// use class_hours::algorithms::weights::WeightVector;
    /// use class_hours::core::domain::Subject;
    ///
    /// let weights = WeightVector::new(vec![(Subject::Math, 3.0), (Subject::Physics, 1.0)]);
    /// let allocation = HourAllocator::default().allocate(&weights, 8).unwrap();
    /// assert_eq!(allocation.get(Subject::Math), 6);
    /// assert_eq!(allocation.get(Subject::Physics), 2);
    /// ```
    pub fn allocate(&self, weights: &WeightVector, pool: u32) -> Result<HourAllocation> {
        for (subject, value) in weights.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight { subject, value });
            }
        }

        if weights.is_empty() {
            return Ok(HourAllocation::default());
        }

        let pool = f64::from(pool);
        let total = weights.total();
        let shares: Vec<(Subject, f64)> = if total > 0.0 {
            weights.iter().map(|(s, w)| (s, w / total * pool)).collect()
        } else {
            debug!("All weights are zero; splitting {} hours evenly", pool);
            let even = pool / weights.len() as f64;
            weights.subjects().map(|s| (s, even)).collect()
        };

        let entries = shares
            .into_iter()
            .map(|(s, share)| (s, self.rounding.round(share) as i32))
            .collect();

        Ok(HourAllocation { entries })
    }
}
