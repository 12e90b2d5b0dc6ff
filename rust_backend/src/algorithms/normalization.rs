//! Rescaling of primary-subject scores onto the common 0-100 scale.

use crate::core::domain::{ClassGroup, PerSubject, Subject};
use crate::error::Result;

/// Score columns of one class group, every subject on the 0-100 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScores {
    pub class_id: String,
    pub columns: PerSubject<Vec<f64>>,
}

impl NormalizedScores {
    pub fn column(&self, subject: Subject) -> &[f64] {
        self.columns.get(subject)
    }

    /// Number of students in the group.
    pub fn len(&self) -> usize {
        self.columns.chinese.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Divides primary-subject scores by a fixed divisor; other subjects pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    primary_divisor: f64,
}

impl Normalizer {
    pub fn new(primary_divisor: f64) -> Self {
        Self { primary_divisor }
    }

    /// Rescale a single raw score.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_hours::algorithms::normalization::Normalizer;
    /// use class_hours::core::domain::Subject;
    ///
    /// let normalizer = Normalizer::new(1.5);
    /// assert_eq!(normalizer.normalize_score(Subject::Math, 150.0), 100.0);
    /// assert_eq!(normalizer.normalize_score(Subject::Physics, 82.0), 82.0);
    /// ```
    pub fn normalize_score(&self, subject: Subject, raw: f64) -> f64 {
        if subject.is_primary() {
            raw / self.primary_divisor
        } else {
            raw
        }
    }

    /// Extract and rescale every subject column of a class group.
    ///
    /// # Errors
    ///
    /// `MissingSubjectData` if any record of the group lacks a score.
    pub fn normalize(&self, group: &ClassGroup) -> Result<NormalizedScores> {
        let columns = PerSubject::try_from_fn(|subject| -> Result<Vec<f64>> {
            let raw = group.column(subject)?;
            Ok(raw
                .into_iter()
                .map(|v| self.normalize_score(subject, v))
                .collect())
        })?;

        Ok(NormalizedScores {
            class_id: group.class_id.clone(),
            columns,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(1.5)
    }
}
