//! Score table validation with error and warning reporting.
//!
//! This module checks a loaded score table before planning: that there is
//! something to plan, which records carry blank cells, which scores fall
//! outside the plausible range, and which classes are too small for the
//! distribution statistics to mean much.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::CurriculumConfig;
use crate::core::domain::ScoreTable;

/// Smallest class for which skewness is defined.
pub const MIN_CLASS_SIZE: usize = 3;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false; warnings are informational.
///
/// # Examples
///
/// ```
/// use class_hours::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_warning("Class 3 has 2 students".to_string());
/// assert!(result.is_valid);
///
/// result.add_error("Score table is empty".to_string());
/// assert!(!result.is_valid);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary counts gathered during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_records: usize,
    pub complete_records: usize,
    pub incomplete_records: usize,
    pub classes: usize,
    pub out_of_range_scores: usize,
    pub small_classes: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for student score tables.
pub struct ScoreValidator;

impl ScoreValidator {
    /// Validate `table` against the score ranges of `config`.
    ///
    /// Errors:
    /// - the table is empty
    /// - no record has a score for every subject
    ///
    /// Warnings:
    /// - records with blank cells (excluded before planning, or fatal for
    ///   their class when `drop_incomplete_records` is off)
    /// - scores below 0 or above the subject's full score
    /// - classes with fewer than [`MIN_CLASS_SIZE`] complete records
    pub fn validate_table(table: &ScoreTable, config: &CurriculumConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_records = table.len();

        if table.is_empty() {
            result.add_error("Score table is empty".to_string());
            return result;
        }

        let mut class_sizes: BTreeMap<&str, usize> = BTreeMap::new();
        for (row, record) in table.records.iter().enumerate() {
            let complete = class_sizes.entry(record.class_id.as_str()).or_insert(0);

            let missing = record.missing_subjects();
            if missing.is_empty() {
                result.stats.complete_records += 1;
                *complete += 1;
            } else {
                result.stats.incomplete_records += 1;
                let keys: Vec<&str> = missing.iter().map(|s| s.key()).collect();
                let outcome = if config.drop_incomplete_records {
                    "excluded"
                } else {
                    "its class cannot be planned"
                };
                result.add_warning(format!(
                    "Row {} (class {}) is missing {}; {}",
                    row + 1,
                    record.class_id,
                    keys.join(", "),
                    outcome
                ));
            }

            for (subject, score) in record.scores.iter() {
                let Some(score) = score.filter(|v| v.is_finite()) else {
                    continue;
                };
                let max = config.max_score(subject);
                if !(0.0..=max).contains(&score) {
                    result.stats.out_of_range_scores += 1;
                    result.add_warning(format!(
                        "Row {} (class {}): {} score {} outside [0, {}]",
                        row + 1,
                        record.class_id,
                        subject.key(),
                        score,
                        max
                    ));
                }
            }
        }

        result.stats.classes = class_sizes.len();
        for (class_id, size) in &class_sizes {
            if *size < MIN_CLASS_SIZE {
                result.stats.small_classes += 1;
                result.add_warning(format!(
                    "Class {} has only {} complete records; statistics degenerate",
                    class_id, size
                ));
            }
        }

        if result.stats.complete_records == 0 {
            result.add_error("No record has a score for every subject".to_string());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{PerSubject, StudentRecord};

    fn record(class_id: &str) -> StudentRecord {
        StudentRecord::new(
            class_id,
            PerSubject::from_fn(|s| if s.is_primary() { 110.0 } else { 75.0 }),
        )
    }

    #[test]
    fn test_clean_table() {
        let table = ScoreTable::new(vec![record("1"), record("1"), record("1")]);
        let result = ScoreValidator::validate_table(&table, &CurriculumConfig::default());

        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.complete_records, 3);
        assert_eq!(result.stats.classes, 1);
    }

    #[test]
    fn test_empty_table_is_error() {
        let result =
            ScoreValidator::validate_table(&ScoreTable::default(), &CurriculumConfig::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Score table is empty".to_string()]);
    }

    #[test]
    fn test_out_of_range_scores_warn() {
        let mut high = record("1");
        high.scores.math = Some(151.0);
        high.scores.physics = Some(101.0);
        high.scores.history = Some(-1.0);
        let table = ScoreTable::new(vec![high, record("1"), record("1")]);

        let result = ScoreValidator::validate_table(&table, &CurriculumConfig::default());
        assert!(result.is_valid);
        assert_eq!(result.stats.out_of_range_scores, 3);
    }

    #[test]
    fn test_primary_full_marks_in_range() {
        let mut top = record("1");
        top.scores.english = Some(150.0);
        let table = ScoreTable::new(vec![top, record("1"), record("1")]);

        let result = ScoreValidator::validate_table(&table, &CurriculumConfig::default());
        assert_eq!(result.stats.out_of_range_scores, 0);
    }

    #[test]
    fn test_incomplete_and_small_classes_warn() {
        let mut partial = record("2");
        partial.scores.politics = None;
        let table = ScoreTable::new(vec![record("1"), record("1"), record("1"), partial]);

        let result = ScoreValidator::validate_table(&table, &CurriculumConfig::default());
        assert!(result.is_valid);
        assert_eq!(result.stats.incomplete_records, 1);
        assert_eq!(result.stats.small_classes, 1);
        assert!(result.warnings.iter().any(|w| w.contains("missing politics")));
    }

    #[test]
    fn test_incomplete_warning_follows_drop_setting() {
        let mut partial = record("1");
        partial.scores.biology = None;
        let table = ScoreTable::new(vec![record("1"), record("1"), record("1"), partial]);

        let dropped = ScoreValidator::validate_table(&table, &CurriculumConfig::default());
        assert!(dropped.warnings.iter().any(|w| w.ends_with("missing biology; excluded")));

        let config = CurriculumConfig {
            drop_incomplete_records: false,
            ..CurriculumConfig::default()
        };
        let kept = ScoreValidator::validate_table(&table, &config);
        assert!(kept.warnings.iter().any(|w| w.ends_with("its class cannot be planned")));
        assert!(!kept.warnings.iter().any(|w| w.contains("excluded")));
    }

    #[test]
    fn test_all_incomplete_is_error() {
        let mut partial = record("1");
        partial.scores.chinese = None;
        let result = ScoreValidator::validate_table(
            &ScoreTable::new(vec![partial]),
            &CurriculumConfig::default(),
        );
        assert!(!result.is_valid);
    }
}
