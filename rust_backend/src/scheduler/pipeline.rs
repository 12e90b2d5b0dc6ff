//! Per-class planning pipeline and the file-to-report convenience entry point.
//!
//! [`SchedulePlanner`] owns the validated configuration and one instance of
//! every stage; [`plan_schedule_file`] loads a score sheet and plans it.

use anyhow::Context;
use log::{debug, info, warn};
use std::path::Path;

use super::assembler::ScheduleAssembler;
use super::report::{ClassReport, ScheduleReport, SubjectReport};
use crate::algorithms::{
    CorrelationAdjuster, CorrelationMatrix, HourAllocator, Normalizer, SubjectStatistics,
    SubjectWeightEstimator,
};
use crate::config::CurriculumConfig;
use crate::core::domain::{ClassGroup, PerSubject, ScoreTable, Subject};
use crate::error::{Error, Result};
use crate::io::loaders::{ScoreLoadResult, ScoreLoader};
use crate::preprocessing::validator::ScoreValidator;

/// Runs the per-class planning pipeline over a score table.
///
/// For each class group: normalize scores, estimate base weights, adjust
/// them by cross-subject correlation, allocate the leftover hours, and
/// assemble the balanced schedule.
pub struct SchedulePlanner {
    config: CurriculumConfig,
    normalizer: Normalizer,
    estimator: SubjectWeightEstimator,
    adjuster: CorrelationAdjuster,
    allocator: HourAllocator,
}

impl SchedulePlanner {
    /// Create a planner with the default curriculum.
    pub fn new() -> Self {
        Self::build(CurriculumConfig::default())
    }

    /// Create a planner with a custom curriculum.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration is inconsistent.
    pub fn with_config(config: CurriculumConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CurriculumConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.primary_scale_divisor),
            estimator: SubjectWeightEstimator::new(config.weights.clone()),
            adjuster: CorrelationAdjuster::new(&config.correlation),
            allocator: HourAllocator::new(config.rounding),
            config,
        }
    }

    pub fn config(&self) -> &CurriculumConfig {
        &self.config
    }

    /// Plan every class of `table`, in class-id order.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the table fails validation
    /// * `MissingSubjectData` if a class still holds incomplete records
    ///   (only possible with `drop_incomplete_records = false`)
    /// * `NegativeHours` if balancing goes negative and that is forbidden
    pub fn plan(&self, table: &ScoreTable) -> Result<ScheduleReport> {
        let validation = ScoreValidator::validate_table(table, &self.config);
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        if !validation.is_valid {
            return Err(Error::InvalidInput(validation.errors.join("; ")));
        }

        let filtered;
        let (table, dropped_records) = if self.config.drop_incomplete_records {
            let (complete, dropped) = table.complete_records();
            filtered = complete;
            (&filtered, dropped)
        } else {
            (table, 0)
        };
        if dropped_records > 0 {
            info!("Excluded {} incomplete records", dropped_records);
        }

        let classes = table
            .group_by_class()
            .iter()
            .map(|group| self.plan_class(group))
            .collect::<Result<Vec<ClassReport>>>()?;

        info!(
            "Planned {} classes from {} records",
            classes.len(),
            table.len()
        );

        Ok(ScheduleReport {
            source_checksum: None,
            total_hours: self.config.total_hours,
            dropped_records,
            warnings: validation.warnings,
            classes,
        })
    }

    /// Plan a table produced by [`ScoreLoader`], recording its checksum.
    pub fn plan_loaded(&self, loaded: &ScoreLoadResult) -> Result<ScheduleReport> {
        let mut report = self.plan(&loaded.table)?;
        report.source_checksum = Some(loaded.checksum.clone());
        Ok(report)
    }

    /// Plan a single class group.
    pub fn plan_class(&self, group: &ClassGroup) -> Result<ClassReport> {
        let config = &self.config;
        let scores = self.normalizer.normalize(group)?;

        let statistics = PerSubject::from_fn(|s| {
            SubjectStatistics::from_scores(scores.column(s), config.failure_threshold)
        });
        let weighted: Vec<(Subject, SubjectStatistics)> = Subject::WEIGHTED
            .iter()
            .map(|&s| (s, *statistics.get(s)))
            .collect();

        let base = self.estimator.estimate(&weighted);
        let matrix = CorrelationMatrix::pearson(&scores);
        let adjusted = self.adjuster.adjust(&matrix, &base);
        let allocation = self
            .allocator
            .allocate(&adjusted, config.remaining_hours())?;

        debug!(
            "Class {}: adjusted weights {:?}, allocation {:?}",
            group.class_id, adjusted, allocation
        );

        let assembled = ScheduleAssembler::new(config).assemble(&allocation)?;

        let subjects = Subject::ALL
            .iter()
            .map(|&s| SubjectReport {
                subject: s,
                name: config.display_name(s).to_string(),
                statistics: *statistics.get(s),
                base_weight: base.get(s),
                adjusted_weight: adjusted.get(s),
                allocated_hours: allocation.get(s),
            })
            .collect();

        info!(
            "Class {}: {} students, schedule total {}",
            group.class_id,
            group.len(),
            assembled.schedule.total()
        );

        Ok(ClassReport {
            class_id: group.class_id.clone(),
            students: group.len(),
            subjects,
            balance: assembled.adjustment,
            schedule: assembled.schedule,
        })
    }
}

impl Default for SchedulePlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: load a score file and plan it.
pub fn plan_schedule_file(path: &Path, config: CurriculumConfig) -> anyhow::Result<ScheduleReport> {
    let loaded = ScoreLoader::load_from_file(path)
        .with_context(|| format!("Failed to load scores from {}", path.display()))?;
    let planner = SchedulePlanner::with_config(config)?;
    let report = planner
        .plan_loaded(&loaded)
        .context("Failed to plan class hours")?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::StudentRecord;

    /// Scores for one student; `offset` shifts every subject.
    fn student(class_id: &str, offset: f64) -> StudentRecord {
        StudentRecord::new(
            class_id,
            PerSubject::from_fn(|s| {
                let base = 60.0 + offset + (s.index() as f64) * 2.0;
                if s.is_primary() {
                    base * 1.5
                } else {
                    base
                }
            }),
        )
    }

    fn varied_class(class_id: &str) -> Vec<StudentRecord> {
        let mut records = Vec::new();
        for (i, offset) in [-15.0, -4.0, 0.0, 3.0, 9.0, 21.0].iter().enumerate() {
            let mut r = student(class_id, *offset);
            // Break perfect collinearity between subjects
            r.scores.math = r.scores.math.map(|v| v - (i as f64) * 4.0);
            r.scores.physics = r.scores.physics.map(|v| v + ((i * i) % 5) as f64 * 3.0);
            r.scores.history = r.scores.history.map(|v| v - ((i * 7) % 4) as f64 * 2.0);
            records.push(r);
        }
        records
    }

    #[test]
    fn test_plan_sums_to_budget() {
        let mut records = varied_class("1");
        records.extend(varied_class("2"));
        let report = SchedulePlanner::new().plan(&ScoreTable::new(records)).unwrap();

        assert_eq!(report.classes.len(), 2);
        for class in &report.classes {
            assert_eq!(class.schedule.total(), 39);
            assert_eq!(class.students, 6);
            assert_eq!(class.subjects.len(), 9);
        }
    }

    #[test]
    fn test_unweighted_subjects_report_no_weight() {
        let report = SchedulePlanner::new()
            .plan(&ScoreTable::new(varied_class("1")))
            .unwrap();
        let class = &report.classes[0];

        for subject in &class.subjects {
            assert_eq!(subject.base_weight.is_some(), subject.subject.is_weighted());
            if !subject.subject.is_weighted() {
                assert_eq!(subject.allocated_hours, 0);
            }
        }
    }

    #[test]
    fn test_incomplete_records_dropped_by_default() {
        let mut records = varied_class("1");
        let mut partial = student("1", 5.0);
        partial.scores.biology = None;
        records.push(partial);

        let report = SchedulePlanner::new().plan(&ScoreTable::new(records)).unwrap();
        assert_eq!(report.dropped_records, 1);
        assert_eq!(report.classes[0].students, 6);
    }

    #[test]
    fn test_incomplete_records_fatal_when_kept() {
        let mut records = varied_class("1");
        let mut partial = student("1", 5.0);
        partial.scores.biology = None;
        records.push(partial);

        let config = CurriculumConfig {
            drop_incomplete_records: false,
            ..CurriculumConfig::default()
        };
        let planner = SchedulePlanner::with_config(config).unwrap();
        let err = planner.plan(&ScoreTable::new(records)).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingSubjectData {
                subject: Subject::Biology,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_table_is_invalid() {
        let err = SchedulePlanner::new().plan(&ScoreTable::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_oversized_budget_never_reaches_planning() {
        assert!(CurriculumConfig::from_toml_str("total_hours = 3000000000").is_err());

        let config = CurriculumConfig {
            total_hours: 3_000_000_000,
            ..CurriculumConfig::default()
        };
        assert!(matches!(
            SchedulePlanner::with_config(config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CurriculumConfig {
            total_hours: 10,
            ..CurriculumConfig::default()
        };
        assert!(SchedulePlanner::with_config(config).is_err());
    }
}
