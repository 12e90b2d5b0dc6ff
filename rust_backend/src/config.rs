//! Curriculum configuration file support.
//!
//! Every constant the planner uses (hour budget, scaling divisor, weight
//! coefficients, correlation settings, baseline hours, display names) lives in
//! [`CurriculumConfig`]. Defaults reproduce the standard 39-hour senior-high
//! timetable; a `curriculum.toml` file may override any of them.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::domain::{PerSubject, Subject};
use crate::error::{Error, Result};

/// Largest accepted weekly hour budget.
pub const MAX_TOTAL_HOURS: u32 = 1_000;

const SEARCH_PATHS: [&str; 3] = [
    "curriculum.toml",
    "rust_backend/curriculum.toml",
    "../curriculum.toml",
];

/// Rounding rule for proportional hour shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour (2.5 -> 2, 3.5 -> 4).
    #[default]
    HalfEven,
    /// Ties go away from zero (2.5 -> 3).
    HalfUp,
}

impl RoundingMode {
    pub fn round(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfEven => value.round_ties_even(),
            RoundingMode::HalfUp => value.round(),
        }
    }
}

/// Coefficients of the need-weight formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightCoefficients {
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub failure_rate: f64,
}

impl Default for WeightCoefficients {
    fn default() -> Self {
        Self {
            mean: 0.40,
            std_dev: 0.25,
            skewness: 0.20,
            failure_rate: 0.15,
        }
    }
}

/// Cross-subject correlation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSettings {
    /// Number of most-correlated peers averaged per subject.
    pub top_k: usize,
    /// Multiplier applied to the peer average before it scales the weight.
    pub damping: f64,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            damping: 0.3,
        }
    }
}

/// Balancing-step settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingSettings {
    /// Fail instead of emitting a negative hour count after balancing.
    pub forbid_negative_hours: bool,
}

/// A subject with hard-coded weekly hours that takes no part in weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedSubject {
    pub name: String,
    pub hours: u32,
}

impl FixedSubject {
    pub fn new(name: impl Into<String>, hours: u32) -> Self {
        Self {
            name: name.into(),
            hours,
        }
    }
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurriculumConfig {
    /// Weekly hour budget every final schedule must sum to.
    pub total_hours: u32,
    /// Divisor that brings primary-subject scores onto the 0-100 scale.
    pub primary_scale_divisor: f64,
    /// Full score of a non-primary subject (range checks only).
    pub full_score: f64,
    /// Scores strictly below this count as failing.
    pub failure_threshold: f64,
    pub rounding: RoundingMode,
    /// Exclude records with blank cells instead of failing their class.
    pub drop_incomplete_records: bool,
    pub weights: WeightCoefficients,
    pub correlation: CorrelationSettings,
    pub balancing: BalancingSettings,
    pub baseline: PerSubject<u32>,
    pub display_names: PerSubject<String>,
    pub fixed_subjects: Vec<FixedSubject>,
}

fn default_baseline() -> PerSubject<u32> {
    PerSubject {
        chinese: 5,
        math: 6,
        english: 5,
        physics: 3,
        chemistry: 3,
        biology: 2,
        history: 2,
        politics: 1,
        geography: 1,
    }
}

fn default_display_names() -> PerSubject<String> {
    PerSubject {
        chinese: "语文".to_string(),
        math: "数学".to_string(),
        english: "外语".to_string(),
        physics: "物理".to_string(),
        chemistry: "化学".to_string(),
        biology: "生物学".to_string(),
        history: "历史".to_string(),
        politics: "思想政治".to_string(),
        geography: "地理".to_string(),
    }
}

fn default_fixed_subjects() -> Vec<FixedSubject> {
    vec![
        FixedSubject::new("体育与健康", 2),
        FixedSubject::new("音乐或心理", 1),
        FixedSubject::new("信息技术", 1),
        FixedSubject::new("通用技术", 1),
    ]
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            total_hours: 39,
            primary_scale_divisor: 1.5,
            full_score: 100.0,
            failure_threshold: 60.0,
            rounding: RoundingMode::default(),
            drop_incomplete_records: true,
            weights: WeightCoefficients::default(),
            correlation: CorrelationSettings::default(),
            balancing: BalancingSettings::default(),
            baseline: default_baseline(),
            display_names: default_display_names(),
            fixed_subjects: default_fixed_subjects(),
        }
    }
}

impl CurriculumConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(CurriculumConfig)` if the file was read, parsed, and validated
    /// * `Err(Error::Config)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CurriculumConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `curriculum.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(Some(config))` for the first file found
    /// * `Ok(None)` if no location holds a file
    /// * `Err(Error::Config)` if the file found cannot be read, parsed, or validated
    pub fn from_default_location() -> Result<Option<Self>> {
        Self::from_search_root(Path::new("."))
    }

    /// Same search as [`CurriculumConfig::from_default_location`], relative to `root`.
    pub fn from_search_root(root: &Path) -> Result<Option<Self>> {
        for relative in SEARCH_PATHS {
            let path = root.join(relative);
            if path.exists() {
                info!("Loading curriculum from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Sum of every baseline entry, weighted and fixed.
    ///
    /// Saturates at `u32::MAX`, which `validate` then rejects as over budget.
    pub fn baseline_total(&self) -> u32 {
        self.baseline
            .iter()
            .map(|(_, h)| *h)
            .chain(self.fixed_subjects.iter().map(|f| f.hours))
            .fold(0u32, |acc, h| acc.saturating_add(h))
    }

    /// Hours left for proportional allocation once the baseline is placed.
    pub fn remaining_hours(&self) -> u32 {
        self.total_hours.saturating_sub(self.baseline_total())
    }

    /// Highest plausible raw score for a subject.
    pub fn max_score(&self, subject: Subject) -> f64 {
        if subject.is_primary() {
            self.full_score * self.primary_scale_divisor
        } else {
            self.full_score
        }
    }

    pub fn display_name(&self, subject: Subject) -> &str {
        self.display_names.get(subject)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", name, value)))
            }
        };
        positive("primary_scale_divisor", self.primary_scale_divisor)?;
        positive("full_score", self.full_score)?;

        if !self.failure_threshold.is_finite() {
            return Err(Error::Config("failure_threshold must be finite".to_string()));
        }

        let coefficients = [
            ("weights.mean", self.weights.mean),
            ("weights.std_dev", self.weights.std_dev),
            ("weights.skewness", self.weights.skewness),
            ("weights.failure_rate", self.weights.failure_rate),
            ("correlation.damping", self.correlation.damping),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.total_hours > MAX_TOTAL_HOURS {
            return Err(Error::Config(format!(
                "total_hours must be at most {}, got {}",
                MAX_TOTAL_HOURS, self.total_hours
            )));
        }

        if self.baseline_total() > self.total_hours {
            return Err(Error::Config(format!(
                "Baseline hours ({}) exceed total_hours ({})",
                self.baseline_total(),
                self.total_hours
            )));
        }

        let mut seen = HashSet::new();
        let names = self
            .display_names
            .iter()
            .map(|(_, name)| name.as_str())
            .chain(self.fixed_subjects.iter().map(|f| f.name.as_str()));
        for name in names {
            if name.trim().is_empty() {
                return Err(Error::Config("Display names must not be empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(Error::Config(format!("Duplicate display name: {}", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_budget() {
        let config = CurriculumConfig::default();
        assert_eq!(config.baseline_total(), 33);
        assert_eq!(config.remaining_hours(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_score() {
        let config = CurriculumConfig::default();
        assert_eq!(config.max_score(Subject::Math), 150.0);
        assert_eq!(config.max_score(Subject::History), 100.0);
    }

    #[test]
    fn test_rounding_modes() {
        assert_eq!(RoundingMode::HalfEven.round(2.5), 2.0);
        assert_eq!(RoundingMode::HalfEven.round(3.5), 4.0);
        assert_eq!(RoundingMode::HalfUp.round(2.5), 3.0);
        assert_eq!(RoundingMode::HalfUp.round(1.49), 1.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            total_hours = 40
            rounding = "half_up"

            [correlation]
            damping = 0.5
        "#;
        let config = CurriculumConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.total_hours, 40);
        assert_eq!(config.rounding, RoundingMode::HalfUp);
        assert_eq!(config.correlation.damping, 0.5);
        assert_eq!(config.correlation.top_k, 3);
        assert_eq!(config.weights, WeightCoefficients::default());
        assert_eq!(config.display_name(Subject::Chinese), "语文");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CurriculumConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = CurriculumConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_baseline_over_budget_rejected() {
        let toml = "total_hours = 30";
        let err = CurriculumConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("exceed"));
    }

    #[test]
    fn test_duplicate_display_name_rejected() {
        let mut config = CurriculumConfig::default();
        config.fixed_subjects.push(FixedSubject::new("语文", 1));
        config.total_hours = 40;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_negative_coefficient_rejected() {
        let mut config = CurriculumConfig::default();
        config.weights.std_dev = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let mut config = CurriculumConfig::default();
        config.primary_scale_divisor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "failure_threshold = 55.0").unwrap();

        let config = CurriculumConfig::from_file(file.path()).unwrap();
        assert_eq!(config.failure_threshold, 55.0);
    }

    #[test]
    fn test_oversized_budget_rejected() {
        let err = CurriculumConfig::from_toml_str("total_hours = 3000000000").unwrap_err();
        assert!(err.to_string().contains("at most"));

        let mut config = CurriculumConfig::default();
        config.total_hours = MAX_TOTAL_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_baseline_total_saturates() {
        let mut config = CurriculumConfig::default();
        config.baseline.math = u32::MAX;
        config.total_hours = MAX_TOTAL_HOURS;
        assert_eq!(config.baseline_total(), u32::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_root_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CurriculumConfig::from_search_root(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_search_root_finds_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("rust_backend")).unwrap();
        fs::write(dir.path().join("rust_backend/curriculum.toml"), "total_hours = 40\n").unwrap();

        let config = CurriculumConfig::from_search_root(dir.path()).unwrap().unwrap();
        assert_eq!(config.total_hours, 40);
    }

    #[test]
    fn test_search_root_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("curriculum.toml"), "total_hours = \"oops\"\n").unwrap();

        let err = CurriculumConfig::from_search_root(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("Failed to parse")));
    }

    #[test]
    fn test_search_root_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("curriculum.toml"), "total_hours = 20\n").unwrap();

        assert!(CurriculumConfig::from_search_root(dir.path()).is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = CurriculumConfig::from_file("/nonexistent/curriculum.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
