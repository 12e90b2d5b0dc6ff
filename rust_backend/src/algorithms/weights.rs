//! Need-weight estimation from per-subject score distributions.
//!
//! Each weighted subject gets four metrics (mean, standard deviation,
//! skewness, failure rate). The metrics are min-max scaled across the
//! subjects of one class group and combined with fixed coefficients:
//!
//! ```text
//! weight = c_mean * (1 - s_mean) + c_std * s_std + c_skew * (1 + s_skew) + c_fail * s_fail
//! ```
//!
//! `s_mean` and `s_skew` are scaled inverted (`(max - v) / (max - min)`), the
//! other two directly. A metric without variation across subjects scales to
//! 0.5 for every subject.

use serde::{Deserialize, Serialize};

use super::statistics::SubjectStatistics;
use crate::config::WeightCoefficients;
use crate::core::domain::Subject;

/// Scaled value for a metric with no spread across subjects.
pub const NEUTRAL_SCALE: f64 = 0.5;

/// Metrics of one subject after min-max scaling, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledMetrics {
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub failure_rate: f64,
}

/// Weighted subject -> need weight, for one class group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    entries: Vec<(Subject, f64)>,
}

impl WeightVector {
    pub fn new(entries: Vec<(Subject, f64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, subject: Subject) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn subjects(&self) -> impl Iterator<Item = Subject> + '_ {
        self.entries.iter().map(|(s, _)| *s)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Subject, f64)> for WeightVector {
    fn from_iter<I: IntoIterator<Item = (Subject, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Turns subject statistics into base need weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectWeightEstimator {
    coefficients: WeightCoefficients,
}

impl SubjectWeightEstimator {
    pub fn new(coefficients: WeightCoefficients) -> Self {
        Self { coefficients }
    }

    /// Min-max scale the metrics of every subject against each other.
    ///
    /// The output is in input order. Each scaled value lies in `[0, 1]`.
    pub fn scale_metrics(stats: &[SubjectStatistics]) -> Vec<ScaledMetrics> {
        let means: Vec<f64> = stats.iter().map(|s| s.mean).collect();
        let stds: Vec<f64> = stats.iter().map(|s| s.std_dev).collect();
        let skews: Vec<f64> = stats.iter().map(|s| s.skewness).collect();
        let fails: Vec<f64> = stats.iter().map(|s| s.failure_rate).collect();

        let means = min_max_scale(&means, true);
        let stds = min_max_scale(&stds, false);
        let skews = min_max_scale(&skews, true);
        let fails = min_max_scale(&fails, false);

        (0..stats.len())
            .map(|i| ScaledMetrics {
                mean: means[i],
                std_dev: stds[i],
                skewness: skews[i],
                failure_rate: fails[i],
            })
            .collect()
    }

    /// Combine one subject's scaled metrics into its weight.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_hours::algorithms::weights::{ScaledMetrics, SubjectWeightEstimator};
    /// use class_hours::config::WeightCoefficients;
    ///
    /// let estimator = SubjectWeightEstimator::new(WeightCoefficients::default());
    /// let neutral = ScaledMetrics { mean: 0.5, std_dev: 0.5, skewness: 0.5, failure_rate: 0.5 };
    /// assert!((estimator.combine(&neutral) - 0.7).abs() < 1e-12);
    /// ```
    pub fn combine(&self, scaled: &ScaledMetrics) -> f64 {
        let c = &self.coefficients;
        c.mean * (1.0 - scaled.mean)
            + c.std_dev * scaled.std_dev
            + c.skewness * (1.0 + scaled.skewness)
            + c.failure_rate * scaled.failure_rate
    }

    /// Base weight for every subject in `stats`, in input order.
    pub fn estimate(&self, stats: &[(Subject, SubjectStatistics)]) -> WeightVector {
        let raw: Vec<SubjectStatistics> = stats.iter().map(|(_, s)| *s).collect();
        let scaled = Self::scale_metrics(&raw);

        stats
            .iter()
            .zip(&scaled)
            .map(|((subject, _), metrics)| (*subject, self.combine(metrics)))
            .collect()
    }
}

impl Default for SubjectWeightEstimator {
    fn default() -> Self {
        Self::new(WeightCoefficients::default())
    }
}

/// Min-max scale `values` to `[0, 1]`; `invert` maps the maximum to 0.
///
/// With no spread every output is [`NEUTRAL_SCALE`].
fn min_max_scale(values: &[f64], invert: bool) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    if max == min {
        return vec![NEUTRAL_SCALE; values.len()];
    }

    let range = max - min;
    values
        .iter()
        .map(|&v| {
            let scaled = if invert { (max - v) / range } else { (v - min) / range };
            scaled.clamp(0.0, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std_dev: f64, skewness: f64, failure_rate: f64) -> SubjectStatistics {
        SubjectStatistics {
            count: 40,
            mean,
            std_dev,
            skewness,
            failure_rate,
        }
    }

    #[test]
    fn test_min_max_scale_direction() {
        assert_eq!(min_max_scale(&[10.0, 20.0, 30.0], false), vec![0.0, 0.5, 1.0]);
        assert_eq!(min_max_scale(&[10.0, 20.0, 30.0], true), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_min_max_scale_no_spread() {
        assert_eq!(min_max_scale(&[4.0, 4.0, 4.0], false), vec![0.5; 3]);
        assert_eq!(min_max_scale(&[4.0, 4.0], true), vec![0.5; 2]);
    }

    #[test]
    fn test_identical_statistics_give_equal_weights() {
        let estimator = SubjectWeightEstimator::default();
        let input: Vec<(Subject, SubjectStatistics)> = Subject::WEIGHTED
            .iter()
            .map(|&s| (s, stats(72.0, 11.0, -0.3, 0.2)))
            .collect();

        let weights = estimator.estimate(&input);
        assert_eq!(weights.len(), 6);
        for (_, w) in weights.iter() {
            assert!((w - 0.7).abs() < 1e-12);
        }
    }

    #[test]
    fn test_formula_extremes() {
        let estimator = SubjectWeightEstimator::default();
        let input = vec![
            // lowest mean, widest spread, lowest skew, most failures
            (Subject::Math, stats(55.0, 20.0, -1.0, 0.5)),
            (Subject::Physics, stats(85.0, 5.0, 1.0, 0.0)),
        ];

        let scaled = SubjectWeightEstimator::scale_metrics(&[input[0].1, input[1].1]);
        assert_eq!(
            scaled[0],
            ScaledMetrics {
                mean: 1.0,
                std_dev: 1.0,
                skewness: 1.0,
                failure_rate: 1.0
            }
        );

        let weights = estimator.estimate(&input);
        // 0.40 * 0 + 0.25 * 1 + 0.20 * 2 + 0.15 * 1
        assert!((weights.get(Subject::Math).unwrap() - 0.80).abs() < 1e-12);
        // 0.40 * 1 + 0.25 * 0 + 0.20 * 1 + 0.15 * 0
        assert!((weights.get(Subject::Physics).unwrap() - 0.60).abs() < 1e-12);
    }

    #[test]
    fn test_weight_vector_lookup() {
        let weights: WeightVector = vec![(Subject::Chinese, 0.5), (Subject::Biology, 1.5)]
            .into_iter()
            .collect();
        assert_eq!(weights.get(Subject::Biology), Some(1.5));
        assert_eq!(weights.get(Subject::History), None);
        assert_eq!(weights.total(), 2.0);
    }
}
