//! Descriptive statistics over score columns.
//!
//! Conventions follow the usual spreadsheet/dataframe defaults: the standard
//! deviation uses the `n - 1` denominator, skewness is the adjusted
//! Fisher-Pearson coefficient, and correlation is Pearson's r.

use serde::{Deserialize, Serialize};

/// Distribution summary of one subject within one class group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectStatistics {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    /// Fraction of scores strictly below the failure threshold.
    pub failure_rate: f64,
}

impl SubjectStatistics {
    /// Compute all four metrics for a score column.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_hours::algorithms::statistics::SubjectStatistics;
    ///
    /// let stats = SubjectStatistics::from_scores(&[50.0, 70.0, 90.0], 60.0);
    /// assert_eq!(stats.mean, 70.0);
    /// assert_eq!(stats.std_dev, 20.0);
    /// assert_eq!(stats.skewness, 0.0);
    /// assert!((stats.failure_rate - 1.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn from_scores(values: &[f64], failure_threshold: f64) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            std_dev: sample_std_dev(values),
            skewness: skewness(values),
            failure_rate: failure_rate(values, failure_threshold),
        }
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (`n - 1` denominator); 0 when fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    if negligible_spread(sum_sq, m, n as f64) {
        return 0.0;
    }
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Adjusted Fisher-Pearson skewness `G1 = sqrt(n(n-1)) / (n-2) * m3 / m2^1.5`.
///
/// Returns 0 when fewer than three values are given or every value is equal.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let m = mean(values);
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(s2, s3), v| {
        let d = v - m;
        (s2 + d * d, s3 + d * d * d)
    });
    if negligible_spread(m2, m, nf) {
        return 0.0;
    }
    let m2 = m2 / nf;
    let m3 = m3 / nf;
    let g1 = m3 / m2.powf(1.5);
    (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1
}

/// Sum of squared deviations indistinguishable from rounding noise.
///
/// A constant column whose mean is not exactly representable still leaves
/// ulp-sized deviations behind.
fn negligible_spread(sum_sq: f64, mean: f64, n: f64) -> bool {
    sum_sq <= f64::EPSILON * n * mean.abs().max(1.0).powi(2)
}

/// Fraction of values strictly below `threshold`; 0 for an empty slice.
pub fn failure_rate(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let failing = values.iter().filter(|&&v| v < threshold).count();
    failing as f64 / values.len() as f64
}

/// Pearson correlation coefficient of two equally long columns.
///
/// Returns `None` when the columns differ in length, hold fewer than two
/// values, or either has zero variance; the coefficient is undefined there.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let n = x.len() as f64;
    if negligible_spread(sum_sq_x, mean_x, n) || negligible_spread(sum_sq_y, mean_y, n) {
        return None;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    Some((numerator / denominator).clamp(-1.0, 1.0))
}
