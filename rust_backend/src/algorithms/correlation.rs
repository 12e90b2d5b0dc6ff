//! Cross-subject correlation and the weight adjustment built on it.

use serde::{Deserialize, Serialize};

use super::normalization::NormalizedScores;
use super::statistics::pearson_correlation;
use super::weights::WeightVector;
use crate::config::CorrelationSettings;
use crate::core::domain::Subject;

const N: usize = Subject::ALL.len();

/// Symmetric Pearson matrix over the nine subjects of one class group.
///
/// Off-diagonal entries are `None` where the coefficient is undefined (a
/// column without variance). The diagonal is always 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    values: [[Option<f64>; N]; N],
}

impl CorrelationMatrix {
    /// Build a matrix from a pairwise function, evaluated once per unordered
    /// pair and mirrored.
    pub fn from_fn(mut f: impl FnMut(Subject, Subject) -> Option<f64>) -> Self {
        let mut values = [[None; N]; N];
        for (i, &a) in Subject::ALL.iter().enumerate() {
            values[i][i] = Some(1.0);
            for (j, &b) in Subject::ALL.iter().enumerate().skip(i + 1) {
                let r = f(a, b);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self { values }
    }

    /// Pearson correlations of the normalized score columns.
    pub fn pearson(scores: &NormalizedScores) -> Self {
        Self::from_fn(|a, b| pearson_correlation(scores.column(a), scores.column(b)))
    }

    pub fn get(&self, a: Subject, b: Subject) -> Option<f64> {
        self.values[a.index()][b.index()]
    }

    /// Defined correlations of `subject` against every other subject.
    pub fn peers(&self, subject: Subject) -> Vec<(Subject, f64)> {
        Subject::ALL
            .iter()
            .filter(|&&other| other != subject)
            .filter_map(|&other| self.get(subject, other).map(|r| (other, r)))
            .collect()
    }
}

/// Scales base weights by how strongly each subject tracks its closest peers.
///
/// For a subject, the `top_k` largest signed correlations against the other
/// subjects are averaged and damped; the base weight is multiplied by
/// `1 + damping * average`. Strong negative correlations never count as
/// "related".
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationAdjuster {
    top_k: usize,
    damping: f64,
}

impl CorrelationAdjuster {
    pub fn new(settings: &CorrelationSettings) -> Self {
        Self {
            top_k: settings.top_k,
            damping: settings.damping,
        }
    }

    /// Damped mean of the `top_k` largest values in `peers`.
    ///
    /// Uses every value when fewer than `top_k` exist; 0 when none do.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_hours::algorithms::correlation::CorrelationAdjuster;
    /// use class_hours::config::CorrelationSettings;
    ///
    /// let adjuster = CorrelationAdjuster::new(&CorrelationSettings::default());
    /// let impact = adjuster.related_impact(&[-0.9, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.05]);
    /// assert!((impact - 0.3 * 0.5).abs() < 1e-12);
    /// ```
    pub fn related_impact(&self, peers: &[f64]) -> f64 {
        let mut sorted: Vec<f64> = peers.iter().copied().filter(|r| r.is_finite()).collect();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted.truncate(self.top_k);

        if sorted.is_empty() {
            return 0.0;
        }
        let average = sorted.iter().sum::<f64>() / sorted.len() as f64;
        average * self.damping
    }

    /// Adjusted weight of one subject.
    pub fn adjust_weight(&self, matrix: &CorrelationMatrix, subject: Subject, base: f64) -> f64 {
        let peers: Vec<f64> = matrix.peers(subject).into_iter().map(|(_, r)| r).collect();
        base * (1.0 + self.related_impact(&peers))
    }

    /// Adjust every weight of `base`, keeping its subject order.
    pub fn adjust(&self, matrix: &CorrelationMatrix, base: &WeightVector) -> WeightVector {
        base.iter()
            .map(|(subject, w)| (subject, self.adjust_weight(matrix, subject, w)))
            .collect()
    }
}

impl Default for CorrelationAdjuster {
    fn default() -> Self {
        Self::new(&CorrelationSettings::default())
    }
}
