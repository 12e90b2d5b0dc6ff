//! Weighting and allocation algorithms.
//!
//! This module turns a class group's scores into extra weekly hours per
//! weighted subject.
//!
//! # Components
//!
//! - [`normalization`]: Rescaling of primary-subject scores to the 0-100 scale
//! - [`statistics`]: Mean, spread, skewness, failure rate, Pearson correlation
//! - [`weights`]: Need weights from min-max scaled subject statistics
//! - [`correlation`]: Correlation matrix and the top-K weight adjustment
//! - [`allocation`]: Proportional integer split of the leftover hour pool
//!
//! # Example
//!
//! ```no_run
//! use class_hours::algorithms::{
//!     CorrelationAdjuster, CorrelationMatrix, HourAllocator, Normalizer, SubjectStatistics,
//!     SubjectWeightEstimator,
//! };
//! use class_hours::core::domain::{ClassGroup, Subject};
//!
//! # fn example(group: &ClassGroup) -> class_hours::Result<()> {
//! let scores = Normalizer::default().normalize(group)?;
//! let stats: Vec<_> = Subject::WEIGHTED
//!     .iter()
//!     .map(|&s| (s, SubjectStatistics::from_scores(scores.column(s), 60.0)))
//!     .collect();
//! let base = SubjectWeightEstimator::default().estimate(&stats);
//! let adjusted = CorrelationAdjuster::default().adjust(&CorrelationMatrix::pearson(&scores), &base);
//! let allocation = HourAllocator::default().allocate(&adjusted, 6)?;
//! println!("Math gets {} extra hours", allocation.get(Subject::Math));
//! # Ok(())
//! # }
//! ```

pub mod allocation;
pub mod correlation;
pub mod normalization;
pub mod statistics;
pub mod weights;

pub use allocation::{HourAllocation, HourAllocator};
pub use correlation::{CorrelationAdjuster, CorrelationMatrix};
pub use normalization::{NormalizedScores, Normalizer};
pub use statistics::SubjectStatistics;
pub use weights::{ScaledMetrics, SubjectWeightEstimator, WeightVector};
