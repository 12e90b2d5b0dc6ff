//! Class-hour planning from student score sheets.
//!
//! Given each student's scores in nine senior-high subjects, the planner
//! works out, class by class, where a class is weakest and distributes the
//! weekly hours left over after the baseline timetable accordingly. The
//! result is a schedule that always sums to the configured budget.
//!
//! The pipeline stages live in their own modules:
//!
//! - [`io`] / [`parsing`]: CSV and JSON score sheets into a [`ScoreTable`](core::ScoreTable)
//! - [`preprocessing`]: sanity checks before planning
//! - [`algorithms`]: normalization, statistics, weights, correlation, allocation
//! - [`scheduler`]: baseline merge, balancing, and reporting
//! - [`config`]: every tunable constant, loadable from `curriculum.toml`

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod scheduler;

pub use config::CurriculumConfig;
pub use error::{Error, Result};
pub use scheduler::{plan_schedule_file, SchedulePlanner, ScheduleReport};
