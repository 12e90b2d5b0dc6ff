//! Schedule assembly and the per-class planning pipeline.
//!
//! - [`assembler`]: Baseline + allocation merge and the balancing step
//! - [`pipeline`]: [`SchedulePlanner`], which runs every stage per class group
//! - [`report`]: Per-class diagnostics and text/JSON rendering

pub mod assembler;
pub mod pipeline;
pub mod report;

pub use assembler::{AssembledSchedule, BalanceAdjustment, FinalSchedule, ScheduleAssembler, ScheduleEntry};
pub use pipeline::{plan_schedule_file, SchedulePlanner};
pub use report::{ClassReport, ScheduleReport, SubjectReport};
