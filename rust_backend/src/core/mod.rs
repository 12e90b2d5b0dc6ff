//! Core domain models for score-driven class-hour planning.
//!
//! This module defines the data structures shared by every stage of the
//! planner: subjects and their curriculum groups, student score records,
//! and the per-class partition of a score table.

pub mod domain;

pub use domain::{ClassGroup, PerSubject, ScoreTable, StudentRecord, Subject, SubjectGroup};
