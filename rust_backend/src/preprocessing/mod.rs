//! Checks applied to a loaded score table before planning.

pub mod validator;

pub use validator::{ScoreValidator, ValidationResult, ValidationStats};
