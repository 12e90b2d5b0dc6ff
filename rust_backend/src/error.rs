//! Error types for the class-hours planner

use thiserror::Error;

use crate::core::domain::Subject;

/// Result type for planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading scores or building a schedule
#[derive(Error, Debug)]
pub enum Error {
    /// A class group lacks a score for a subject every statistic depends on
    #[error("Class '{class_id}' is missing scores for subject '{}'", .subject.key())]
    MissingSubjectData { class_id: String, subject: Subject },

    /// A required column is absent from the whole input
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A weight handed to the allocator is negative or not finite
    #[error("Invalid weight {value} for subject '{}'", .subject.key())]
    InvalidWeight { subject: Subject, value: f64 },

    /// Balancing would leave a subject with a negative hour count
    #[error("Balancing drives '{name}' to {hours} hours")]
    NegativeHours { name: String, hours: i32 },

    /// Input table failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be read, parsed, or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
