//! Parsers for student score sheets.
//!
//! - [`csv_parser`]: CSV exports read through Polars
//! - [`json_parser`]: JSON arrays of score rows
//!
//! # Example
//!
//! ```no_run
//! use class_hours::parsing::csv_parser::parse_scores_csv_to_table;
//! use std::path::Path;
//!
//! let table = parse_scores_csv_to_table(Path::new("scores.csv"))
//!     .expect("Failed to parse scores");
//! println!("{} records", table.len());
//! ```

pub mod csv_parser;
pub mod json_parser;

#[cfg(test)]
mod json_parser_tests;
