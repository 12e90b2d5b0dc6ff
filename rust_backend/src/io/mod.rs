//! High-level score loading.
//!
//! Loaders read a score sheet, hand it to the matching parser, and return
//! the resulting [`ScoreTable`](crate::core::domain::ScoreTable) together
//! with the source format and a checksum of the raw input.
//!
//! # Example
//!
//! ```no_run
//! use class_hours::io::loaders::ScoreLoader;
//! use std::path::Path;
//!
//! let result = ScoreLoader::load_from_file(Path::new("scores.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} records", result.num_records);
//! ```

pub mod checksum;
pub mod loaders;


pub use checksum::calculate_checksum;
pub use loaders::{ScoreLoadResult, ScoreLoader, ScoreSourceType};
