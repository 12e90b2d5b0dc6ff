use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use super::checksum::calculate_checksum;
use crate::core::domain::ScoreTable;
use crate::parsing::csv_parser;
use crate::parsing::json_parser;

/// Represents the source type of score data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSourceType {
    Csv,
    Json,
}

/// Result of loading score data
#[derive(Debug, Clone)]
pub struct ScoreLoadResult {
    pub table: ScoreTable,
    pub source_type: ScoreSourceType,
    /// SHA-256 of the raw input bytes.
    pub checksum: String,
    pub num_records: usize,
}

impl ScoreLoadResult {
    pub fn new(table: ScoreTable, source_type: ScoreSourceType, checksum: String) -> Self {
        let num_records = table.len();
        Self {
            table,
            source_type,
            checksum,
            num_records,
        }
    }
}

/// Unified interface for loading score sheets from CSV or JSON
pub struct ScoreLoader;

impl ScoreLoader {
    /// Load scores from a file (dispatches on the extension)
    pub fn load_from_file(path: &Path) -> Result<ScoreLoadResult> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        let result = match extension.to_lowercase().as_str() {
            "csv" => Self::load_from_csv(path),
            "json" => Self::load_from_json(path),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }?;

        info!(
            "Loaded {} records from {} (sha256 {})",
            result.num_records,
            path.display(),
            result.checksum
        );
        Ok(result)
    }

    /// Load scores from a CSV file
    pub fn load_from_csv(csv_path: &Path) -> Result<ScoreLoadResult> {
        let bytes = std::fs::read(csv_path)
            .with_context(|| format!("Failed to read CSV file: {}", csv_path.display()))?;
        Self::load_from_csv_bytes(&bytes)
    }

    /// Load scores from in-memory CSV content
    pub fn load_from_csv_bytes(bytes: &[u8]) -> Result<ScoreLoadResult> {
        let df = csv_parser::parse_scores_csv_bytes(bytes).context("Failed to parse CSV file")?;
        debug!("CSV frame: {} rows, columns {:?}", df.height(), df.get_column_names());

        let table = csv_parser::dataframe_to_table(&df)?;
        Ok(ScoreLoadResult::new(
            table,
            ScoreSourceType::Csv,
            calculate_checksum(bytes),
        ))
    }

    /// Load scores from a JSON file
    pub fn load_from_json(json_path: &Path) -> Result<ScoreLoadResult> {
        let content = std::fs::read_to_string(json_path)
            .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;
        Self::load_from_json_str(&content)
    }

    /// Load scores from a JSON string
    pub fn load_from_json_str(json_str: &str) -> Result<ScoreLoadResult> {
        let table = json_parser::parse_scores_json_str(json_str)?;
        Ok(ScoreLoadResult::new(
            table,
            ScoreSourceType::Json,
            calculate_checksum(json_str.as_bytes()),
        ))
    }
}
