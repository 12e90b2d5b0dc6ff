use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::{PerSubject, ScoreTable, StudentRecord, Subject};
use crate::error::Error;

/// Header of the class-id column.
pub const CLASS_COLUMN: &str = "class";

/// Parse a score CSV file into a Polars DataFrame
pub fn parse_scores_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .context("Failed to parse CSV into DataFrame")?;
    Ok(df)
}

/// Parse in-memory CSV bytes into a Polars DataFrame
pub fn parse_scores_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .context("Failed to parse CSV into DataFrame")?;
    Ok(df)
}

/// Parse a score CSV file straight into a [`ScoreTable`]
pub fn parse_scores_csv_to_table(csv_path: &Path) -> Result<ScoreTable> {
    let df = parse_scores_csv(csv_path)?;
    dataframe_to_table(&df)
}

/// Column lookup tolerant of surrounding whitespace and letter case in headers.
fn find_column<'a>(df: &'a DataFrame, key: &str) -> Option<&'a Column> {
    df.get_columns()
        .iter()
        .find(|c| c.name().as_str().trim().eq_ignore_ascii_case(key))
}

/// Convert a score DataFrame into a [`ScoreTable`].
///
/// Score columns are cast to Float64; blank, unparsable, and non-finite
/// cells become `None`. The class column is cast to String, so integer
/// class ids survive type inference.
pub fn dataframe_to_table(df: &DataFrame) -> Result<ScoreTable> {
    let class_column = find_column(df, CLASS_COLUMN)
        .ok_or_else(|| Error::MissingColumn(CLASS_COLUMN.to_string()))?;
    let class_ids = class_column.cast(&DataType::String)?;
    let class_ids = class_ids.str()?;

    let columns = PerSubject::try_from_fn(|subject| -> Result<Vec<Option<f64>>> {
        let column = find_column(df, subject.key())
            .ok_or_else(|| Error::MissingColumn(subject.key().to_string()))?;
        let values = column.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect())
    })?;

    let mut records = Vec::with_capacity(df.height());
    for (row, class_id) in class_ids.into_iter().enumerate() {
        let class_id = class_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .with_context(|| format!("Missing class id at row {}", row + 1))?;

        records.push(StudentRecord {
            class_id: class_id.to_string(),
            scores: PerSubject::from_fn(|s: Subject| columns.get(s).get(row).copied().flatten()),
        });
    }

    Ok(ScoreTable::new(records))
}
