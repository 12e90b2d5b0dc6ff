use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

use crate::core::domain::{PerSubject, ScoreTable, StudentRecord, Subject};
use crate::error::Error;

type RawRow = Map<String, Value>;

/// Parse a score JSON file into a [`ScoreTable`]
pub fn parse_scores_json(json_path: &Path) -> Result<ScoreTable> {
    let content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;
    parse_scores_json_str(&content)
}

/// Parse a score JSON string into a [`ScoreTable`].
///
/// Accepts either a bare array of row objects or an object holding the array
/// under `"students"`. Each row needs `class` (string or integer) and one key
/// per subject; `null`, blank, and non-numeric values are kept as missing
/// scores. A subject key absent from every row is a missing column.
pub fn parse_scores_json_str(json_str: &str) -> Result<ScoreTable> {
    let document: Value = serde_json::from_str(json_str).context("Failed to parse JSON")?;
    let rows = extract_rows(document)?;

    for subject in Subject::ALL {
        if !rows.is_empty() && !rows.iter().any(|row| row.contains_key(subject.key())) {
            return Err(Error::MissingColumn(subject.key().to_string()).into());
        }
    }

    let records = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).with_context(|| format!("Invalid record at index {}", i)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ScoreTable::new(records))
}

fn extract_rows(document: Value) -> Result<Vec<RawRow>> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("students") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("Expected an array of records or a \"students\" array"),
        },
        _ => anyhow::bail!("Expected an array of records or a \"students\" array"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(row) => Ok(row),
            other => anyhow::bail!("Record at index {} is not an object: {}", i, other),
        })
        .collect()
}

fn parse_row(row: &RawRow) -> Result<StudentRecord> {
    let class_id = match row.get("class") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(Error::MissingColumn("class".to_string()).into()),
    };

    Ok(StudentRecord {
        class_id,
        scores: PerSubject::from_fn(|s| row.get(s.key()).and_then(score_value)),
    })
}

fn score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|v| v.is_finite())
}
