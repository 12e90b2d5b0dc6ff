//! Command-line front end: `class-hours <scores.csv|scores.json> [curriculum.toml]`
//!
//! Environment:
//! - `RUST_LOG`: log level (default `info`), logs go to stderr
//! - `CLASS_HOURS_FORMAT`: `text` (default) or `json`

use anyhow::{Context, Result};
use std::env;
use std::path::Path;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use class_hours::config::CurriculumConfig;
use class_hours::plan_schedule_file;

fn load_config(path: Option<&str>) -> Result<CurriculumConfig> {
    if let Some(path) = path {
        return CurriculumConfig::from_file(path)
            .with_context(|| format!("Failed to load curriculum from {}", path));
    }

    let found = CurriculumConfig::from_default_location()
        .context("Failed to load curriculum.toml from the default location")?;
    match found {
        Some(config) => Ok(config),
        None => {
            info!("No curriculum.toml found; using built-in curriculum");
            Ok(CurriculumConfig::default())
        }
    }
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(scores_path) = args.get(1) else {
        anyhow::bail!("Usage: class-hours <scores.csv|scores.json> [curriculum.toml]");
    };
    let config = load_config(args.get(2).map(String::as_str))?;

    let report = plan_schedule_file(Path::new(scores_path), config)?;
    if report.dropped_records > 0 {
        warn!("{} incomplete records were excluded", report.dropped_records);
    }

    let format = env::var("CLASS_HOURS_FORMAT").unwrap_or_else(|_| "text".to_string());
    match format.to_lowercase().as_str() {
        "json" => println!("{}", report.to_json()?),
        "text" => print!("{}", report.render_text()),
        other => anyhow::bail!("Unknown CLASS_HOURS_FORMAT: {}", other),
    }

    Ok(())
}
