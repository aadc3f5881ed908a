//! JSON output formatting
//!
//! Serializes a `Report` for machine consumption. Rate figures are omitted as
//! `null` when the run produced no data.

use super::Report;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write the report as pretty-printed JSON
pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON output: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;
    Ok(())
}

/// Render the report as a JSON string
pub fn to_json_string(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
