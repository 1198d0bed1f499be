//! Run summary
//!
//! Writes a JSON description of a finished run next to the generated file.
//! The declarations themselves never carry a timestamp, so they stay stable
//! across runs; only the summary changes.

use anyhow::{Context, Result};
use can_codegen::{GenerationReport, IdentifierCollision, IdentifierMode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub mode: IdentifierMode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub identifiers: Vec<String>,
    pub collisions: Vec<IdentifierCollision>,
}

impl RunSummary {
    pub fn new(
        mode: IdentifierMode,
        input: &Path,
        output: &Path,
        report: GenerationReport,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            mode,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            rows: report.rows,
            identifiers: report.identifiers,
            collisions: report.collisions,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary")
    }
}

/// Write the summary as pretty-printed JSON
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = summary.to_json()?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write run summary: {:?}", path))?;
    log::info!("Run summary written to {:?}", path);
    Ok(())
}
