//! Run reports.
//!
//! Renders a [`RunSummary`] either as a colored, human-readable table or as a
//! JSON document for scripting.

use crate::stats::RunSummary;
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Converts a byte count to mebibytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Formats a byte count as megabytes with one decimal place.
///
/// ```
/// use filesorter::report::format_mb;
///
/// assert_eq!(format_mb(0), "0.0 MB");
/// assert_eq!(format_mb(1_572_864), "1.5 MB");
/// ```
pub fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes_to_mb(bytes))
}

/// Writes the human-readable report for one run.
pub fn write_report<W: Write>(
    out: &mut W,
    source_dir: &Path,
    summary: &RunSummary,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=== File organization report ===".bold())?;
    writeln!(out, "Source directory: {}", source_dir.display())?;
    writeln!(
        out,
        "Files processed: {}",
        summary.processed_files().to_string().green()
    )?;
    writeln!(out, "Total size: {}", format_mb(summary.total_size()))?;

    if summary.is_empty() {
        writeln!(out, "{}", "No files were moved.".yellow())?;
        return Ok(());
    }

    let width = summary
        .categories()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    writeln!(out)?;
    writeln!(
        out,
        "{:<width$} | {:>6} | {:>10}",
        "Category".bold(),
        "Files".bold(),
        "Size".bold(),
        width = width
    )?;
    writeln!(out, "{}", "-".repeat(width + 22))?;
    for (name, stats) in summary.categories() {
        writeln!(
            out,
            "{:<width$} | {:>6} | {:>10}",
            name,
            stats.count,
            format_mb(stats.total_size),
            width = width
        )?;
    }
    Ok(())
}

/// Machine-readable form of a run report.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub source_dir: PathBuf,
    pub processed_files: u64,
    pub total_size: u64,
    pub total_size_mb: f64,
    pub categories: Vec<JsonCategory<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory<'a> {
    pub name: &'a str,
    pub count: u64,
    pub total_size: u64,
}

impl<'a> JsonReport<'a> {
    pub fn new(source_dir: &Path, summary: &'a RunSummary) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            processed_files: summary.processed_files(),
            total_size: summary.total_size(),
            total_size_mb: bytes_to_mb(summary.total_size()),
            categories: summary
                .categories()
                .map(|(name, stats)| JsonCategory {
                    name,
                    count: stats.count,
                    total_size: stats.total_size,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
