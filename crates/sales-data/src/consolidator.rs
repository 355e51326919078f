//! Consolidation of the daily sales files into one table.
//!
//! Files are processed independently and merged in path order. A file with
//! missing columns, or one that cannot be read, is skipped with a warning;
//! rows whose price or quantity do not parse are dropped and only counted.

use std::path::{Path, PathBuf};

use sales_core::error::{Result, SalesError};
use sales_core::models::{ConsolidatedTable, SaleDate, SaleRecord};
use sales_core::settings::PipelineConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::reader::{find_sales_files, read_sales_file, ExtractedSale};
use crate::writer::write_table;

// ── Public types ──────────────────────────────────────────────────────────────

/// A file left out of the run and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Counters describing one consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidationReport {
    /// Input files handed to the run.
    pub files_discovered: usize,
    /// Files whose header passed validation.
    pub files_read: usize,
    /// Files left out entirely.
    pub skipped_files: Vec<SkippedFile>,
    /// Data rows read across all accepted files.
    pub rows_read: usize,
    /// Rows whose product matched the target.
    pub rows_matched: usize,
    /// Matched rows dropped because price or quantity did not parse.
    pub rows_dropped: usize,
    /// Records in the resulting table.
    pub rows_emitted: usize,
    /// Emitted records whose date could not be normalised.
    pub unparseable_dates: usize,
}

/// Why a run produced no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// Nothing matched the discovery pattern.
    NoInputFiles,
    /// Files were found, but none contributed a row for the product (all
    /// skipped, empty, or about other products).
    NoMatchingRows,
}

impl std::fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataReason::NoInputFiles => f.write_str("no input files found"),
            NoDataReason::NoMatchingRows => f.write_str("no matching product rows in input files"),
        }
    }
}

/// Result of a run: either a table (possibly empty after numeric filtering)
/// or an explicit "no data" signal.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsolidationOutcome {
    Table(ConsolidatedTable),
    NoData(NoDataReason),
}

/// Outcome plus the run's counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Consolidation {
    pub outcome: ConsolidationOutcome,
    pub report: ConsolidationReport,
}

impl Consolidation {
    pub fn is_no_data(&self) -> bool {
        matches!(self.outcome, ConsolidationOutcome::NoData(_))
    }

    /// The table, if the run produced one.
    pub fn table(&self) -> Option<&ConsolidatedTable> {
        match &self.outcome {
            ConsolidationOutcome::Table(table) => Some(table),
            ConsolidationOutcome::NoData(_) => None,
        }
    }

    /// The table for downstream use; "no data" becomes an empty table.
    pub fn into_table(self) -> ConsolidatedTable {
        match self.outcome {
            ConsolidationOutcome::Table(table) => table,
            ConsolidationOutcome::NoData(_) => ConsolidatedTable::new(),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Consolidate the given files for `product` (trimmed, lowercased).
///
/// Files are processed in path order regardless of the order given, so the
/// output is identical for identical inputs.
pub fn consolidate_files(files: &[PathBuf], product: &str) -> Consolidation {
    let mut files: Vec<&PathBuf> = files.iter().collect();
    files.sort();

    let mut report = ConsolidationReport {
        files_discovered: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        return Consolidation {
            outcome: ConsolidationOutcome::NoData(NoDataReason::NoInputFiles),
            report,
        };
    }

    let mut merged: Vec<ExtractedSale> = Vec::new();
    let mut contributing_files = 0usize;

    for path in files {
        match read_sales_file(path, product) {
            Ok(extract) => {
                report.files_read += 1;
                report.rows_read += extract.stats.rows_read;
                report.rows_matched += extract.stats.rows_matched;
                report.rows_dropped += extract.stats.rows_dropped;
                if extract.stats.rows_matched > 0 {
                    contributing_files += 1;
                }
                merged.extend(extract.sales);
            }
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                report.skipped_files.push(SkippedFile {
                    path: path.clone(),
                    reason: skip_reason(&err),
                });
            }
        }
    }

    if contributing_files == 0 {
        return Consolidation {
            outcome: ConsolidationOutcome::NoData(NoDataReason::NoMatchingRows),
            report,
        };
    }

    let records: Vec<SaleRecord> = merged
        .into_iter()
        .map(|sale| SaleRecord::new(sale.amount, SaleDate::parse(&sale.raw_date), sale.region))
        .collect();
    let table = ConsolidatedTable::from_records(records);

    report.rows_emitted = table.len();
    report.unparseable_dates = table.unparseable_dates();

    debug!(
        "Consolidated {} rows from {} files ({} dropped, {} undated)",
        report.rows_emitted, report.files_read, report.rows_dropped, report.unparseable_dates,
    );

    Consolidation {
        outcome: ConsolidationOutcome::Table(table),
        report,
    }
}

/// Discover the input files described by `config` and consolidate them.
pub fn consolidate(config: &PipelineConfig) -> Result<Consolidation> {
    let files = find_sales_files(&config.data_dir, &config.pattern)?;
    if files.is_empty() {
        warn!(
            "No files found matching {}",
            config.data_dir.join(&config.pattern).display()
        );
    }
    Ok(consolidate_files(&files, &config.product))
}

/// Consolidate and persist the table to `config.output`.
///
/// A "no data" run writes no table and removes any previous output, so
/// downstream readers see the missing file as "no data" rather than stale
/// rows.
pub fn run_consolidation(config: &PipelineConfig) -> Result<Consolidation> {
    let consolidation = consolidate(config)?;

    match &consolidation.outcome {
        ConsolidationOutcome::Table(table) => {
            write_table(&config.output, table)?;
            info!("Wrote {} rows to {}", table.len(), config.output.display());
        }
        ConsolidationOutcome::NoData(reason) => {
            info!("No data: {}", reason);
            if config.output.exists() {
                std::fs::remove_file(&config.output)?;
                info!("Removed stale output {}", config.output.display());
            }
        }
    }

    Ok(consolidation)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn skip_reason(err: &SalesError) -> String {
    match err {
        SalesError::MissingColumns { missing, .. } => {
            format!("missing columns: {}", missing.join(", "))
        }
        other => other.to_string(),
    }
}

/// Path of a skipped file relative to `base`, for display.
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
