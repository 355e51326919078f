//! Query interface consumed by the dashboard.
//!
//! Given an already-loaded [`ConsolidatedTable`], builds the date series and
//! before/after comparison for one region selection. The table is passed in
//! explicitly so one load can serve many queries.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use sales_core::error::Result;
use sales_core::formatting::title_case;
use sales_core::models::{ConsolidatedTable, DailyAggregate, PeriodSummary, RegionFilter};
use serde::Serialize;

use crate::aggregator::SalesAggregator;
use crate::writer::load_table;

/// Summary text shown when there is no table to report on.
pub const NO_DATA_TEXT: &str = "No data";

// ── Public types ──────────────────────────────────────────────────────────────

/// One entry of the region selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    /// Display label (title-cased).
    pub label: String,
    /// Exact region value to filter on.
    pub value: String,
}

/// Whether the report had any data behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The table has rows; the report may still be empty for the selected
    /// region.
    Ready,
    /// The consolidated table is missing or empty.
    NoData,
}

/// Everything the dashboard renders for one region selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub status: ReportStatus,
    pub filter: RegionFilter,
    /// Daily totals, ascending by date.
    pub series: Vec<DailyAggregate>,
    pub summary: PeriodSummary,
    pub summary_text: String,
    /// Selected records left off the series for lack of a calendar date.
    pub undated_records: usize,
}

impl SalesReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Distinct non-empty regions in `table`, sorted by value.
pub fn region_options(table: &ConsolidatedTable) -> Vec<RegionOption> {
    let regions: BTreeSet<&str> = table
        .iter()
        .map(|r| r.region.as_str())
        .filter(|r| !r.trim().is_empty())
        .collect();

    regions
        .into_iter()
        .map(|value| RegionOption {
            label: title_case(value),
            value: value.to_string(),
        })
        .collect()
}

/// Build the report for `filter` against `reference_date`.
///
/// An empty table yields [`ReportStatus::NoData`]; a region with no rows
/// yields a `Ready` report with zero totals.
pub fn build_report(
    table: &ConsolidatedTable,
    filter: &RegionFilter,
    reference_date: NaiveDate,
) -> SalesReport {
    if table.is_empty() {
        return SalesReport {
            status: ReportStatus::NoData,
            filter: filter.clone(),
            series: Vec::new(),
            summary: PeriodSummary::new(reference_date, 0.0, 0.0),
            summary_text: NO_DATA_TEXT.to_string(),
            undated_records: 0,
        };
    }

    let view = SalesAggregator::filter_by_region(table, filter);
    let undated_records = view.iter().filter(|r| r.date.calendar().is_none()).count();
    let series = SalesAggregator::aggregate_by_date(view);
    let summary = SalesAggregator::summarize(&series, reference_date);

    SalesReport {
        status: ReportStatus::Ready,
        filter: filter.clone(),
        series,
        summary_text: summary.describe(),
        summary,
        undated_records,
    }
}

/// Load the consolidated table at `path`; a missing file reads as empty.
pub fn load_or_empty(path: &Path) -> Result<ConsolidatedTable> {
    Ok(load_table(path)?.unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::models::{SaleDate, SaleRecord, Trend};
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_table() -> ConsolidatedTable {
        ConsolidatedTable::from_records(vec![
            SaleRecord::new(6.0, ymd(2021, 1, 10), "north"),
            SaleRecord::new(14.0, ymd(2021, 1, 20), "south"),
        ])
    }

    // ── region_options ────────────────────────────────────────────────────────

    #[test]
    fn test_region_options_sorted_and_labelled() {
        let table = ConsolidatedTable::from_records(vec![
            SaleRecord::new(1.0, ymd(2021, 1, 1), "south"),
            SaleRecord::new(1.0, ymd(2021, 1, 1), "north"),
            SaleRecord::new(1.0, ymd(2021, 1, 2), "south"),
            SaleRecord::new(1.0, ymd(2021, 1, 2), ""),
        ]);

        let options = region_options(&table);
        assert_eq!(
            options,
            vec![
                RegionOption {
                    label: "North".into(),
                    value: "north".into()
                },
                RegionOption {
                    label: "South".into(),
                    value: "south".into()
                },
            ]
        );
    }

    #[test]
    fn test_region_options_empty_table() {
        assert!(region_options(&ConsolidatedTable::new()).is_empty());
    }

    // ── build_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_report_all_regions() {
        let report = build_report(&scenario_table(), &RegionFilter::All, ymd(2021, 1, 15));

        assert_eq!(report.status, ReportStatus::Ready);
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.summary.trend, Trend::After);
        assert_eq!(
            report.summary_text,
            "Total sales before 2021-01-15: $6.00 — after: $14.00. Higher after."
        );
    }

    #[test]
    fn test_build_report_empty_region_is_ready_with_zeroes() {
        let filter = RegionFilter::Region("east".into());
        let report = build_report(&scenario_table(), &filter, ymd(2021, 1, 15));

        assert_eq!(report.status, ReportStatus::Ready);
        assert!(report.series.is_empty());
        assert_eq!(
            report.summary_text,
            "Total sales before 2021-01-15: $0.00 — after: $0.00. Higher about the same."
        );
    }

    #[test]
    fn test_build_report_empty_table_is_no_data() {
        let report = build_report(&ConsolidatedTable::new(), &RegionFilter::All, ymd(2021, 1, 15));
        assert_eq!(report.status, ReportStatus::NoData);
        assert_eq!(report.summary_text, NO_DATA_TEXT);
        assert_eq!(report.summary.trend, Trend::AboutTheSame);
    }

    #[test]
    fn test_build_report_counts_undated_records() {
        let table = ConsolidatedTable::from_records(vec![
            SaleRecord::new(6.0, ymd(2021, 1, 10), "north"),
            SaleRecord::new(9.0, SaleDate::Unparseable, "north"),
            SaleRecord::new(9.0, SaleDate::Unparseable, "south"),
        ]);
        let filter = RegionFilter::Region("north".into());
        let report = build_report(&table, &filter, ymd(2021, 1, 15));

        assert_eq!(report.undated_records, 1);
        assert!((report.summary.total() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_to_json() {
        let report = build_report(&scenario_table(), &RegionFilter::All, ymd(2021, 1, 15));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["status"], "ready");
        assert_eq!(json["filter"]["kind"], "all");
        assert_eq!(json["series"][0]["date"], "2021-01-10");
        assert_eq!(json["summary"]["trend"], "after");
    }

    // ── load_or_empty ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_or_empty_missing_file() {
        let dir = TempDir::new().unwrap();
        let table = load_or_empty(&dir.path().join("absent.csv")).unwrap();
        assert!(table.is_empty());
        let report = build_report(&table, &RegionFilter::All, ymd(2021, 1, 15));
        assert_eq!(report.status, ReportStatus::NoData);
    }
}
