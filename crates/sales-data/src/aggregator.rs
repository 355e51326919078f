//! Region filtering, per-date totals and the before/after split.
//!
//! Every operation is a pure function of the table it is handed.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sales_core::models::{ConsolidatedTable, DailyAggregate, PeriodSummary, RegionFilter, SaleRecord};

/// Stateless helper that groups sale records by date.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Records of `table` that pass `filter`, in table order.
    ///
    /// An empty result is valid.
    pub fn filter_by_region<'a>(
        table: &'a ConsolidatedTable,
        filter: &RegionFilter,
    ) -> Vec<&'a SaleRecord> {
        table.iter().filter(|r| filter.matches(&r.region)).collect()
    }

    /// Sum `amount` per calendar date, ascending by date.
    ///
    /// Records with an unparseable date have no place on the calendar and are
    /// left out; see [`SalesAggregator::undated_total`].
    pub fn aggregate_by_date<'a, I>(records: I) -> Vec<DailyAggregate>
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        // BTreeMap keeps the dates ordered.
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            if let Some(date) = record.date.calendar() {
                *by_date.entry(date).or_insert(0.0) += record.amount;
            }
        }

        by_date
            .into_iter()
            .map(|(date, total)| DailyAggregate { date, total })
            .collect()
    }

    /// Split the daily totals at `reference_date`. Dates strictly before it
    /// count as "before"; the reference date and later count as "after".
    pub fn summarize(aggregates: &[DailyAggregate], reference_date: NaiveDate) -> PeriodSummary {
        let (before, after) = aggregates
            .iter()
            .fold((0.0, 0.0), |(before, after), day| {
                if day.date < reference_date {
                    (before + day.total, after)
                } else {
                    (before, after + day.total)
                }
            });
        PeriodSummary::new(reference_date, before, after)
    }

    /// Sum of all daily totals.
    pub fn calculate_total(aggregates: &[DailyAggregate]) -> f64 {
        aggregates.iter().map(|d| d.total).sum()
    }

    /// Sum of `amount` over records without a calendar date.
    pub fn undated_total<'a, I>(records: I) -> f64
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        records
            .into_iter()
            .filter(|r| r.date.calendar().is_none())
            .map(|r| r.amount)
            .sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
