use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::formatting::format_currency;
use crate::time_utils::parse_calendar_date;

/// Text written in place of a date that could not be normalised.
pub const UNPARSEABLE_DATE: &str = "NaT";

/// Column headers of the consolidated table, in their fixed order.
pub const CONSOLIDATED_COLUMNS: [&str; 3] = ["Sales", "Date", "Region"];

// ── SaleDate ──────────────────────────────────────────────────────────────────

/// A normalised sale date.
///
/// Dates that cannot be read keep an explicit marker rather than being
/// coerced into some plausible-looking day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SaleDate {
    /// A valid calendar date.
    Calendar(NaiveDate),
    /// The source value could not be parsed as a date.
    Unparseable,
}

impl SaleDate {
    /// Normalise a raw source value.
    pub fn parse(raw: &str) -> Self {
        match parse_calendar_date(raw) {
            Some(date) => SaleDate::Calendar(date),
            None => SaleDate::Unparseable,
        }
    }

    /// The calendar date, if one was parsed.
    pub fn calendar(&self) -> Option<NaiveDate> {
        match self {
            SaleDate::Calendar(date) => Some(*date),
            SaleDate::Unparseable => None,
        }
    }
}

impl fmt::Display for SaleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleDate::Calendar(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            SaleDate::Unparseable => f.write_str(UNPARSEABLE_DATE),
        }
    }
}

impl From<String> for SaleDate {
    fn from(raw: String) -> Self {
        SaleDate::parse(&raw)
    }
}

impl From<SaleDate> for String {
    fn from(date: SaleDate) -> Self {
        date.to_string()
    }
}

impl From<NaiveDate> for SaleDate {
    fn from(date: NaiveDate) -> Self {
        SaleDate::Calendar(date)
    }
}

// ── SaleRecord ────────────────────────────────────────────────────────────────

/// One row of the consolidated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// `price * quantity` for the source row.
    #[serde(rename = "Sales")]
    pub amount: f64,
    #[serde(rename = "Date")]
    pub date: SaleDate,
    /// Region label exactly as written in the source.
    #[serde(rename = "Region")]
    pub region: String,
}

impl SaleRecord {
    pub fn new(amount: f64, date: impl Into<SaleDate>, region: impl Into<String>) -> Self {
        Self {
            amount,
            date: date.into(),
            region: region.into(),
        }
    }
}

// ── ConsolidatedTable ─────────────────────────────────────────────────────────

/// Ordered sequence of [`SaleRecord`]s with columns `(Sales, Date, Region)`.
///
/// Rebuilt from scratch on every consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedTable {
    records: Vec<SaleRecord>,
}

impl ConsolidatedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SaleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of `amount` across every record.
    pub fn total_amount(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }

    /// Number of records whose date could not be normalised.
    pub fn unparseable_dates(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.date == SaleDate::Unparseable)
            .count()
    }
}

impl<'a> IntoIterator for &'a ConsolidatedTable {
    type Item = &'a SaleRecord;
    type IntoIter = std::slice::Iter<'a, SaleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── RegionFilter ──────────────────────────────────────────────────────────────

/// Which regions a query covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "region")]
pub enum RegionFilter {
    /// No filtering; every record is included.
    #[default]
    All,
    /// Only records whose region matches exactly (case-sensitive).
    Region(String),
}

impl RegionFilter {
    /// Build a filter from an optional selector; `None` means all regions.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some(region) => RegionFilter::Region(region.to_string()),
            None => RegionFilter::All,
        }
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Region(wanted) => wanted == region,
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str("all regions"),
            RegionFilter::Region(region) => f.write_str(region),
        }
    }
}

// ── DailyAggregate ────────────────────────────────────────────────────────────

/// Total sales for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total: f64,
}

// ── Trend ─────────────────────────────────────────────────────────────────────

/// Which side of the reference date sold more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "after")]
    After,
    #[serde(rename = "before")]
    Before,
    #[serde(rename = "about the same")]
    AboutTheSame,
}

impl Trend {
    pub fn compare(before_total: f64, after_total: f64) -> Self {
        if after_total > before_total {
            Trend::After
        } else if before_total > after_total {
            Trend::Before
        } else {
            Trend::AboutTheSame
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::After => "after",
            Trend::Before => "before",
            Trend::AboutTheSame => "about the same",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── PeriodSummary ─────────────────────────────────────────────────────────────

/// Sales totals either side of a reference date. The reference date itself
/// counts towards `after_total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub reference_date: NaiveDate,
    pub before_total: f64,
    pub after_total: f64,
    pub trend: Trend,
}

impl PeriodSummary {
    pub fn new(reference_date: NaiveDate, before_total: f64, after_total: f64) -> Self {
        Self {
            reference_date,
            before_total,
            after_total,
            trend: Trend::compare(before_total, after_total),
        }
    }

    pub fn total(&self) -> f64 {
        self.before_total + self.after_total
    }

    /// The one-line before/after comparison shown under the chart.
    pub fn describe(&self) -> String {
        format!(
            "Total sales before {}: {} — after: {}. Higher {}.",
            self.reference_date.format("%Y-%m-%d"),
            format_currency(self.before_total),
            format_currency(self.after_total),
            self.trend
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
