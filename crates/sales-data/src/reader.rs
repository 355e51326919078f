//! Daily sales file discovery and per-file extraction.
//!
//! Each file is read independently: its header row is normalised, the
//! required columns are checked, rows for the target product are selected and
//! their amounts computed. File-level faults are returned as errors so the
//! consolidator can skip the file; row-level faults only show up in
//! [`FileStats`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use regex::Regex;
use sales_core::error::{Result, SalesError};
use sales_core::settings::normalize_label;
use tracing::{debug, warn};

/// Columns every input file must provide (after normalisation).
pub const REQUIRED_COLUMNS: [&str; 5] = ["product", "price", "quantity", "date", "region"];

/// A product row that survived filtering and numeric parsing. The date is
/// still the raw source text; normalisation happens after all files are
/// merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSale {
    pub amount: f64,
    pub raw_date: String,
    pub region: String,
}

/// Row counters for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Data rows read (excluding the header).
    pub rows_read: usize,
    /// Rows whose product matched the target.
    pub rows_matched: usize,
    /// Matched rows dropped because price or quantity did not parse.
    pub rows_dropped: usize,
}

/// Everything extracted from one input file.
#[derive(Debug, Clone, Default)]
pub struct FileExtract {
    pub sales: Vec<ExtractedSale>,
    pub stats: FileStats,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the files in `data_dir` whose names match `pattern`, sorted by path.
///
/// Only the top level of `data_dir` is scanned. A missing directory yields an
/// empty list.
pub fn find_sales_files(data_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = pattern_to_regex(pattern)?;

    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| matcher.is_match(name))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Compile a file-name pattern with `*` and `?` wildcards into an anchored
/// regular expression. Every other character matches literally.
pub fn pattern_to_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| SalesError::InvalidPattern(format!("{pattern}: {e}")))
}

/// Read one sales file and extract the rows for `product`.
///
/// `product` must already be normalised with
/// [`normalize_label`](sales_core::settings::normalize_label).
///
/// Returns [`SalesError::MissingColumns`] when the header lacks a required
/// column and [`SalesError::FileRead`] / [`SalesError::Csv`] when the file
/// cannot be read at all.
pub fn read_sales_file(path: &Path, product: &str) -> Result<FileExtract> {
    let file = std::fs::File::open(path).map_err(|source| SalesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(path, &headers)?;

    let mut extract = FileExtract::default();
    for result in reader.records() {
        extract.stats.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Unreadable row in {}: {}", path.display(), e);
                continue;
            }
        };

        let is_target = record
            .get(columns.product)
            .map(|p| normalize_label(p) == product)
            .unwrap_or(false);
        if !is_target {
            continue;
        }
        extract.stats.rows_matched += 1;

        match columns.to_sale(&record) {
            Some(sale) => extract.sales.push(sale),
            None => extract.stats.rows_dropped += 1,
        }
    }

    debug!(
        "File {}: {} read, {} matched, {} dropped",
        path.display(),
        extract.stats.rows_read,
        extract.stats.rows_matched,
        extract.stats.rows_dropped,
    );

    Ok(extract)
}

/// Currency symbols stripped from price cells.
const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€', '¥'];

/// Strip currency symbols and thousands separators from a price cell.
pub fn clean_price(raw: &str) -> String {
    raw.chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a cell as a finite, non-negative number.
pub fn parse_non_negative(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the required columns within a file's records.
struct ColumnIndex {
    product: usize,
    price: usize,
    quantity: usize,
    date: usize,
    region: usize,
}

impl ColumnIndex {
    fn resolve(path: &Path, headers: &StringRecord) -> Result<Self> {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            let name = normalize_label(name.trim_start_matches('\u{feff}'));
            by_name.entry(name).or_insert(idx);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !by_name.contains_key(**col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SalesError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        }

        Ok(Self {
            product: by_name["product"],
            price: by_name["price"],
            quantity: by_name["quantity"],
            date: by_name["date"],
            region: by_name["region"],
        })
    }

    fn to_sale(&self, record: &StringRecord) -> Option<ExtractedSale> {
        let price = parse_non_negative(&clean_price(record.get(self.price)?))?;
        let quantity = parse_non_negative(record.get(self.quantity)?)?;

        Some(ExtractedSale {
            amount: price * quantity,
            raw_date: record.get(self.date).unwrap_or_default().to_string(),
            region: record.get(self.region).unwrap_or_default().to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
