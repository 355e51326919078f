//! Persistence of the consolidated table.

use std::path::Path;

use sales_core::error::{Result, SalesError};
use sales_core::formatting::format_amount;
use sales_core::models::{ConsolidatedTable, SaleRecord, CONSOLIDATED_COLUMNS};
use tracing::{debug, warn};

/// Write `table` to `path` as `Sales,Date,Region` CSV.
///
/// Parent directories are created as needed. The file is written to a
/// temporary sibling first and then renamed into place, so readers never see
/// a half-written table.
pub fn write_table(path: &Path, table: &ConsolidatedTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("csv.tmp");
    let written = write_records(&tmp, table)
        .and_then(|()| std::fs::rename(&tmp, path).map_err(SalesError::from));
    if let Err(err) = written {
        if tmp.exists() {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                warn!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
        }
        return Err(err);
    }

    debug!("Wrote consolidated table to {}", path.display());
    Ok(())
}

fn write_records(path: &Path, table: &ConsolidatedTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    writer.write_record(CONSOLIDATED_COLUMNS)?;
    for record in table {
        writer.write_record([
            format_amount(record.amount),
            record.date.to_string(),
            record.region.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a consolidated table written by [`write_table`].
///
/// Returns `Ok(None)` when the file does not exist, so callers can show a
/// "no data" state. A file that exists but is malformed is an error.
pub fn load_table(path: &Path) -> Result<Option<ConsolidatedTable>> {
    if !path.exists() {
        warn!("Consolidated table not found: {}", path.display());
        return Ok(None);
    }

    let file = std::fs::File::open(path).map_err(|source| SalesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let records = reader
        .deserialize::<SaleRecord>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    Ok(Some(ConsolidatedTable::from_records(records)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sales_core::models::SaleDate;
    use tempfile::TempDir;

    fn sample_table() -> ConsolidatedTable {
        ConsolidatedTable::from_records(vec![
            SaleRecord::new(6.0, NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(), "north"),
            SaleRecord::new(14.25, SaleDate::Unparseable, "south, coast"),
        ])
    }

    #[test]
    fn test_write_table_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        write_table(&path, &sample_table()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Sales,Date,Region\n6.0,2021-01-10,north\n14.25,NaT,\"south, coast\"\n"
        );
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_write_empty_table_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_table(&path, &ConsolidatedTable::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Sales,Date,Region\n");
    }

    #[test]
    fn test_write_table_failure_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the target path makes the final rename fail.
        let path = dir.path().join("out.csv");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(write_table(&path, &sample_table()).is_err());
        assert!(!path.with_extension("csv.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_load_table_reads_written_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&path, &sample_table()).unwrap();

        let loaded = load_table(&path).unwrap().expect("table present");
        assert_eq!(loaded, sample_table());
    }

    #[test]
    fn test_load_table_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_table(&dir.path().join("absent.csv")).unwrap().is_none());
    }

    #[test]
    fn test_load_table_malformed_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Sales,Date,Region\nlots,2021-01-10,north\n").unwrap();

        assert!(load_table(&path).is_err());
    }
}
