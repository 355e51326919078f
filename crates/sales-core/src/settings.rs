use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::error::{Result, SalesError};
use crate::time_utils::parse_reference_date;

/// Directory scanned for daily sales files.
pub const DEFAULT_DATA_DIR: &str = "data";
/// File-name pattern of the daily sales files (`*` and `?` wildcards).
pub const DEFAULT_FILE_PATTERN: &str = "daily_sales_data_*.csv";
/// Where the consolidated table is written.
pub const DEFAULT_OUTPUT_FILE: &str = "data/pink_morsel_sales.csv";
/// Product whose sales are extracted.
pub const DEFAULT_PRODUCT: &str = "pink morsel";
/// The day the product's price went up.
pub const PRICE_INCREASE_DATE: &str = "2021-01-15";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Consolidate daily sales files and compare sales around a price change
#[derive(Parser, Debug, Clone)]
#[command(
    name = "morsel-sales",
    about = "Consolidate daily sales files and compare sales around a price change",
    version
)]
pub struct Settings {
    /// Directory containing the daily sales CSV files
    #[arg(long, global = true, env = "SALES_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// File-name pattern of the input files
    #[arg(long, global = true, default_value = DEFAULT_FILE_PATTERN)]
    pub pattern: String,

    /// Consolidated output file
    #[arg(long, global = true, env = "SALES_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Product to extract (matched case-insensitively)
    #[arg(long, global = true, default_value = DEFAULT_PRODUCT)]
    pub product: String,

    /// Reference date splitting "before" from "after" (YYYY-MM-DD)
    #[arg(long, global = true, env = "SALES_REFERENCE_DATE", default_value = PRICE_INCREASE_DATE)]
    pub reference_date: String,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build the consolidated sales table from the daily files
    Consolidate {
        /// Emit the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print daily totals and the before/after comparison
    Report {
        /// Only include this region (exact match); all regions when omitted
        #[arg(long)]
        region: Option<String>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the regions present in the consolidated table
    Regions,
}

impl Settings {
    /// Log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            self.log_level.as_str()
        }
    }

    /// Validate the raw arguments into a [`PipelineConfig`].
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let reference_date = parse_reference_date(&self.reference_date)?;
        let config = PipelineConfig::new(
            self.data_dir.clone(),
            self.output.clone(),
            &self.product,
            reference_date,
        )?
        .with_pattern(&self.pattern)?;
        debug!("Resolved pipeline config: {:?}", config);
        Ok(config)
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Validated settings shared by the consolidator and the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub output: PathBuf,
    /// Target product, already trimmed and lowercased.
    pub product: String,
    pub reference_date: NaiveDate,
}

impl PipelineConfig {
    pub fn new(
        data_dir: PathBuf,
        output: PathBuf,
        product: &str,
        reference_date: NaiveDate,
    ) -> Result<Self> {
        let product = normalize_label(product);
        if product.is_empty() {
            return Err(SalesError::Config("product name must not be empty".into()));
        }
        Ok(Self {
            data_dir,
            pattern: DEFAULT_FILE_PATTERN.to_string(),
            output,
            product,
            reference_date,
        })
    }

    /// Replace the discovery pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(SalesError::Config("file pattern must not be empty".into()));
        }
        self.pattern = pattern.to_string();
        Ok(self)
    }
}

/// Trim and lowercase a header name or product label for comparison.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["morsel-sales"];
        argv.extend_from_slice(args);
        Settings::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn test_settings_default_values() {
        let settings = parse(&["consolidate"]);
        assert_eq!(settings.pattern, DEFAULT_FILE_PATTERN);
        assert_eq!(settings.product, DEFAULT_PRODUCT);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert_eq!(settings.command, Command::Consolidate { json: false });
    }

    #[test]
    fn test_settings_report_args() {
        let settings = parse(&["report", "--region", "north", "--json"]);
        assert_eq!(
            settings.command,
            Command::Report {
                region: Some("north".to_string()),
                json: true,
            }
        );
    }

    #[test]
    fn test_settings_global_flags_after_subcommand() {
        let settings = parse(&["regions", "--product", "Gold Morsel", "--debug"]);
        assert_eq!(settings.product, "Gold Morsel");
        assert_eq!(settings.effective_log_level(), "DEBUG");
    }

    #[test]
    fn test_settings_rejects_unknown_log_level() {
        let result = Settings::try_parse_from(["morsel-sales", "--log-level", "TRACE", "regions"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_requires_subcommand() {
        assert!(Settings::try_parse_from(["morsel-sales"]).is_err());
    }

    #[test]
    fn test_pipeline_config_normalises_product() {
        let settings = parse(&["consolidate", "--product", "  Pink MORSEL "]);
        let config = settings.pipeline_config().unwrap();
        assert_eq!(config.product, "pink morsel");
        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2021, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_pipeline_config_invalid_reference_date() {
        let settings = parse(&["consolidate", "--reference-date", "2021-02-31"]);
        let err = settings.pipeline_config().unwrap_err();
        assert!(matches!(err, SalesError::InvalidReferenceDate(_)));
    }

    #[test]
    fn test_pipeline_config_rejects_empty_product() {
        let settings = parse(&["consolidate", "--product", "   "]);
        let err = settings.pipeline_config().unwrap_err();
        assert!(matches!(err, SalesError::Config(_)));
    }

    #[test]
    fn test_pipeline_config_rejects_empty_pattern() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let config =
            PipelineConfig::new("data".into(), "out.csv".into(), "pink morsel", date).unwrap();
        assert!(config.with_pattern(" ").is_err());
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Product "), "product");
        assert_eq!(normalize_label("REGION"), "region");
    }
}
