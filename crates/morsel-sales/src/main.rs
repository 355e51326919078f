mod bootstrap;

use anyhow::Result;
use clap::Parser;
use sales_core::formatting::format_currency;
use sales_core::models::RegionFilter;
use sales_core::settings::{Command, PipelineConfig, Settings};
use sales_data::analysis::{build_report, load_or_empty, region_options, ReportStatus, SalesReport};
use sales_data::consolidator::{
    display_relative, run_consolidation, Consolidation, ConsolidationOutcome,
};

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;
    tracing::info!("morsel-sales v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.pipeline_config()?;

    match &settings.command {
        Command::Consolidate { json } => {
            let consolidation = run_consolidation(&config)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&consolidation.report)?);
            } else {
                print_consolidation(&config, &consolidation);
            }
        }

        Command::Report { region, json } => {
            let table = load_or_empty(&config.output)?;
            let filter = RegionFilter::from_selector(region.as_deref());
            let report = build_report(&table, &filter, config.reference_date);
            if *json {
                println!("{}", report.to_json()?);
            } else {
                print_report(&report);
            }
        }

        Command::Regions => {
            let table = load_or_empty(&config.output)?;
            let options = region_options(&table);
            if options.is_empty() {
                println!("No regions available");
            }
            for option in options {
                println!("{:<16} {}", option.label, option.value);
            }
        }
    }

    Ok(())
}

fn print_consolidation(config: &PipelineConfig, consolidation: &Consolidation) {
    let report = &consolidation.report;
    for skipped in &report.skipped_files {
        println!(
            "Skipped {}: {}",
            display_relative(&skipped.path, &config.data_dir),
            skipped.reason
        );
    }

    match &consolidation.outcome {
        ConsolidationOutcome::Table(table) => println!(
            "Wrote {} rows to {} ({} files read, {} rows dropped, {} undated)",
            table.len(),
            config.output.display(),
            report.files_read,
            report.rows_dropped,
            report.unparseable_dates,
        ),
        ConsolidationOutcome::NoData(reason) => println!(
            "No data: {} (searched {})",
            reason,
            config.data_dir.join(&config.pattern).display()
        ),
    }
}

fn print_report(report: &SalesReport) {
    if report.status == ReportStatus::NoData {
        println!("{}", report.summary_text);
        return;
    }

    println!("Daily sales for {}", report.filter);
    for day in &report.series {
        println!("{}  {:>14}", day.date.format("%Y-%m-%d"), format_currency(day.total));
    }
    if report.undated_records > 0 {
        println!("({} records without a usable date not shown)", report.undated_records);
    }
    println!("{}", report.summary_text);
}
