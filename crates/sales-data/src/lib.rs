//! Data layer for the sales pipeline.
//!
//! Discovers and reads the daily sales files, consolidates them into a single
//! table, persists that table, and answers the per-region date/total queries
//! the dashboard makes against it.

pub mod aggregator;
pub mod analysis;
pub mod consolidator;
pub mod reader;
pub mod writer;

pub use sales_core as core;
