//! Core types shared by the sales pipeline crates.
//!
//! Holds the domain models, error taxonomy, formatting helpers, calendar-date
//! normalization and the pipeline configuration.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, SalesError};
