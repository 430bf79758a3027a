//! # capbudg-server
//!
//! HTTP API and command-line front-end over a capital-budgeting workbook.
//!
//! The library holds the router, configuration and CLI so they can be tested
//! without a running process; the `capbudg` binary only calls [`run_cli`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;

pub use app::{init_tracing, run_cli};
pub use config::Settings;
pub use error::ApiError;

use capbudg_data::{DataEngine, TableSet};

/// Read the configured workbook and extract its tables.
///
/// Called once per request; the result is never kept.
pub fn load_tables(settings: &Settings) -> capbudg_data::Result<TableSet> {
    DataEngine::load_tables(
        &settings.workbook.path,
        Some(&settings.workbook.sheet),
        &settings.extractor(),
    )
}
