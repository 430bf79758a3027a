//! Configuration Engine
//!
//! Settings are loaded from `capbudg.toml` in the working directory:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8000"
//!
//! [workbook]
//! path = "data/capbudg.xls"
//! sheet = "CapBudgWS"
//!
//! [extraction]
//! known_tables = ["INITIAL INVESTMENT", "CASHFLOW DETAILS"]
//! ```
//!
//! Every section is optional; missing keys fall back to defaults.

mod settings;


pub use settings::{ExtractionSettings, ServerSettings, Settings, WorkbookSettings};
