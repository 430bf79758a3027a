//! capbudg binary entry point
//!
//! This is a thin wrapper that sets up logging and calls the library's
//! `run_cli()` function.
//!
//! # Usage
//!
//! ```bash
//! # Serve the API on the configured address
//! capbudg serve
//!
//! # With debug logging
//! RUST_LOG=debug capbudg serve --workbook capbudg.xls
//! ```

use anyhow::Result;
use capbudg_server::{init_tracing, run_cli};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    run_cli().await
}
