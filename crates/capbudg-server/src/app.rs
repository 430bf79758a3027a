//! CLI Application logic
//!
//! `capbudg serve` runs the HTTP API; the other subcommands answer the same
//! queries once from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{self, RowSumResponse, TableDetailsResponse, TablesResponse};
use crate::config::Settings;
use crate::load_tables;

/// Output format for query subcommands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output, same bodies as the HTTP API
    Json,
}

#[derive(Parser)]
#[command(name = "capbudg")]
#[command(author, version, about = "Capital budgeting workbook API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workbook path (overrides the configuration file)
    #[arg(short, long, global = true)]
    workbook: Option<PathBuf>,

    /// Worksheet name (overrides the configuration file)
    #[arg(short, long, global = true)]
    sheet: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List table names
    Tables {
        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the row labels of a table
    Rows {
        /// Table name
        table: String,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Sum the numeric cells of a row
    Sum {
        /// Table name
        table: String,

        /// Row label (exact match)
        row: String,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Initialize the tracing subscriber (`RUST_LOG` overrides the `info` default)
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// Filter from `RUST_LOG`-style directives; unset, blank or invalid means `info`
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Run the CLI application
///
/// Parses arguments, resolves settings and dispatches to the subcommand.
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(path) = cli.workbook {
        settings.workbook.path = path;
    }
    if let Some(sheet) = cli.sheet {
        settings.workbook.sheet = sheet;
    }

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            info!("Starting capbudg v{}", env!("CARGO_PKG_VERSION"));
            api::serve(settings).await?;
        }
        Commands::Tables { format } => {
            println!("{}", tables_command(&settings, format)?);
        }
        Commands::Rows { table, format } => {
            println!("{}", rows_command(&settings, &table, format)?);
        }
        Commands::Sum { table, row, format } => {
            println!("{}", sum_command(&settings, &table, &row, format)?);
        }
    }

    Ok(())
}

/// Execute the tables command
pub fn tables_command(settings: &Settings, format: OutputFormat) -> Result<String> {
    let tables = load(settings)?;
    let response = TablesResponse::from_tables(&tables);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => Ok(response.tables.join("\n")),
    }
}

/// Execute the rows command
pub fn rows_command(settings: &Settings, table: &str, format: OutputFormat) -> Result<String> {
    let tables = load(settings)?;
    let response = TableDetailsResponse::from_tables(&tables, table)?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => Ok(response.row_names.join("\n")),
    }
}

/// Execute the sum command
pub fn sum_command(
    settings: &Settings,
    table: &str,
    row: &str,
    format: OutputFormat,
) -> Result<String> {
    let tables = load(settings)?;
    let response = RowSumResponse::from_tables(&tables, table, row)?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => Ok(response.sum.to_string()),
    }
}

fn load(settings: &Settings) -> Result<capbudg_data::TableSet> {
    load_tables(settings).with_context(|| {
        format!(
            "Failed to read tables from {} (sheet {})",
            settings.workbook.path.display(),
            settings.workbook.sheet
        )
    })
}

/// Load settings from a config file or use defaults
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Settings::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => {
            let candidates = ["capbudg.toml", ".capbudg.toml"];
            for candidate in candidates {
                let path = Path::new(candidate);
                if path.exists() {
                    let content = fs::read_to_string(path)
                        .with_context(|| format!("Failed to read config: {}", candidate))?;
                    return Settings::from_toml_str(&content)
                        .with_context(|| format!("Failed to parse config: {}", candidate));
                }
            }
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let args = vec!["capbudg", "serve", "--bind", "0.0.0.0:9000"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Serve { bind } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
            }
            _ => panic!("Expected Serve command"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let args = vec![
            "capbudg",
            "tables",
            "--workbook",
            "data/capbudg.xls",
            "--sheet",
            "Other",
            "--format",
            "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.workbook, Some(PathBuf::from("data/capbudg.xls")));
        assert_eq!(cli.sheet.as_deref(), Some("Other"));
        match cli.command {
            Commands::Tables { format } => assert!(matches!(format, OutputFormat::Json)),
            _ => panic!("Expected Tables command"),
        }
    }

    #[test]
    fn test_cli_parse_sum() {
        let args = vec!["capbudg", "sum", "INITIAL INVESTMENT", "Initial Investment="];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Sum { table, row, format } => {
                assert_eq!(table, "INITIAL INVESTMENT");
                assert_eq!(row, "Initial Investment=");
                assert!(matches!(format, OutputFormat::Text));
            }
            _ => panic!("Expected Sum command"),
        }
    }

    #[test]
    fn test_cli_parse_rows_requires_table() {
        let args = vec!["capbudg", "rows"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    fn debug_enabled(filter: EnvFilter) -> (bool, bool) {
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
        tracing::subscriber::with_default(subscriber, || {
            (
                tracing::enabled!(tracing::Level::DEBUG),
                tracing::enabled!(tracing::Level::INFO),
            )
        })
    }

    #[test]
    fn test_log_filter_honours_debug_level() {
        assert_eq!(debug_enabled(log_filter(Some("debug"))), (true, true));
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(debug_enabled(log_filter(None)), (false, true));
        assert_eq!(debug_enabled(log_filter(Some("  "))), (false, true));
    }

    #[test]
    fn test_log_filter_per_crate_directive() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(log_filter(Some("warn,capbudg_data=debug")))
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "capbudg_data", tracing::Level::DEBUG));
            assert!(!tracing::enabled!(tracing::Level::INFO));
        });
    }

    #[test]
    fn test_load_settings_missing_explicit_file() {
        let result = load_settings(Some(Path::new("/nonexistent/capbudg.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("capbudg.toml");
        fs::write(&path, "[workbook]\nsheet = \"Budget\"\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.workbook.sheet, "Budget");
    }

    #[test]
    fn test_load_settings_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("capbudg.toml");
        fs::write(&path, "[workbook\n").unwrap();

        assert!(load_settings(Some(&path)).is_err());
    }
}
