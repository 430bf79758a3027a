//! Tests for the query subcommands

use tempfile::TempDir;

use capbudg_server::app::{rows_command, sum_command, tables_command, OutputFormat};
use capbudg_server::Settings;

fn settings_for(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.workbook.path = capbudg_fixtures::write_capbudg(dir.path());
    settings
}

#[test]
fn test_tables_text() {
    let dir = TempDir::new().unwrap();
    let output = tables_command(&settings_for(&dir), OutputFormat::Text).unwrap();

    assert!(output.starts_with("INITIAL INVESTMENT\nCASHFLOW DETAILS\n"));
    assert_eq!(output.lines().count(), 5);
}

#[test]
fn test_tables_json_matches_api_body() {
    let dir = TempDir::new().unwrap();
    let output = tables_command(&settings_for(&dir), OutputFormat::Json).unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["tables"][0], "INITIAL INVESTMENT");
}

#[test]
fn test_rows_text() {
    let dir = TempDir::new().unwrap();
    let output = rows_command(&settings_for(&dir), "WORKING CAPITAL", OutputFormat::Text).unwrap();

    assert_eq!(
        output,
        "Initial Investment in Work. Cap=\nWorking Capital as % of Rev="
    );
}

#[test]
fn test_rows_unknown_table() {
    let dir = TempDir::new().unwrap();
    let err = rows_command(&settings_for(&dir), "NOPE", OutputFormat::Text).unwrap_err();

    assert!(err.to_string().contains("Table 'NOPE' not found"));
}

#[test]
fn test_sum_json() {
    let dir = TempDir::new().unwrap();
    let output = sum_command(
        &settings_for(&dir),
        "OPERATING CASHFLOWS",
        "Revenues",
        OutputFormat::Json,
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["sum"].as_f64(), Some(331000.0));
    assert_eq!(value["row_name"], "Revenues");
}

#[test]
fn test_sum_text() {
    let dir = TempDir::new().unwrap();
    let output = sum_command(
        &settings_for(&dir),
        "INITIAL INVESTMENT",
        "Initial Investment=",
        OutputFormat::Text,
    )
    .unwrap();

    assert_eq!(output, "150000");
}

#[test]
fn test_missing_workbook_reports_path() {
    let mut settings = Settings::default();
    settings.workbook.path = "/nonexistent/capbudg.xls".into();

    let err = tables_command(&settings, OutputFormat::Text).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/capbudg.xls"));
}
