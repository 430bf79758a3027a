//! Configuration Settings

use std::path::PathBuf;

use capbudg_data::{TableExtractor, DEFAULT_KNOWN_TABLES};
use serde::{Deserialize, Serialize};

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Source workbook settings
    pub workbook: WorkbookSettings,
    /// Table detection settings
    pub extraction: ExtractionSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Build the table extractor these settings describe
    pub fn extractor(&self) -> TableExtractor {
        TableExtractor::with_known_tables(&self.extraction.known_tables)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Source workbook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookSettings {
    /// Path to the workbook, re-read on every request
    pub path: PathBuf,
    /// Worksheet holding the tables
    pub sheet: String,
}

impl Default for WorkbookSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("capbudg.xls"),
            sheet: "CapBudgWS".to_string(),
        }
    }
}

/// Table detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Titles that always start a new table, even without a blank row before
    pub known_tables: Vec<String>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            known_tables: DEFAULT_KNOWN_TABLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
