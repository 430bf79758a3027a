//! Error types for workbook loading and table lookups.

use thiserror::Error;

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading a sheet or querying its tables
#[derive(Debug, Error)]
pub enum DataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Failed to open workbook
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    /// Sheet not found in workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet is empty or has no recognisable table layout
    #[error("Malformed sheet: {0}")]
    MalformedSheet(String),

    /// No table with the requested name
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// The table exists but has no row with the requested label
    #[error("Row '{row}' not found in table '{table}'")]
    RowNotFound { table: String, row: String },

    /// Calamine error
    #[error("Excel error: {0}")]
    Calamine(String),
}

impl DataError {
    /// True for lookup misses (unknown table or row), false for load failures
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::TableNotFound(_) | DataError::RowNotFound { .. }
        )
    }
}

impl From<calamine::Error> for DataError {
    fn from(err: calamine::Error) -> Self {
        DataError::Calamine(err.to_string())
    }
}
