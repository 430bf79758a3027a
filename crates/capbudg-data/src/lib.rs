//! # capbudg-data
//!
//! Reads a capital-budgeting worksheet and splits it into named tables of
//! labelled rows.
//!
//! ## Features
//!
//! - **Workbook Support**: Read `.xls`, `.xlsx`, `.xlsb` and `.ods` files
//!   using `calamine`
//! - **Typed Cells**: Every cell is empty, text or a finite number
//! - **Table Extraction**: Blank-row and title-cell detection of table blocks
//!
//! ## Example
//!
//! ```rust,ignore
//! use capbudg_data::{DataEngine, TableExtractor};
//!
//! let tables = DataEngine::load_tables(
//!     "capbudg.xls",
//!     Some("CapBudgWS"),
//!     &TableExtractor::capital_budgeting(),
//! )?;
//!
//! let total = tables.row_sum("INITIAL INVESTMENT", "Initial Investment=")?;
//! ```

pub mod cell;
pub mod error;
pub mod extract;
pub mod sources;

use std::path::Path;

// Re-exports
pub use cell::{Cell, Grid};
pub use error::{DataError, Result};
pub use extract::{Row, Table, TableExtractor, TableSet, DEFAULT_KNOWN_TABLES};
pub use sources::{ExcelSource, SheetSource};

/// Data engine for loading and extracting tables
pub struct DataEngine;

impl DataEngine {
    /// Open a workbook and extract the tables of one sheet
    ///
    /// # Arguments
    /// * `path` - Path to the workbook
    /// * `sheet` - Sheet name (optional, uses first sheet if None)
    /// * `extractor` - Table detection settings
    ///
    /// # Returns
    /// Every table found on the sheet, freshly read from disk
    pub fn load_tables(
        path: impl AsRef<Path>,
        sheet: Option<&str>,
        extractor: &TableExtractor,
    ) -> Result<TableSet> {
        let source = ExcelSource::new(path)?;
        Self::extract_from(&source, sheet, extractor)
    }

    /// Extract the tables of one sheet from any source
    pub fn extract_from<S: SheetSource>(
        source: &S,
        sheet: Option<&str>,
        extractor: &TableExtractor,
    ) -> Result<TableSet> {
        let sheet_name = match sheet {
            Some(s) => s.to_string(),
            None => source
                .default_sheet()
                .ok_or_else(|| DataError::SheetNotFound("No sheets in workbook".to_string()))?,
        };

        let grid = source.read_sheet(&sheet_name)?;
        extractor.extract(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MemorySource {
        sheets: Vec<(String, Grid)>,
    }

    impl SheetSource for MemorySource {
        fn read_sheet(&self, sheet: &str) -> Result<Grid> {
            self.sheets
                .iter()
                .find(|(name, _)| name == sheet)
                .map(|(_, grid)| grid.clone())
                .ok_or_else(|| DataError::SheetNotFound(sheet.to_string()))
        }

        fn list_sheets(&self) -> Result<Vec<String>> {
            Ok(self.sheets.iter().map(|(n, _)| n.clone()).collect())
        }

        fn default_sheet(&self) -> Option<String> {
            self.sheets.first().map(|(n, _)| n.clone())
        }
    }

    fn source() -> MemorySource {
        MemorySource {
            sheets: vec![
                (
                    "Cover".to_string(),
                    vec![vec![Cell::Text("COVER".to_string())]],
                ),
                (
                    "CapBudgWS".to_string(),
                    vec![
                        vec![Cell::Text("DISCOUNT RATE".to_string())],
                        vec![Cell::Text("Rate=".to_string()), Cell::Number(0.1)],
                    ],
                ),
            ],
        }
    }

    #[test]
    fn test_extract_from_named_sheet() {
        let set = DataEngine::extract_from(
            &source(),
            Some("CapBudgWS"),
            &TableExtractor::capital_budgeting(),
        )
        .unwrap();
        assert_eq!(set.table_names(), vec!["DISCOUNT RATE"]);
    }

    #[test]
    fn test_extract_from_default_sheet() {
        // Cover has a title but no rows, so its table is dropped
        let set = DataEngine::extract_from(&source(), None, &TableExtractor::new()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_extract_from_missing_sheet() {
        let result = DataEngine::extract_from(&source(), Some("Other"), &TableExtractor::new());
        assert!(matches!(result, Err(DataError::SheetNotFound(_))));
    }

    #[test]
    fn test_extract_from_source_without_sheets() {
        let empty = MemorySource { sheets: Vec::new() };
        assert!(empty.list_sheets().unwrap().is_empty());
        let result = DataEngine::extract_from(&empty, None, &TableExtractor::new());
        assert!(matches!(result, Err(DataError::SheetNotFound(_))));
    }
}
