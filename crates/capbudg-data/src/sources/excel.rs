//! Workbook data source using calamine.
//!
//! The format (`.xls`, `.xlsx`, `.xlsb`, `.ods`) is picked from the file
//! extension. The workbook is reopened on every read, nothing is held between
//! calls.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::cell::{Cell, Grid};
use crate::error::{DataError, Result};
use crate::sources::SheetSource;

/// Spreadsheet workbook data source
pub struct ExcelSource {
    /// Path to the workbook
    path: String,
    /// Sheet names cache
    sheet_names: Vec<String>,
}

impl ExcelSource {
    /// Create a new source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();

        if !path.as_ref().exists() {
            return Err(DataError::FileNotFound(path_str));
        }

        let workbook = open_workbook_auto(path.as_ref())
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", path_str, e)))?;

        let sheet_names = workbook.sheet_names();

        Ok(Self {
            path: path_str,
            sheet_names,
        })
    }

    /// Copy a calamine range into a grid anchored at A1.
    ///
    /// calamine ranges start at the first used cell, so leading blank rows
    /// and columns are padded back in to keep column A as the label column.
    /// Trailing blank cells are dropped, so a row is only as wide as its own
    /// last value.
    fn range_to_grid(range: &Range<Data>) -> Grid {
        let Some((end_row, end_col)) = range.end() else {
            return Vec::new();
        };

        (0..=end_row)
            .map(|row| {
                let mut cells: Vec<Cell> = (0..=end_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(Cell::from_data)
                            .unwrap_or(Cell::Empty)
                    })
                    .collect();
                while cells.last().is_some_and(Cell::is_blank) {
                    cells.pop();
                }
                cells
            })
            .collect()
    }
}

impl SheetSource for ExcelSource {
    fn read_sheet(&self, sheet: &str) -> Result<Grid> {
        if !self.sheet_names.iter().any(|s| s == sheet) {
            return Err(DataError::SheetNotFound(format!(
                "{} (available: {})",
                sheet,
                self.sheet_names.join(", ")
            )));
        }

        // Re-open workbook for reading (calamine requires this pattern)
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", self.path, e)))?;

        let range = workbook.worksheet_range(sheet)?;

        let grid = Self::range_to_grid(&range);
        debug!(path = %self.path, sheet, rows = grid.len(), "sheet loaded");
        Ok(grid)
    }

    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.sheet_names.clone())
    }

    fn default_sheet(&self) -> Option<String> {
        self.sheet_names.first().cloned()
    }
}
