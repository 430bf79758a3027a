//! Sheet sources.
//!
//! A source turns a named sheet into a [`Grid`] of typed cells. The table
//! extractor only ever sees grids, so it does not care where they came from.

pub mod excel;

pub use excel::ExcelSource;

use crate::cell::Grid;
use crate::error::Result;

/// Trait for sources that can provide a whole sheet as a grid
pub trait SheetSource {
    /// Read every cell of a sheet, anchored at A1
    ///
    /// # Arguments
    /// * `sheet` - Sheet name
    ///
    /// # Returns
    /// Row-major grid; rows may have different lengths
    fn read_sheet(&self, sheet: &str) -> Result<Grid>;

    /// List available sheets in the source
    fn list_sheets(&self) -> Result<Vec<String>>;

    /// Get the default sheet name
    fn default_sheet(&self) -> Option<String>;
}
