//! Table extraction - partitions a loosely structured grid into named tables.
//!
//! A capital-budgeting sheet is a single column of section titles, each
//! followed by labelled rows of figures and separated by blank rows:
//!
//! ```text
//! INITIAL INVESTMENT
//! Initial Investment=      100000
//! Opportunity cost=        0
//!
//! CASHFLOW DETAILS
//! Cost of goods sold=      50%
//! ```
//!
//! Detection rules, applied top to bottom:
//!
//! - A blank first cell ends the current table.
//! - A first cell whose trimmed text is a known table name always starts a
//!   new table, even directly after a row of the previous one.
//! - Outside a table, a row with text in the first cell and nothing in the
//!   second starts a new table.
//! - Any other non-blank row continues the current table, or is skipped when
//!   no table is open.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::cell::{Cell, Grid};
use crate::error::{DataError, Result};

/// Section titles of the standard capital-budgeting worksheet
pub const DEFAULT_KNOWN_TABLES: &[&str] = &[
    "INITIAL INVESTMENT",
    "CASHFLOW DETAILS",
    "DISCOUNT RATE",
    "WORKING CAPITAL",
    "GROWTH RATES",
    "SALVAGE VALUE",
    "OPERATING CASHFLOWS",
    "BOOK VALUE & DEPRECIATION",
];

/// A labelled row inside a table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Trimmed text of the first column
    pub label: String,
    /// Remaining columns of the row
    pub values: Vec<Cell>,
    /// Column-header row (labels rather than figures)
    pub is_header: bool,
}

impl Row {
    /// Sum of the numeric cells; non-numeric and empty cells are skipped.
    /// Header rows always sum to zero.
    pub fn sum(&self) -> f64 {
        if self.is_header {
            return 0.0;
        }
        self.values.iter().filter_map(Cell::as_number).sum()
    }
}

/// A named block of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name (trimmed title cell)
    pub name: String,
    /// Rows in sheet order
    pub rows: Vec<Row>,
}

impl Table {
    /// Row labels in sheet order
    pub fn row_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    /// First row whose label equals `label` exactly
    pub fn row(&self, label: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Column labels from the header row, if the table has one
    pub fn column_labels(&self) -> Option<Vec<String>> {
        self.rows
            .iter()
            .find(|r| r.is_header)
            .map(|r| r.values.iter().map(ToString::to_string).collect())
    }

    /// Number of rows holding figures (header row excluded)
    pub fn data_row_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_header).count()
    }
}

/// Extracted tables, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: Vec<Table>,
    index: HashMap<String, usize>,
}

impl TableSet {
    /// Insert a table; a repeated name replaces the earlier table's rows but
    /// keeps its position.
    fn insert(&mut self, table: Table) {
        match self.index.get(&table.name) {
            Some(&pos) => {
                debug!(table = %table.name, "duplicate table name, later block wins");
                self.tables[pos] = table;
            }
            None => {
                self.index.insert(table.name.clone(), self.tables.len());
                self.tables.push(table);
            }
        }
    }

    /// Table names in first-seen order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Look up a table by exact name
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.index
            .get(name)
            .map(|&pos| &self.tables[pos])
            .ok_or_else(|| DataError::TableNotFound(name.to_string()))
    }

    /// Row labels of a table
    pub fn row_names(&self, table: &str) -> Result<Vec<&str>> {
        Ok(self.table(table)?.row_names())
    }

    /// Sum of the numeric cells of one row
    pub fn row_sum(&self, table: &str, row: &str) -> Result<f64> {
        let t = self.table(table)?;
        t.row(row)
            .map(Row::sum)
            .ok_or_else(|| DataError::RowNotFound {
                table: table.to_string(),
                row: row.to_string(),
            })
    }

    /// Iterate over the tables
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when no table survived extraction
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Partitions a sheet grid into tables
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    known_tables: HashSet<String>,
}

impl TableExtractor {
    /// Extractor relying on layout only (no known table names)
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor that also recognises the given table names as section starts
    pub fn with_known_tables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known_tables: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Extractor preloaded with [`DEFAULT_KNOWN_TABLES`]
    pub fn capital_budgeting() -> Self {
        Self::with_known_tables(DEFAULT_KNOWN_TABLES)
    }

    /// Partition `grid` into tables.
    ///
    /// Fails with [`DataError::MalformedSheet`] when the grid has no
    /// non-blank cell or no row that starts a table. Tables left with no
    /// data rows are dropped, so the result may still be empty.
    pub fn extract(&self, grid: &Grid) -> Result<TableSet> {
        if grid.iter().all(|row| row.iter().all(Cell::is_blank)) {
            return Err(DataError::MalformedSheet("sheet is empty".to_string()));
        }

        let mut set = TableSet::default();
        let mut current: Option<Table> = None;
        let mut starts = 0usize;

        for (idx, row) in grid.iter().enumerate() {
            let first = row.first().unwrap_or(&Cell::Empty);

            if first.is_blank() {
                if let Some(table) = current.take() {
                    Self::close(&mut set, table);
                }
                continue;
            }

            if let Some(name) = self.table_start(row, current.is_some()) {
                if let Some(table) = current.take() {
                    Self::close(&mut set, table);
                }
                debug!(row = idx + 1, table = %name, "table start");
                starts += 1;
                current = Some(Table {
                    name,
                    rows: Vec::new(),
                });
                continue;
            }

            match current.as_mut() {
                Some(table) => {
                    let is_first = table.rows.is_empty();
                    table.rows.push(Self::make_row(first, row, is_first));
                }
                None => debug!(row = idx + 1, "row outside any table, skipped"),
            }
        }

        if let Some(table) = current.take() {
            Self::close(&mut set, table);
        }

        if starts == 0 {
            return Err(DataError::MalformedSheet(
                "no table header found".to_string(),
            ));
        }

        Ok(set)
    }

    /// Name of the table this row starts, if it starts one
    fn table_start(&self, row: &[Cell], in_table: bool) -> Option<String> {
        let name = row.first()?.as_text()?.trim();
        if name.is_empty() {
            return None;
        }
        if self.known_tables.contains(name) {
            return Some(name.to_string());
        }
        let second_blank = row.get(1).map_or(true, Cell::is_blank);
        (!in_table && second_blank).then(|| name.to_string())
    }

    fn make_row(first: &Cell, row: &[Cell], is_first: bool) -> Row {
        let values: Vec<Cell> = row.get(1..).map(<[Cell]>::to_vec).unwrap_or_default();
        // A leading row of pure text labels names the columns
        let is_header = is_first
            && values.iter().any(|c| matches!(c, Cell::Text(s) if !s.trim().is_empty()))
            && values.iter().all(|c| c.as_number().is_none());

        Row {
            label: first.to_string().trim().to_string(),
            values,
            is_header,
        }
    }

    fn close(set: &mut TableSet, table: Table) {
        if table.data_row_count() == 0 {
            debug!(table = %table.name, "table has no data rows, dropped");
            return;
        }
        set.insert(table);
    }
}
