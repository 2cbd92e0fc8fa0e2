//! In-memory tables loaded from spreadsheet extracts
//!
//! A [`Table`] is an ordered schema plus rows of [`Cell`]s. Column order is
//! significant: it is the order columns are written back out, and several
//! reports place derived columns at fixed positions relative to it.

mod cell;

use std::collections::HashMap;

pub use cell::Cell;

use crate::error::PipelineError;

/// One row of cells, positionally aligned with [`Table::columns`]
pub type Row = Vec<Cell>;

/// A named table with an ordered column schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Table name (sheet name or source label), used in diagnostics
    pub name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given schema
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from a schema and rows
    pub fn with_rows(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut table = Table::new(name, columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Append a row, padding or truncating it to the schema width
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column, or a structural error naming this table
    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Cell at a row for a named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All values of a named column, in row order
    pub fn column_values(&self, column: &str) -> Result<Vec<&Cell>, PipelineError> {
        let col = self.require_column(column)?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Insert a column at `position`, filling every row with `fill`
    pub fn insert_column(&mut self, position: usize, name: impl Into<String>, fill: Cell) {
        let position = position.min(self.columns.len());
        self.columns.insert(position, name.into());
        for row in &mut self.rows {
            row.insert(position, fill.clone());
        }
    }

    /// Append a column at the end, filling every row with `fill`
    pub fn push_column(&mut self, name: impl Into<String>, fill: Cell) {
        let end = self.columns.len();
        self.insert_column(end, name, fill);
    }

    /// Remove the column at `position`, returning its name
    pub fn remove_column(&mut self, position: usize) -> Option<String> {
        if position >= self.columns.len() {
            return None;
        }
        for row in &mut self.rows {
            row.remove(position);
        }
        Some(self.columns.remove(position))
    }

    /// Remove a column by name; returns whether it existed
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => self.remove_column(idx).is_some(),
            None => false,
        }
    }

    /// Remove the last column, returning its name
    pub fn drop_last_column(&mut self) -> Option<String> {
        let last = self.columns.len().checked_sub(1)?;
        self.remove_column(last)
    }

    /// Remove every column whose header matches `pred`
    pub fn drop_columns_where(&mut self, mut pred: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        let mut idx = 0;
        while idx < self.columns.len() {
            if pred(&self.columns[idx]) {
                if let Some(name) = self.remove_column(idx) {
                    dropped.push(name);
                }
            } else {
                idx += 1;
            }
        }
        dropped
    }

    /// Rename a column; returns whether it existed
    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.into();
                true
            }
            None => false,
        }
    }

    /// Move a named column so it ends up at `position`
    pub fn move_column(&mut self, name: &str, position: usize) -> Result<(), PipelineError> {
        let from = self.require_column(name)?;
        let to = position.min(self.columns.len() - 1);
        let header = self.columns.remove(from);
        self.columns.insert(to, header);
        for row in &mut self.rows {
            let cell = row.remove(from);
            row.insert(to, cell);
        }
        Ok(())
    }

    /// Swap the positions of the last two columns
    pub fn swap_last_two_columns(&mut self) {
        let n = self.columns.len();
        if n < 2 {
            return;
        }
        self.columns.swap(n - 2, n - 1);
        for row in &mut self.rows {
            row.swap(n - 2, n - 1);
        }
    }

    /// Apply `f` to every cell of a named column
    pub fn map_column(
        &mut self,
        column: &str,
        mut f: impl FnMut(&mut Cell),
    ) -> Result<(), PipelineError> {
        let col = self.require_column(column)?;
        for row in &mut self.rows {
            f(&mut row[col]);
        }
        Ok(())
    }

    /// Keep rows for which `pred` returns true, preserving order
    pub fn retain_rows(&mut self, mut pred: impl FnMut(&[Cell]) -> bool) {
        self.rows.retain(|row| pred(row));
    }

    /// Split rows into (matching, non-matching), both keeping the schema and order
    pub fn partition(self, mut pred: impl FnMut(&[Cell]) -> bool) -> (Table, Table) {
        let Table {
            name,
            columns,
            rows,
        } = self;
        let (yes, no): (Vec<Row>, Vec<Row>) = rows.into_iter().partition(|row| pred(row));
        (
            Table {
                name: name.clone(),
                columns: columns.clone(),
                rows: yes,
            },
            Table { name, columns, rows: no },
        )
    }

    /// Replace all rows, e.g. after reordering
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows.clear();
        for row in rows {
            self.push_row(row);
        }
    }

    /// Take ownership of the rows, leaving the schema in place
    pub fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    /// Append the rows of `other` below this table, aligning by column name
    ///
    /// Columns present only in `other` are added to the end of this schema in
    /// the order they appear there; cells absent on either side are missing.
    /// A name repeated in `other` maps to the same occurrence of that name
    /// here.
    pub fn append(&mut self, other: Table) {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut mapping = Vec::with_capacity(other.columns.len());
        for column in &other.columns {
            let nth = seen.entry(column.as_str()).or_insert(0);
            let existing = self
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| *c == column)
                .map(|(idx, _)| idx)
                .nth(*nth);
            *nth += 1;
            let dst = match existing {
                Some(idx) => idx,
                None => {
                    self.push_column(column.clone(), Cell::Empty);
                    self.columns.len() - 1
                }
            };
            mapping.push(dst);
        }
        let width = self.columns.len();

        for row in other.rows {
            let mut aligned = vec![Cell::Empty; width];
            for (src, cell) in row.into_iter().enumerate() {
                if let Some(&dst) = mapping.get(src) {
                    aligned[dst] = cell;
                }
            }
            self.rows.push(aligned);
        }
    }
}
