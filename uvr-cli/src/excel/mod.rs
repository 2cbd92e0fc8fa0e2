//! Excel import/export for reconciliation tables
//!
//! Reports never touch calamine or rust_xlsxwriter directly; they go through
//! a [`WorkbookStore`] handed to them by the orchestrator.

mod reader;
pub mod roles_sheet;
mod writer;

use std::path::Path;

use anyhow::Result;

use crate::table::Table;

pub use reader::{UNNAMED_COLUMN_PREFIX, read_sheet, read_sheet_names};
pub use writer::write_workbook;

/// Which worksheet of a workbook to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRef<'a> {
    /// First sheet in workbook order
    First,
    /// Sheet at a 0-based position
    Index(usize),
    /// Sheet by exact name
    Named(&'a str),
}

/// Rows whose identifier cell should be highlighted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MissingIdentifier {
    pub column: String,
    pub rows: Vec<usize>,
}

/// One output sheet: the table plus the annotations the renderer applies
///
/// The sheet takes its name from [`Table::name`].
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSpec {
    pub table: Table,
    /// Data-row indices that close a group (thick bottom border)
    pub group_boundaries: Vec<usize>,
    pub missing_identifier: Option<MissingIdentifier>,
    /// Column that gets the access tag dropdown
    pub dropdown_column: Option<String>,
}

impl SheetSpec {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            group_boundaries: Vec::new(),
            missing_identifier: None,
            dropdown_column: None,
        }
    }

    pub fn with_group_boundaries(mut self, rows: Vec<usize>) -> Self {
        self.group_boundaries = rows;
        self
    }

    pub fn with_missing_identifier(mut self, column: impl Into<String>, rows: Vec<usize>) -> Self {
        self.missing_identifier = Some(MissingIdentifier {
            column: column.into(),
            rows,
        });
        self
    }

    pub fn with_dropdown(mut self, column: impl Into<String>) -> Self {
        self.dropdown_column = Some(column.into());
        self
    }
}

/// A whole output workbook
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkbookSpec {
    pub sheets: Vec<SheetSpec>,
    /// Append the `IT_AMS_Roles` reference sheet after the data sheets
    pub roles_reference: bool,
}

impl WorkbookSpec {
    pub fn new(sheets: Vec<SheetSpec>) -> Self {
        Self {
            sheets,
            roles_reference: false,
        }
    }

    pub fn with_roles_reference(mut self) -> Self {
        self.roles_reference = true;
        self
    }
}

/// Spreadsheet access used by the report pipelines
pub trait WorkbookStore {
    /// Worksheet names in workbook order
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>>;

    /// Read one worksheet as a table (first row is the header)
    fn read_sheet(&self, path: &Path, sheet: SheetRef<'_>) -> Result<Table>;

    /// Write a styled workbook, replacing any existing file
    fn write_workbook(&self, path: &Path, spec: &WorkbookSpec) -> Result<()>;
}

/// `.xlsx` files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxStore;

impl WorkbookStore for XlsxStore {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        read_sheet_names(path)
    }

    fn read_sheet(&self, path: &Path, sheet: SheetRef<'_>) -> Result<Table> {
        read_sheet(path, sheet)
    }

    fn write_workbook(&self, path: &Path, spec: &WorkbookSpec) -> Result<()> {
        write_workbook(path, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn make_table(name: &str) -> Table {
        Table::with_rows(
            name,
            vec![
                "Email".to_string(),
                "Last Name".to_string(),
                "IT-AMS Role\n(please specify using dropdown)".to_string(),
            ],
            vec![
                vec!["a@x.gov".into(), "Avery".into(), "PS".into()],
                vec!["b@x.gov".into(), "Brook".into(), Cell::Empty],
                vec!["c@x.gov".into(), "Cole".into(), Cell::Int(3)],
            ],
        )
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let store = XlsxStore;

        let spec = WorkbookSpec::new(vec![
            SheetSpec::new(make_table("Accounts"))
                .with_group_boundaries(vec![0])
                .with_dropdown("IT-AMS Role\n(please specify using dropdown)"),
            SheetSpec::new(make_table("Other"))
                .with_missing_identifier("IT-AMS Role\n(please specify using dropdown)", vec![1]),
        ])
        .with_roles_reference();
        store.write_workbook(&path, &spec).unwrap();

        assert_eq!(
            store.sheet_names(&path).unwrap(),
            vec!["Accounts", "Other", roles_sheet::ROLES_SHEET_NAME]
        );

        let table = store.read_sheet(&path, SheetRef::First).unwrap();
        assert_eq!(table.name, "Accounts");
        assert_eq!(table, make_table("Accounts"));

        let roles = store
            .read_sheet(&path, SheetRef::Named(roles_sheet::ROLES_SHEET_NAME))
            .unwrap();
        assert_eq!(roles.len(), 5);
        assert_eq!(roles.get(2, "IT_AMS_Roles"), Some(&Cell::text("PS and GS")));
    }

    #[test]
    fn test_blank_headers_survive_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxStore;
        let columns = vec!["Email".to_string(), String::new(), String::new()];
        for (file, row) in [("a.xlsx", ["a", "n1", "n2"]), ("b.xlsx", ["b", "m1", "m2"])] {
            let table = Table::with_rows(
                "Sheet1",
                columns.clone(),
                vec![row.iter().map(|v| Cell::text(*v)).collect()],
            );
            let spec = WorkbookSpec::new(vec![SheetSpec::new(table)]);
            store.write_workbook(&dir.path().join(file), &spec).unwrap();
        }

        let read = |file: &str| store.read_sheet(&dir.path().join(file), SheetRef::First).unwrap();
        let mut combined = read("a.xlsx");
        assert_eq!(combined.columns(), &["Email", "Unnamed: 1", "Unnamed: 2"]);
        combined.append(read("b.xlsx"));

        assert_eq!(combined.width(), 3);
        assert_eq!(combined.get(1, "Unnamed: 1"), Some(&Cell::text("m1")));
        assert_eq!(combined.get(1, "Unnamed: 2"), Some(&Cell::text("m2")));
    }

    #[test]
    fn test_read_missing_sheet_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let store = XlsxStore;
        store
            .write_workbook(&path, &WorkbookSpec::new(vec![SheetSpec::new(make_table("Only"))]))
            .unwrap();

        assert!(store.read_sheet(&path, SheetRef::Named("Nope")).is_err());
        assert!(store.read_sheet(&path, SheetRef::Index(1)).is_err());
        assert_eq!(store.read_sheet(&path, SheetRef::Index(0)).unwrap().len(), 3);
    }
}
