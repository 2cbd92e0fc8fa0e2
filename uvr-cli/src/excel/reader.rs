//! Read extract worksheets into tables

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::error::PipelineError;
use crate::table::{Cell, Table};

use super::SheetRef;

/// List the worksheet names of a workbook, in workbook order
pub fn read_sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read one worksheet; the first row is the header
pub fn read_sheet(path: &Path, sheet: SheetRef<'_>) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        SheetRef::First => sheet_names.first().cloned().ok_or_else(|| {
            PipelineError::EmptyWorkbook {
                path: path.to_path_buf(),
            }
        })?,
        SheetRef::Index(idx) => sheet_names.get(idx).cloned().ok_or_else(|| {
            PipelineError::SheetMissing {
                path: path.to_path_buf(),
                sheet: format!("#{}", idx + 1),
            }
        })?,
        SheetRef::Named(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| PipelineError::SheetMissing {
                path: path.to_path_buf(),
                sheet: name.to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => parse_header(header),
        None => return Ok(Table::new(sheet_name, Vec::new())),
    };

    let data_rows = rows
        .map(|row| row.iter().map(data_to_cell).collect::<Vec<Cell>>())
        // Skip empty rows
        .filter(|cells| !cells.iter().all(Cell::is_empty))
        .collect();
    let table = Table::with_rows(sheet_name, headers, data_rows);

    log::debug!(
        "Read {} rows x {} columns from '{}' in {}",
        table.len(),
        table.width(),
        table.name,
        path.display()
    );
    Ok(table)
}

/// Placeholder prefix for columns with a blank header
pub const UNNAMED_COLUMN_PREFIX: &str = "Unnamed: ";

/// Header names; repeated names get a `.1`, `.2`, ... suffix and blank ones
/// become `Unnamed: <col>`
fn parse_header(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(col, c)| {
            let name = data_to_cell(c).to_string().trim_end().to_string();
            if name.is_empty() {
                return format!("{}{}", UNNAMED_COLUMN_PREFIX, col);
            }
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{}.{}", name, *count - 1)
            }
        })
        .collect()
}

/// Convert Excel cell to a table cell
fn data_to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => {
            // If it's a whole number, use integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Cell::Int(*f as i64)
            } else {
                Cell::Float(*f)
            }
        }
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Text(format!("{}", dt)),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_cell_normalises_whole_floats() {
        assert_eq!(data_to_cell(&Data::Float(3.0)), Cell::Int(3));
        assert_eq!(data_to_cell(&Data::Float(2.5)), Cell::Float(2.5));
        assert_eq!(data_to_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(
            data_to_cell(&Data::String("0,1,4".to_string())),
            Cell::text("0,1,4")
        );
    }

    #[test]
    fn test_parse_header_dedupes_names() {
        let header = vec![
            Data::String("Email".to_string()),
            Data::String("Notes".to_string()),
            Data::Empty,
            Data::String("Notes".to_string()),
            Data::String("  ".to_string()),
        ];
        assert_eq!(
            parse_header(&header),
            vec!["Email", "Notes", "Unnamed: 2", "Notes.1", "Unnamed: 4"]
        );
    }
}
