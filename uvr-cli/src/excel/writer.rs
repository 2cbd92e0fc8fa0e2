//! Write reconciled tables as styled review workbooks

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{
    Color, DataValidation, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};

use crate::reconcile::AccessTag;
use crate::table::Cell;

use super::roles_sheet::write_roles_sheet;
use super::{SheetSpec, WorkbookSpec};

/// Header and highlight colours
mod colors {
    pub const HEADER: u32 = 0xCCFFCC;
    pub const YELLOW: u32 = 0xFFFF00;
    pub const BLUE: u32 = 0x99CCFF;
}

const DEFAULT_WIDTH: f64 = 14.84;
const HEADER_HEIGHT: f64 = 45.0;

/// Header fill and column width for a header name
fn header_style(name: &str, is_dropdown: bool) -> (u32, f64) {
    if is_dropdown {
        return (colors::YELLOW, DEFAULT_WIDTH);
    }
    match name {
        "Action Required" | "IT-AMS Role" => (colors::YELLOW, DEFAULT_WIDTH),
        "RPM" | "PS" | "GS" | "SPS" => (colors::YELLOW, 8.84),
        "IT-AMS Access" => (colors::BLUE, 8.84),
        "Monitoring System ID Linked for Reviews" => (colors::BLUE, 31.17),
        "Roles" | "Grantee Name" => (colors::HEADER, 37.17),
        "Email" | "Email Address" | "Title" => (colors::HEADER, 21.51),
        _ => (colors::HEADER, DEFAULT_WIDTH),
    }
}

fn base_format() -> Format {
    Format::new()
        .set_font_name("Arial")
        .set_font_size(10)
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_align(FormatAlign::Left)
}

/// Border weights for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edges {
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
}

fn with_borders(format: Format, edges: Edges) -> Format {
    let weight = |thick: bool| {
        if thick {
            FormatBorder::Thick
        } else {
            FormatBorder::Thin
        }
    };
    format
        .set_border_left(weight(edges.left))
        .set_border_right(weight(edges.right))
        .set_border_top(weight(edges.top))
        .set_border_bottom(weight(edges.bottom))
}

/// Where a sheet's annotations land, in worksheet coordinates
struct SheetLayout {
    last_col: u16,
    /// Last used row; the header is row 0
    last_row: u32,
    boundaries: HashSet<usize>,
    missing: HashSet<usize>,
    highlight_col: Option<usize>,
    dropdown_col: Option<usize>,
    has_records: bool,
}

impl SheetLayout {
    /// `None` for a table without columns
    fn new(spec: &SheetSpec) -> Option<Self> {
        let table = &spec.table;
        let last_col = table.width().checked_sub(1)? as u16;
        Some(Self {
            last_col,
            last_row: table.len() as u32,
            boundaries: spec.group_boundaries.iter().copied().collect(),
            missing: spec
                .missing_identifier
                .as_ref()
                .map(|m| m.rows.iter().copied().collect())
                .unwrap_or_default(),
            highlight_col: spec
                .missing_identifier
                .as_ref()
                .and_then(|m| table.column_index(&m.column)),
            dropdown_col: spec
                .dropdown_column
                .as_deref()
                .and_then(|c| table.column_index(c)),
            has_records: !table.is_empty(),
        })
    }

    fn header_edges(&self, col: usize) -> Edges {
        Edges {
            left: col == 0,
            right: col as u16 == self.last_col,
            top: true,
            bottom: true,
        }
    }

    /// Thick outer frame, plus a thick bottom on rows closing a group
    fn record_edges(&self, row_idx: usize, col: usize) -> Edges {
        Edges {
            left: col == 0,
            right: col as u16 == self.last_col,
            top: false,
            bottom: row_idx as u32 + 1 == self.last_row || self.boundaries.contains(&row_idx),
        }
    }

    /// Identifier cell of a row with no identifier
    fn is_highlighted(&self, row_idx: usize, col: usize) -> bool {
        self.highlight_col == Some(col) && self.missing.contains(&row_idx)
    }

    /// (first_row, col, last_row) covered by the dropdown list
    fn dropdown_range(&self) -> Option<(u32, u16, u32)> {
        let col = self.dropdown_col?;
        self.has_records.then_some((1, col as u16, self.last_row))
    }
}

/// Write a workbook: one styled sheet per table, plus the roles reference
pub fn write_workbook(path: &Path, spec: &WorkbookSpec) -> Result<()> {
    let mut workbook = Workbook::new();

    for sheet in &spec.sheets {
        write_sheet(&mut workbook, sheet)
            .with_context(|| format!("Failed to write sheet: {}", sheet.table.name))?;
    }
    if spec.roles_reference {
        write_roles_sheet(&mut workbook)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Workbook written to: {}", path.display());
    Ok(())
}

fn write_sheet(workbook: &mut Workbook, spec: &SheetSpec) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&spec.table.name)?;

    let table = &spec.table;
    let Some(layout) = SheetLayout::new(spec) else {
        return Ok(());
    };

    // Header
    for (col, name) in table.columns().iter().enumerate() {
        let (fill, width) = header_style(name, layout.dropdown_col == Some(col));
        let format = with_borders(base_format().set_bold(), layout.header_edges(col))
            .set_background_color(Color::RGB(fill));
        worksheet.write_string_with_format(0, col as u16, name, &format)?;
        worksheet.set_column_width(col as u16, width)?;
    }
    worksheet.set_row_height(0, HEADER_HEIGHT)?;

    // Records
    for (row_idx, record) in table.rows().iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, cell) in record.iter().enumerate() {
            let mut format = with_borders(base_format(), layout.record_edges(row_idx, col));
            if layout.is_highlighted(row_idx, col) {
                format = format.set_background_color(Color::RGB(colors::YELLOW));
            }
            write_cell(worksheet, row, col as u16, cell, &format)?;
        }
    }

    worksheet.set_freeze_panes(1, 1)?;
    worksheet.autofilter(0, 0, layout.last_row, layout.last_col)?;

    if let Some((first_row, col, last_row)) = layout.dropdown_range() {
        let labels: Vec<&str> = AccessTag::DROPDOWN.iter().map(|t| t.label()).collect();
        let validation = DataValidation::new().allow_list_strings(&labels)?;
        worksheet.add_data_validation(first_row, col, last_row, col, &validation)?;
    }

    Ok(())
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &Cell, format: &Format) -> Result<()> {
    match cell {
        Cell::Empty => {
            ws.write_blank(row, col, format)?;
        }
        Cell::Text(s) => {
            ws.write_string_with_format(row, col, s, format)?;
        }
        Cell::Int(i) => {
            ws.write_number_with_format(row, col, *i as f64, format)?;
        }
        Cell::Float(f) => {
            ws.write_number_with_format(row, col, *f, format)?;
        }
        Cell::Bool(b) => {
            ws.write_boolean_with_format(row, col, *b, format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn test_header_style_widths_and_fills() {
        assert_eq!(header_style("Roles", false), (colors::HEADER, 37.17));
        assert_eq!(header_style("IT-AMS Access", false), (colors::BLUE, 8.84));
        assert_eq!(header_style("SPS", false), (colors::YELLOW, 8.84));
        assert_eq!(header_style("Region", false), (colors::HEADER, DEFAULT_WIDTH));
        assert_eq!(header_style("Anything", true), (colors::YELLOW, DEFAULT_WIDTH));
    }

    fn annotated_spec() -> SheetSpec {
        let columns = ["Title", "Email", "Monitoring System ID Linked for Reviews", "Role"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let rows = (0..4)
            .map(|i| {
                vec![
                    Cell::text("t"),
                    Cell::text(format!("{}@x", i)),
                    Cell::Empty,
                    Cell::Empty,
                ]
            })
            .collect();
        SheetSpec::new(Table::with_rows("Accounts", columns, rows))
            .with_group_boundaries(vec![1])
            .with_missing_identifier("Monitoring System ID Linked for Reviews", vec![0, 2])
            .with_dropdown("Role")
    }

    #[test]
    fn test_group_boundaries_get_thick_bottom() {
        let layout = SheetLayout::new(&annotated_spec()).unwrap();

        assert!(layout.record_edges(1, 1).bottom);
        assert!(!layout.record_edges(0, 1).bottom);
        assert!(!layout.record_edges(2, 1).bottom);
        // Last record closes the table frame
        assert!(layout.record_edges(3, 1).bottom);
        assert_eq!(
            layout.record_edges(2, 3),
            Edges {
                left: false,
                right: true,
                top: false,
                bottom: false,
            }
        );
        assert!(layout.header_edges(0).left && layout.header_edges(0).top);
    }

    #[test]
    fn test_missing_identifier_rows_highlight_only_the_id_cell() {
        let layout = SheetLayout::new(&annotated_spec()).unwrap();

        assert!(layout.is_highlighted(0, 2));
        assert!(layout.is_highlighted(2, 2));
        assert!(!layout.is_highlighted(1, 2));
        assert!(!layout.is_highlighted(0, 1));
    }

    #[test]
    fn test_dropdown_covers_every_record() {
        let layout = SheetLayout::new(&annotated_spec()).unwrap();
        assert_eq!(layout.dropdown_range(), Some((1, 3, 4)));

        let empty =
            SheetSpec::new(Table::new("Empty", vec!["Role".to_string()])).with_dropdown("Role");
        assert_eq!(SheetLayout::new(&empty).unwrap().dropdown_range(), None);

        let unknown = annotated_spec().with_dropdown("Nope");
        assert_eq!(SheetLayout::new(&unknown).unwrap().dropdown_range(), None);

        assert!(SheetLayout::new(&SheetSpec::new(Table::default())).is_none());
    }
}
