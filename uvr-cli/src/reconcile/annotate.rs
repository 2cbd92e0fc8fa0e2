//! Structural annotations handed to the workbook renderer

use crate::error::PipelineError;
use crate::table::Table;

/// Rows that close a run of equal values in `column`
///
/// Returns data-row indices (0-based) whose value differs from the next
/// row's. The last row always closes its group.
pub fn group_boundaries(table: &Table, column: &str) -> Result<Vec<usize>, PipelineError> {
    let values = table.column_values(column)?;
    Ok(values
        .iter()
        .enumerate()
        .filter(|(idx, value)| match values.get(idx + 1) {
            Some(next) => next != *value,
            None => true,
        })
        .map(|(idx, _)| idx)
        .collect())
}

/// Rows whose `column` has no value
pub fn missing_identifier_rows(table: &Table, column: &str) -> Result<Vec<usize>, PipelineError> {
    let values = table.column_values(column)?;
    Ok(values
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_empty())
        .map(|(idx, _)| idx)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn make_table() -> Table {
        Table::with_rows(
            "support",
            vec!["Title".to_string(), "Gateway".to_string()],
            vec![
                vec!["Analyst".into(), "G1".into()],
                vec!["Analyst".into(), Cell::Empty],
                vec!["Lead".into(), "G3".into()],
                vec!["Planner".into(), Cell::text("")],
                vec!["Planner".into(), "G5".into()],
            ],
        )
    }

    #[test]
    fn test_group_boundaries_close_each_run() {
        assert_eq!(group_boundaries(&make_table(), "Title").unwrap(), vec![1, 2, 4]);
    }

    #[test]
    fn test_group_boundaries_empty_table() {
        let table = Table::new("t", vec!["Title".to_string()]);
        assert!(group_boundaries(&table, "Title").unwrap().is_empty());
    }

    #[test]
    fn test_missing_identifier_rows() {
        assert_eq!(missing_identifier_rows(&make_table(), "Gateway").unwrap(), vec![1, 3]);
        assert!(missing_identifier_rows(&make_table(), "Nope").is_err());
    }
}
