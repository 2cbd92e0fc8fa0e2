//! Structural errors raised while reconciling extracts
//!
//! Missing inputs are not errors: they are reported through
//! [`crate::pipeline::ReportOutcome::MissingInputs`]. Everything here means
//! the data did not have the shape a report expects, and aborts the run.

use std::path::PathBuf;

/// Error from table operations and report processing
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Working directory does not exist
    FolderMissing { folder: PathBuf },
    /// Join key column is absent from one side of a merge
    JoinKeyAbsent { table: String, key: String },
    /// A column the report relies on is absent
    MissingColumn { table: String, column: String },
    /// Region value is neither a code nor a comma-separated list of codes
    InvalidRegion { value: String },
    /// Named worksheet is absent from a workbook
    SheetMissing { path: PathBuf, sheet: String },
    /// Workbook contains no worksheets
    EmptyWorkbook { path: PathBuf },
    /// Output directory name is not a single directory inside the working folder
    InvalidOutputDir { name: String },
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::FolderMissing { folder } => {
                write!(
                    f,
                    "There is no folder named \"{}\" to read from",
                    folder.display()
                )
            }
            PipelineError::JoinKeyAbsent { table, key } => {
                write!(f, "join key '{}' is absent from table '{}'", key, table)
            }
            PipelineError::MissingColumn { table, column } => {
                write!(f, "column '{}' is absent from table '{}'", column, table)
            }
            PipelineError::InvalidRegion { value } => {
                write!(
                    f,
                    "region '{}' is not a region code or a comma-separated list of codes",
                    value
                )
            }
            PipelineError::SheetMissing { path, sheet } => {
                write!(f, "sheet '{}' not found in {}", sheet, path.display())
            }
            PipelineError::EmptyWorkbook { path } => {
                write!(f, "workbook {} has no sheets", path.display())
            }
            PipelineError::InvalidOutputDir { name } => {
                write!(
                    f,
                    "output directory name '{}' must be a single folder name inside the working folder",
                    name
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {}
