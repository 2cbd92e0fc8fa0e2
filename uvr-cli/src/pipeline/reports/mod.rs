//! One module per output report
//!
//! Each `run` decides the report's outcome: copy-through when a finished
//! output was supplied, skip with every missing input named, or reconcile and
//! write.

pub mod it_ams;
pub mod monitoring;
pub mod ogm;
pub mod pod;
pub mod regional;
pub mod tta;

use anyhow::{Context, Result};

use crate::error::PipelineError;
use crate::excel::WorkbookSpec;
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::reconcile::{exclude_known, refresh_trailing_column, sort_records};
use crate::table::{Cell, Table};

pub(crate) const EMAIL: &str = "Email";
pub(crate) const REGION: &str = "Region";
pub(crate) const ROLES: &str = "Roles";
pub(crate) const ACCESS_COLUMN: &str = "IT-AMS Access";
pub(crate) const NAME_KEYS: [&str; 2] = ["Last Name", "First Name"];

/// Write a report with a fixed output name
pub(crate) fn write_report(
    ctx: &RunContext<'_>,
    report: Report,
    spec: &WorkbookSpec,
) -> Result<ReportOutcome> {
    let path = ctx
        .output_path(report)
        .with_context(|| format!("{} has no fixed output name", report))?;
    ctx.store.write_workbook(&path, spec)?;
    Ok(ReportOutcome::Written { report, path })
}

/// Central office extracts spell region 0 out in words
pub(crate) fn normalise_central_office(table: &mut Table) -> Result<(), PipelineError> {
    table.map_column(REGION, |cell| {
        if let Cell::Text(text) = cell {
            if text.contains("Central Office") {
                *text = text.replace("Central Office", "0");
            }
        }
    })
}

/// Shared regional/POD treatment of an account sheet
///
/// Drops accounts already under OGM review, refreshes the trailing access
/// column from IT-AMS Access, renames it to the dropdown header and sorts by
/// name.
pub(crate) fn review_accounts(
    accounts: Table,
    ogm: &Table,
    it_ams: &Table,
    access_role_header: &str,
) -> Result<Table, PipelineError> {
    let accounts = exclude_known(accounts, ogm, EMAIL)?;
    let mut accounts = refresh_trailing_column(accounts, it_ams, EMAIL, ACCESS_COLUMN)?;
    accounts.rename_column(ACCESS_COLUMN, access_role_header);
    sort_records(accounts, &NAME_KEYS)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders for end-to-end report tests

    use std::path::{Path, PathBuf};

    use chrono::Month;
    use rust_xlsxwriter::Workbook;

    use crate::config::RunConfig;
    use crate::excel::XlsxStore;
    use crate::period::ReportPeriod;
    use crate::pipeline::{RunContext, prepare_output_dir};
    use crate::sources;
    use crate::table::Cell;

    pub const STAMP: &str = "Nov-2026";

    pub fn period() -> ReportPeriod {
        ReportPeriod {
            month: Month::November,
            year: 2026,
        }
    }

    /// Write an input workbook; each sheet is (name, header, rows)
    pub fn write_xlsx(path: &Path, sheets: &[(&str, &[&str], Vec<Vec<Cell>>)]) {
        let mut workbook = Workbook::new();
        for (name, header, rows) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).unwrap();
            for (col, title) in header.iter().enumerate() {
                sheet.write_string(0, col as u16, *title).unwrap();
            }
            for (r, row) in rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    let (r, c) = ((r + 1) as u32, c as u16);
                    match cell {
                        Cell::Empty => {}
                        Cell::Text(s) => {
                            sheet.write_string(r, c, s).unwrap();
                        }
                        Cell::Int(i) => {
                            sheet.write_number(r, c, *i as f64).unwrap();
                        }
                        Cell::Float(f) => {
                            sheet.write_number(r, c, *f).unwrap();
                        }
                        Cell::Bool(b) => {
                            sheet.write_boolean(r, c, *b).unwrap();
                        }
                    }
                }
            }
        }
        workbook.save(path).unwrap();
    }

    pub fn write_single(path: &Path, header: &[&str], rows: Vec<Vec<Cell>>) {
        write_xlsx(path, &[("Sheet1", header, rows)]);
    }

    /// Context over `dir` with a fresh output directory
    pub fn context<'a>(dir: &Path, config: &'a RunConfig) -> RunContext<'a> {
        let output_dir: PathBuf = dir.join(&config.output_dir_name);
        prepare_output_dir(&output_dir).unwrap();
        RunContext {
            input_dir: dir.to_path_buf(),
            output_dir,
            period: period(),
            config,
            sources: sources::locate(dir).unwrap(),
            store: &XlsxStore,
        }
    }

    pub const ACCOUNT_HEADER: [&str; 6] = [
        "Region",
        "Last Name",
        "First Name",
        "Email",
        "Roles",
        "IT-AMS Access",
    ];

    pub fn account(region: Cell, last: &str, first: &str, email: &str, roles: &str) -> Vec<Cell> {
        vec![
            region,
            last.into(),
            first.into(),
            email.into(),
            roles.into(),
            Cell::Empty,
        ]
    }
}
