//! Regional accounts (one workbook per `Rgn<##>` extract)

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::excel::{SheetRef, SheetSpec, WorkbookSpec};
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::sources::SourceKind;
use crate::table::Table;

use super::review_accounts;

/// `Rgn01 HSES Accounts (2).xlsx` -> `Rgn01 HSES Accounts_Nov-2026.xlsx`
pub fn output_name(input_name: &str, stamp: &str) -> String {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    let suffix = SUFFIX.get_or_init(|| {
        Regex::new(r"(?i)(\s*\(\d*\))?\.xlsx$").expect("valid download suffix pattern")
    });
    let stem = suffix.replace(input_name, "");
    format!("{}_{}.xlsx", stem, stamp)
}

pub fn run(ctx: &RunContext<'_>) -> Result<Vec<ReportOutcome>> {
    let report = Report::Regional;
    let regional = ctx.sources.regional();

    let mut missing = Vec::new();
    if regional.is_empty() {
        missing.push(SourceKind::Regional.canonical_name().to_string());
    }
    missing.extend(ctx.missing(&[], &[Report::Ogm, Report::ItAmsAccess]));
    if !missing.is_empty() {
        return Ok(vec![ReportOutcome::MissingInputs { report, missing }]);
    }

    let expected = ctx.config.expected_regional_files;
    if regional.len() < expected {
        log::warn!(
            "Less than {} Regional files were provided/detected ({} found). There should be {} of these files (Rgn<##> HSES Accounts.xlsx). Please verify",
            expected,
            regional.len(),
            expected
        );
    }

    let ogm = ctx.read_output(Report::Ogm)?;
    let it_ams = ctx.read_output(Report::ItAmsAccess)?;

    regional
        .iter()
        .map(|path| process_region(ctx, path, &ogm, &it_ams))
        .collect()
}

fn process_region(
    ctx: &RunContext<'_>,
    path: &Path,
    ogm: &Table,
    it_ams: &Table,
) -> Result<ReportOutcome> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;
    let dest = ctx
        .output_dir
        .join(output_name(file_name, &ctx.period.stamp()));

    let sheet_names = ctx.store.sheet_names(path)?;
    let accounts = ctx.store.read_sheet(path, SheetRef::First)?;
    let header = ctx.config.access_role_header.as_str();
    let accounts = review_accounts(accounts, ogm, it_ams, header)
        .with_context(|| format!("Failed to reconcile {}", file_name))?;
    log::info!("{}: {} accounts", file_name, accounts.len());

    let mut sheets = vec![SheetSpec::new(accounts).with_dropdown(header)];
    // Second sheet is carried over as-is
    if sheet_names.len() > 1 {
        sheets.push(SheetSpec::new(ctx.store.read_sheet(path, SheetRef::Index(1))?));
    }

    let spec = WorkbookSpec::new(sheets).with_roles_reference();
    ctx.store.write_workbook(&dest, &spec)?;
    Ok(ReportOutcome::Written {
        report: Report::Regional,
        path: dest,
    })
}
