//! Central office POD accounts

use anyhow::Result;

use crate::excel::{SheetSpec, WorkbookSpec};
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::sources::SourceKind;

use super::{review_accounts, write_report};

pub const SHEET_NAME: &str = "Rgn0 HSES POD Accounts";

pub fn run(ctx: &RunContext<'_>) -> Result<ReportOutcome> {
    let report = Report::Pod;
    let missing = ctx.missing(
        &[SourceKind::CentralOfficePod],
        &[Report::Ogm, Report::ItAmsAccess],
    );
    if !missing.is_empty() {
        return Ok(ReportOutcome::MissingInputs { report, missing });
    }

    let accounts = ctx.read_source(SourceKind::CentralOfficePod)?;
    let ogm = ctx.read_output(Report::Ogm)?;
    let it_ams = ctx.read_output(Report::ItAmsAccess)?;
    let header = ctx.config.access_role_header.as_str();
    let mut accounts = review_accounts(accounts, &ogm, &it_ams, header)?;
    accounts.name = SHEET_NAME.to_string();

    log::info!("Rgn0 HSES POD Accounts: {} accounts", accounts.len());
    let spec = WorkbookSpec::new(vec![SheetSpec::new(accounts).with_dropdown(header)])
        .with_roles_reference();
    write_report(ctx, report, &spec)
}
