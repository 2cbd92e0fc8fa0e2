//! Central office T&TA accounts
//!
//! Only deduplicated against OGM; rows keep their source order.

use anyhow::Result;

use crate::excel::{SheetSpec, UNNAMED_COLUMN_PREFIX, WorkbookSpec};
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::reconcile::exclude_known;
use crate::sources::SourceKind;

use super::{EMAIL, write_report};

pub const SHEET_NAME: &str = "Rgn0 HSES T&TA Accounts";

pub fn run(ctx: &RunContext<'_>) -> Result<ReportOutcome> {
    let report = Report::Tta;
    let missing = ctx.missing(&[SourceKind::CentralOfficeTta], &[Report::Ogm]);
    if !missing.is_empty() {
        return Ok(ReportOutcome::MissingInputs { report, missing });
    }

    let mut accounts = ctx.read_source(SourceKind::CentralOfficeTta)?;
    let dropped = accounts.drop_columns_where(|header| {
        header.trim().is_empty() || header.starts_with(UNNAMED_COLUMN_PREFIX)
    });
    if !dropped.is_empty() {
        log::debug!("Dropped {} unnamed column(s) from T&TA accounts", dropped.len());
    }

    let ogm = ctx.read_output(Report::Ogm)?;
    let mut accounts = exclude_known(accounts, &ogm, EMAIL)?;
    accounts.name = SHEET_NAME.to_string();

    log::info!("Rgn0 HSES T&TA Accounts: {} accounts", accounts.len());
    let spec = WorkbookSpec::new(vec![SheetSpec::new(accounts)]);
    write_report(ctx, report, &spec)
}
