//! HSES Monitoring Network accounts
//!
//! Three sheets: planner/support staff grouped by title, reviewers with
//! their linked monitoring id (unlinked reviewers first), and Lewin Group
//! staff.

use anyhow::Result;

use crate::error::PipelineError;
use crate::excel::{SheetRef, SheetSpec, WorkbookSpec};
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::reconcile::{
    group_boundaries, left_join, missing_identifier_rows, sort_missing_first, sort_records,
};
use crate::sources::SourceKind;
use crate::table::{Cell, Table};

use super::{EMAIL, NAME_KEYS, ROLES, write_report};

const SUPPORT_SHEET: &str = "Verify Review Support Accounts";
const PLANNER_SHEET: &str = "Verify Review Planner Accounts";
const REVIEWER_SHEET: &str = "Verify Reviewer Accounts";

pub const SUPPORT_OUTPUT: &str = "Verify Planner-Support Accounts";
pub const REVIEWER_OUTPUT: &str = "Verify Reviewer Accounts";
pub const LEWIN_OUTPUT: &str = "Verify Lewin Accounts";

const LEWIN_ROLE: &str = "Lewin Group";
const TITLE: &str = "Title";
const GATEWAY_ID: &str = "Gateway Id";
pub const MONITORING_ID: &str = "Monitoring System ID Linked for Reviews";

const REQUIRED: [SourceKind; 3] = [
    SourceKind::DanyaUsers,
    SourceKind::LewinAccounts,
    SourceKind::MonitoringNetworkUsers,
];

/// Move Lewin Group staff out of the support table and into `lewin`
///
/// Moved rows have their last two columns swapped first; their extract lists
/// `Title` and `Roles` in the opposite order. Returns the remaining support
/// accounts.
pub fn split_lewin(support: Table, lewin: &mut Table) -> Result<Table, PipelineError> {
    let roles_idx = support.require_column(ROLES)?;
    let (mut moved, support) = support.partition(|row| row[roles_idx].contains(LEWIN_ROLE));
    log::debug!("Moving {} Lewin Group account(s) from support accounts", moved.len());
    moved.swap_last_two_columns();
    lewin.append(moved);
    Ok(support)
}

/// Linked ids of `0` mean "not linked"
fn clear_zero_ids(table: &mut Table) -> Result<(), PipelineError> {
    table.map_column(MONITORING_ID, |cell| {
        let zero = match cell {
            Cell::Int(0) => true,
            Cell::Float(f) => *f == 0.0,
            Cell::Text(s) => s.trim() == "0",
            _ => false,
        };
        if zero {
            *cell = Cell::Empty;
        }
    })
}

pub fn run(ctx: &RunContext<'_>) -> Result<ReportOutcome> {
    let report = Report::Monitoring;
    let missing = ctx.missing(&REQUIRED, &[]);
    if !missing.is_empty() {
        return Ok(ReportOutcome::MissingInputs { report, missing });
    }

    let danya = ctx.source(SourceKind::DanyaUsers)?;
    let mut support = ctx.store.read_sheet(danya, SheetRef::Named(SUPPORT_SHEET))?;
    support.append(ctx.store.read_sheet(danya, SheetRef::Named(PLANNER_SHEET))?);

    let mut lewin = ctx.read_source(SourceKind::LewinAccounts)?;
    let support = split_lewin(support, &mut lewin)?;

    let mut lewin = sort_records(lewin, &NAME_KEYS)?;
    lewin.name = LEWIN_OUTPUT.to_string();

    let mut support = sort_records(support, &[TITLE, NAME_KEYS[0], NAME_KEYS[1]])?;
    support.name = SUPPORT_OUTPUT.to_string();
    let title_groups = group_boundaries(&support, TITLE)?;

    let reviewers = ctx.store.read_sheet(danya, SheetRef::Named(REVIEWER_SHEET))?;
    let network_users = ctx.read_source(SourceKind::MonitoringNetworkUsers)?;
    let mut reviewers = left_join(reviewers, &network_users, EMAIL, &[GATEWAY_ID])?;
    reviewers.rename_column(GATEWAY_ID, MONITORING_ID);
    clear_zero_ids(&mut reviewers)?;
    let mut reviewers = sort_missing_first(reviewers, MONITORING_ID, &NAME_KEYS)?;
    reviewers.name = REVIEWER_OUTPUT.to_string();
    let unlinked = missing_identifier_rows(&reviewers, MONITORING_ID)?;

    log::info!(
        "Monitoring: {} support, {} reviewer ({} unlinked), {} Lewin accounts",
        support.len(),
        reviewers.len(),
        unlinked.len(),
        lewin.len()
    );
    let spec = WorkbookSpec::new(vec![
        SheetSpec::new(support).with_group_boundaries(title_groups),
        SheetSpec::new(reviewers).with_missing_identifier(MONITORING_ID, unlinked),
        SheetSpec::new(lewin),
    ]);
    write_report(ctx, report, &spec)
}
