//! HSES OGM Accounts: grants staff with their access tag and user location
//!
//! This report is the authoritative table the Regional, POD and T&TA reports
//! deduplicate against.

use anyhow::Result;

use crate::error::PipelineError;
use crate::excel::{SheetSpec, WorkbookSpec};
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::reconcile::{group_boundaries, left_join, sort_records};
use crate::sources::SourceKind;
use crate::table::{Cell, Table};

use super::{ACCESS_COLUMN, EMAIL, ROLES, normalise_central_office, write_report};

pub const SHEET_NAME: &str = "OGM HSES Accounts";
const LOCATION: &str = "User Location";

/// Roles that put an account under OGM review
const OGM_ROLES: [&str; 3] = [
    "grants management officer",
    "grants specialist",
    "grants admin support",
];
/// Verification contacts are reviewed elsewhere even when they hold an OGM role
const EXCLUDED_ROLE: &str = "user verification contact-program";

const REQUIRED: [SourceKind; 3] = [
    SourceKind::AllRegions,
    SourceKind::CentralOfficeOgm,
    SourceKind::UserRoleListing,
];

/// Whether a roles text qualifies for the OGM table
pub fn is_ogm_account(roles: &Cell) -> bool {
    !roles.contains_ignore_case(EXCLUDED_ROLE)
        && OGM_ROLES.iter().any(|r| roles.contains_ignore_case(r))
}

fn filter_ogm_accounts(table: &mut Table) -> Result<(), PipelineError> {
    let roles_idx = table.require_column(ROLES)?;
    let before = table.len();
    table.retain_rows(|row| is_ogm_account(&row[roles_idx]));
    log::debug!("Kept {} of {} all-region accounts with OGM roles", table.len(), before);
    Ok(())
}

pub fn run(ctx: &RunContext<'_>) -> Result<ReportOutcome> {
    let report = Report::Ogm;
    if let Some(outcome) = ctx.copy_if_provided(report)? {
        return Ok(outcome);
    }
    let missing = ctx.missing(&REQUIRED, &[Report::ItAmsAccess]);
    if !missing.is_empty() {
        return Ok(ReportOutcome::MissingInputs { report, missing });
    }

    let mut accounts = ctx.read_source(SourceKind::AllRegions)?;
    filter_ogm_accounts(&mut accounts)?;

    let mut central = ctx.read_source(SourceKind::CentralOfficeOgm)?;
    normalise_central_office(&mut central)?;
    accounts.append(central);

    // Stale access column from the template
    accounts.drop_last_column();
    let it_ams = ctx.read_output(Report::ItAmsAccess)?;
    let accounts = left_join(accounts, &it_ams, EMAIL, &[ACCESS_COLUMN])?;

    let user_roles = ctx.read_source(SourceKind::UserRoleListing)?;
    let mut accounts = left_join(accounts, &user_roles, EMAIL, &[LOCATION])?;
    accounts.move_column(LOCATION, 1)?;
    accounts.rename_column(ACCESS_COLUMN, ctx.config.access_role_header.as_str());
    accounts.map_column(LOCATION, |cell| {
        if cell.is_empty() {
            *cell = Cell::Int(0);
        }
    })?;

    let mut accounts = sort_records(accounts, &[LOCATION, "Last Name", "First Name"])?;
    accounts.name = SHEET_NAME.to_string();
    let boundaries = group_boundaries(&accounts, LOCATION)?;

    log::info!("HSES OGM Accounts: {} accounts", accounts.len());
    let spec = WorkbookSpec::new(vec![
        SheetSpec::new(accounts)
            .with_group_boundaries(boundaries)
            .with_dropdown(ctx.config.access_role_header.as_str()),
    ])
    .with_roles_reference();
    write_report(ctx, report, &spec)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::it_ams;
    use super::*;
    use crate::config::{DEFAULT_ACCESS_ROLE_HEADER, RunConfig};
    use crate::excel::SheetRef;
    use crate::excel::roles_sheet::ROLES_SHEET_NAME;

    #[test]
    fn test_is_ogm_account() {
        assert!(is_ogm_account(&Cell::text("Grants Management Officer")));
        assert!(is_ogm_account(&Cell::text("HSES user; GRANTS SPECIALIST")));
        assert!(!is_ogm_account(&Cell::text(
            "Grants Specialist, User Verification Contact-Program"
        )));
        assert!(!is_ogm_account(&Cell::text("Program Specialist")));
        assert!(!is_ogm_account(&Cell::Empty));
    }

    fn write_inputs(dir: &std::path::Path, with_role_listing: bool) {
        write_single(
            &dir.join("RgnAll HSES Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![
                account(Cell::Int(4), "Voss", "Al", "al@x.gov", "Grants Specialist"),
                account(Cell::Int(2), "Cruz", "Bo", "bo@x.gov", "Grants Management Officer"),
                account(Cell::Int(3), "Diaz", "Cy", "cy@x.gov", "Program Specialist"),
                account(Cell::Int(6), "Webb", "Di", "di@x.gov", "Grants Admin Support"),
            ],
        );
        write_single(
            &dir.join("Rgn0 OGM Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![account("Central Office".into(), "Amos", "Ed", "ed@x.gov", "Viewer")],
        );
        write_single(
            &dir.join("Rgn0 HSES POD Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![],
        );
        if with_role_listing {
            write_single(
                &dir.join("UserRoleListingReport.xlsx"),
                &["Email", "User Location"],
                vec![
                    vec!["al@x.gov".into(), Cell::Int(4)],
                    vec!["bo@x.gov".into(), Cell::Int(2)],
                    vec!["di@x.gov".into(), Cell::Int(2)],
                ],
            );
        }
    }

    #[test]
    fn test_ogm_accounts_joined_and_grouped() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), true);
        let config = RunConfig::default();
        let ctx = context(dir.path(), &config);
        assert!(matches!(it_ams::run(&ctx).unwrap(), ReportOutcome::Written { .. }));

        let outcome = run(&ctx).unwrap();
        let path = ctx.output_dir.join(format!("HSES OGM Accounts_{}.xlsx", STAMP));
        assert_eq!(
            outcome,
            ReportOutcome::Written {
                report: Report::Ogm,
                path: path.clone()
            }
        );

        assert_eq!(
            ctx.store.sheet_names(&path).unwrap(),
            vec![SHEET_NAME, ROLES_SHEET_NAME]
        );
        let table = ctx.store.read_sheet(&path, SheetRef::First).unwrap();
        assert_eq!(
            table.columns(),
            &[
                "Region",
                "User Location",
                "Last Name",
                "First Name",
                "Email",
                "Roles",
                DEFAULT_ACCESS_ROLE_HEADER
            ]
        );

        let emails: Vec<String> = table
            .column_values("Email")
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        // Location 0 (unmatched central office), then 2 (Cruz, Webb), then 4
        assert_eq!(emails, vec!["ed@x.gov", "bo@x.gov", "di@x.gov", "al@x.gov"]);
        assert_eq!(table.get(0, "User Location"), Some(&Cell::Int(0)));
        assert_eq!(table.get(0, "Region"), Some(&Cell::text("0")));
        assert_eq!(table.get(3, DEFAULT_ACCESS_ROLE_HEADER), Some(&Cell::text("GS")));
        assert_eq!(table.get(1, DEFAULT_ACCESS_ROLE_HEADER), Some(&Cell::Empty));
    }

    #[test]
    fn test_missing_role_listing_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), false);
        let config = RunConfig::default();
        let ctx = context(dir.path(), &config);
        it_ams::run(&ctx).unwrap();

        assert_eq!(
            run(&ctx).unwrap(),
            ReportOutcome::MissingInputs {
                report: Report::Ogm,
                missing: vec!["UserRoleListingReport.xlsx".to_string()],
            }
        );
    }

    #[test]
    fn test_provided_ogm_output_is_copied_through() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("HSES OGM Accounts_{}.xlsx", STAMP);
        write_single(
            &dir.path().join(&name),
            &["Email", "User Location"],
            vec![vec!["kept@x.gov".into(), Cell::Int(7)]],
        );
        let config = RunConfig::default();
        let ctx = context(dir.path(), &config);

        assert_eq!(
            run(&ctx).unwrap(),
            ReportOutcome::AlreadyProvided {
                report: Report::Ogm,
                path: ctx.output_dir.join(&name),
            }
        );
        let copied = ctx.read_output(Report::Ogm).unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied.get(0, "Email"), Some(&Cell::text("kept@x.gov")));
        assert_eq!(copied.get(0, "User Location"), Some(&Cell::Int(7)));
    }
}
