//! IT-AMS Access: every account with its derived access tag

use anyhow::Result;

use crate::excel::{SheetSpec, WorkbookSpec};
use crate::pipeline::{Report, ReportOutcome, RunContext};
use crate::reconcile::{derive_access_columns, sort_by_region};
use crate::sources::SourceKind;

use super::{ACCESS_COLUMN, NAME_KEYS, REGION, ROLES, normalise_central_office, write_report};

pub const SHEET_NAME: &str = "IT-AMS Roles";

const REQUIRED: [SourceKind; 3] = [
    SourceKind::AllRegions,
    SourceKind::CentralOfficeOgm,
    SourceKind::CentralOfficePod,
];

pub fn run(ctx: &RunContext<'_>) -> Result<ReportOutcome> {
    let report = Report::ItAmsAccess;
    if let Some(outcome) = ctx.copy_if_provided(report)? {
        return Ok(outcome);
    }
    let missing = ctx.missing(&REQUIRED, &[]);
    if !missing.is_empty() {
        return Ok(ReportOutcome::MissingInputs { report, missing });
    }

    let mut accounts = ctx.read_source(SourceKind::AllRegions)?;
    for kind in [SourceKind::CentralOfficeOgm, SourceKind::CentralOfficePod] {
        let mut central = ctx.read_source(kind)?;
        normalise_central_office(&mut central)?;
        accounts.append(central);
    }

    derive_access_columns(&mut accounts, ROLES, ACCESS_COLUMN)?;
    let mut accounts = sort_by_region(accounts, REGION, &NAME_KEYS)?;
    accounts.name = SHEET_NAME.to_string();

    log::info!("IT-AMS Access: {} accounts", accounts.len());
    let spec = WorkbookSpec::new(vec![SheetSpec::new(accounts)]);
    write_report(ctx, report, &spec)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::config::RunConfig;
    use crate::excel::SheetRef;
    use crate::table::Cell;

    fn write_inputs(dir: &std::path::Path) {
        write_single(
            &dir.join("RgnAll HSES Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![
                account(Cell::Int(5), "Stone", "Ada", "ada@x.gov", "IT-AMS PS Application Access"),
                account(
                    "2,7".into(),
                    "Reed",
                    "Bea",
                    "bea@x.gov",
                    "Program Specialist; Grants Specialist",
                ),
                account(
                    Cell::Int(1),
                    "Marsh",
                    "Cal",
                    "cal@x.gov",
                    "Supervisory Program Specialist",
                ),
                account("0,3".into(), "Hale", "Dee", "dee@x.gov", "Viewer"),
            ],
        );
        write_single(
            &dir.join("Rgn0 OGM Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![account(
                "Central Office".into(),
                "Ford",
                "Eli",
                "eli@x.gov",
                "IT-AMS RPM Application Access",
            )],
        );
        write_single(
            &dir.join("Rgn0 HSES POD Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![account(
                "Central Office".into(),
                "Banks",
                "Fay",
                "fay@x.gov",
                "Grants Specialist",
            )],
        );
    }

    #[test]
    fn test_writes_derived_columns_sorted_by_region() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let config = RunConfig::default();
        let ctx = context(dir.path(), &config);

        let outcome = run(&ctx).unwrap();
        let path = ctx.output_dir.join(format!("IT-AMS Access_{}.xlsx", STAMP));
        assert_eq!(
            outcome,
            ReportOutcome::Written {
                report: Report::ItAmsAccess,
                path: path.clone()
            }
        );

        let table = ctx.store.read_sheet(&path, SheetRef::First).unwrap();
        assert_eq!(table.name, SHEET_NAME);
        assert_eq!(
            table.columns(),
            &[
                "Region",
                "Last Name",
                "First Name",
                "Email",
                "Roles",
                "RPM",
                "PS",
                "GS",
                "SPS",
                "IT-AMS Access"
            ]
        );

        let emails: Vec<String> = table
            .column_values("Email")
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        // Region 0 (Banks, Ford), 1, 5, then "0,3", "2,7"
        assert_eq!(
            emails,
            vec!["fay@x.gov", "eli@x.gov", "cal@x.gov", "ada@x.gov", "dee@x.gov", "bea@x.gov"]
        );

        assert_eq!(table.get(0, "IT-AMS Access"), Some(&Cell::text("GS")));
        assert_eq!(table.get(1, "RPM"), Some(&Cell::text("RPM")));
        assert_eq!(table.get(1, "IT-AMS Access"), Some(&Cell::text("RPM")));
        assert_eq!(table.get(2, "SPS"), Some(&Cell::text("SPS")));
        assert_eq!(table.get(2, "PS"), Some(&Cell::Empty));
        assert_eq!(table.get(3, "IT-AMS Access"), Some(&Cell::text("PS")));
        assert_eq!(table.get(4, "IT-AMS Access"), Some(&Cell::Empty));
        assert_eq!(table.get(5, "IT-AMS Access"), Some(&Cell::text("PS and GS")));
        assert_eq!(table.get(0, "Region"), Some(&Cell::Int(0)));
    }

    #[test]
    fn test_provided_output_is_copied_through() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let provided = dir.path().join(format!("IT-AMS Access_{}.xlsx", STAMP));
        write_single(
            &provided,
            &["Email", "IT-AMS Access"],
            vec![vec!["z@x.gov".into(), "GS".into()]],
        );
        let config = RunConfig::default();
        let ctx = context(dir.path(), &config);

        let outcome = run(&ctx).unwrap();
        assert!(matches!(outcome, ReportOutcome::AlreadyProvided { .. }));
        let copied = ctx.read_output(Report::ItAmsAccess).unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied.width(), 2);
    }

    #[test]
    fn test_missing_inputs_are_all_named() {
        let dir = tempfile::tempdir().unwrap();
        write_single(
            &dir.path().join("RgnAll HSES Accounts.xlsx"),
            &ACCOUNT_HEADER,
            vec![],
        );
        let config = RunConfig::default();
        let ctx = context(dir.path(), &config);

        assert_eq!(
            run(&ctx).unwrap(),
            ReportOutcome::MissingInputs {
                report: Report::ItAmsAccess,
                missing: vec![
                    "Rgn0 OGM Accounts.xlsx (Central Office OGM Accounts)".to_string(),
                    "Rgn0 HSES POD Accounts.xlsx (Central Office POD Accounts)".to_string(),
                ],
            }
        );
    }
}
