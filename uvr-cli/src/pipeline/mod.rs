//! Report pipeline orchestrator
//!
//! Reports run in a fixed order because later reports load the written
//! output of earlier ones: IT-AMS Access and OGM feed Regional, POD and T&TA.
//! Each report ends in exactly one [`ReportOutcome`]; only structural data
//! problems abort the run.

pub mod reports;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::RunConfig;
use crate::excel::{SheetRef, WorkbookStore};
use crate::period::ReportPeriod;
use crate::sources::{self, SourceKind, SourceSet};
use crate::table::Table;

/// Output reports, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    ItAmsAccess,
    Ogm,
    Regional,
    Pod,
    Tta,
    Monitoring,
}

impl Report {
    pub const ORDER: [Report; 6] = [
        Report::ItAmsAccess,
        Report::Ogm,
        Report::Regional,
        Report::Pod,
        Report::Tta,
        Report::Monitoring,
    ];

    /// Name used in run messages
    pub fn title(&self) -> &'static str {
        match self {
            Report::ItAmsAccess => "IT-AMS Access",
            Report::Ogm => "HSES OGM Accounts",
            Report::Regional => "Rgn<##> HSES Accounts",
            Report::Pod => "CO POD Accounts",
            Report::Tta => "CO TTA Accounts",
            Report::Monitoring => "Monitoring",
        }
    }

    /// Output file stem before the period stamp; regional names follow
    /// their input files
    pub fn output_stem(&self) -> Option<&'static str> {
        match self {
            Report::ItAmsAccess => Some("IT-AMS Access"),
            Report::Ogm => Some("HSES OGM Accounts"),
            Report::Regional => None,
            Report::Pod => Some("Rgn0 HSES POD Accounts"),
            Report::Tta => Some("Rgn0 HSES T&TA Accounts"),
            Report::Monitoring => Some("HSES Monitoring Network Accounts"),
        }
    }

    /// Name printed when this report's output is a missing input elsewhere
    pub fn missing_output_name(&self) -> String {
        match self.output_stem() {
            Some(stem) => format!("{}_<month>-<year>.xlsx", stem),
            None => SourceKind::Regional.canonical_name().to_string(),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Terminal state of one report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Reconciled and written
    Written { report: Report, path: PathBuf },
    /// A finished output was supplied with the inputs and copied through
    AlreadyProvided { report: Report, path: PathBuf },
    /// Skipped; names every absent input
    MissingInputs { report: Report, missing: Vec<String> },
}

impl ReportOutcome {
    pub fn report(&self) -> Report {
        match self {
            ReportOutcome::Written { report, .. }
            | ReportOutcome::AlreadyProvided { report, .. }
            | ReportOutcome::MissingInputs { report, .. } => *report,
        }
    }

    pub fn is_missing_inputs(&self) -> bool {
        matches!(self, ReportOutcome::MissingInputs { .. })
    }
}

/// Outcome of every report in a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub period: ReportPeriod,
    pub output_dir: PathBuf,
    pub outcomes: Vec<ReportOutcome>,
}

impl RunSummary {
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_missing_inputs()).count()
    }
}

/// Everything a report needs for one run
pub struct RunContext<'a> {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub period: ReportPeriod,
    pub config: &'a RunConfig,
    pub sources: SourceSet,
    pub store: &'a dyn WorkbookStore,
}

impl RunContext<'_> {
    /// `<stem>_<Mon>-<YYYY>.xlsx`
    pub fn stamped_name(&self, stem: &str) -> String {
        format!("{}_{}.xlsx", stem, self.period.stamp())
    }

    /// Where a report writes its output
    pub fn output_path(&self, report: Report) -> Option<PathBuf> {
        report
            .output_stem()
            .map(|stem| self.output_dir.join(self.stamped_name(stem)))
    }

    /// An already-written output of an earlier report in this run
    pub fn produced(&self, report: Report) -> Option<PathBuf> {
        self.output_path(report).filter(|p| p.is_file())
    }

    /// Names of the absent inputs among `sources` and earlier `outputs`
    pub fn missing(&self, sources: &[SourceKind], outputs: &[Report]) -> Vec<String> {
        let mut missing = self.sources.missing(sources);
        missing.extend(
            outputs
                .iter()
                .filter(|r| self.produced(**r).is_none())
                .map(|r| r.missing_output_name()),
        );
        missing
    }

    /// Path of a located input extract
    pub fn source(&self, kind: SourceKind) -> Result<&Path> {
        self.sources
            .get(kind)
            .with_context(|| format!("Input not found: {}", kind.canonical_name()))
    }

    /// First sheet of a located input extract
    pub fn read_source(&self, kind: SourceKind) -> Result<Table> {
        let path = self.source(kind)?;
        self.store.read_sheet(path, SheetRef::First)
    }

    /// First sheet of an earlier report's written output, loaded fresh
    pub fn read_output(&self, report: Report) -> Result<Table> {
        let path = self
            .produced(report)
            .with_context(|| format!("{} output has not been written", report))?;
        self.store.read_sheet(&path, SheetRef::First)
    }

    /// Copy a finished output supplied with the inputs, if there is one
    ///
    /// Takes precedence over regenerating the report.
    pub fn copy_if_provided(&self, report: Report) -> Result<Option<ReportOutcome>> {
        let Some(stem) = report.output_stem() else {
            return Ok(None);
        };
        let name = self.stamped_name(stem);
        let provided = self.input_dir.join(&name);
        if !provided.is_file() {
            return Ok(None);
        }

        let dest = self.output_dir.join(&name);
        fs::copy(&provided, &dest).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                provided.display(),
                dest.display()
            )
        })?;
        log::info!(
            "{} already exists in the folder and is assumed to be intentionally provided; using it as is",
            name
        );
        Ok(Some(ReportOutcome::AlreadyProvided { report, path: dest }))
    }
}

/// Remove and recreate the output directory
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clear output directory: {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    Ok(())
}

/// Run every report against `input_dir`
pub fn run_all(
    input_dir: &Path,
    period: ReportPeriod,
    config: &RunConfig,
    store: &dyn WorkbookStore,
) -> Result<RunSummary> {
    config.validate()?;
    let output_dir = input_dir.join(&config.output_dir_name);
    prepare_output_dir(&output_dir)?;

    let sources = sources::locate(input_dir)?;
    let ctx = RunContext {
        input_dir: input_dir.to_path_buf(),
        output_dir: output_dir.clone(),
        period,
        config,
        sources,
        store,
    };

    log::info!(
        "Processing {} for {} into {}",
        input_dir.display(),
        period,
        output_dir.display()
    );

    let mut outcomes = Vec::new();
    for report in Report::ORDER {
        log::debug!("Starting report: {}", report);
        match report {
            Report::ItAmsAccess => outcomes.push(reports::it_ams::run(&ctx)?),
            Report::Ogm => outcomes.push(reports::ogm::run(&ctx)?),
            Report::Regional => outcomes.extend(reports::regional::run(&ctx)?),
            Report::Pod => outcomes.push(reports::pod::run(&ctx)?),
            Report::Tta => outcomes.push(reports::tta::run(&ctx)?),
            Report::Monitoring => outcomes.push(reports::monitoring::run(&ctx)?),
        }
    }

    Ok(RunSummary {
        period,
        output_dir,
        outcomes,
    })
}
