mod config;
mod error;
mod excel;
mod period;
mod pipeline;
mod reconcile;
mod sources;
mod table;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::*;

use config::RunConfig;
use error::PipelineError;
use excel::XlsxStore;
use period::ReportPeriod;
use pipeline::{ReportOutcome, RunSummary};

/// Reconcile monthly HSES user verification extracts into review workbooks
#[derive(Parser, Debug)]
#[command(name = "uvr-cli")]
#[command(version)]
struct Cli {
    /// Folder holding the input extracts (a file path selects its folder)
    folder: Option<PathBuf>,

    /// Report month, e.g. `Nov` or `November` (defaults to next month)
    month: Option<String>,

    /// Report year, four digits
    year: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "ERROR:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = RunConfig::load(cli.config.as_deref())?;
    let folder = resolve_folder(cli.folder, &config)?;

    let today = chrono::Local::now().date_naive();
    let period = ReportPeriod::resolve(cli.month.as_deref(), cli.year.as_deref(), today);

    println!("{} File processing may take up to 2 minutes...", "INFO:".cyan());
    let summary = pipeline::run_all(&folder, period, &config, &XlsxStore)?;
    print_summary(&summary);
    Ok(())
}

/// Working directory from the command line, falling back to the configured default
fn resolve_folder(arg: Option<PathBuf>, config: &RunConfig) -> Result<PathBuf> {
    let folder = match arg {
        Some(path) if path.is_file() => {
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            println!(
                "{} A path to a file was provided. Will attempt to use the following folder path instead: {}",
                "INFO:".cyan(),
                parent.display()
            );
            parent
        }
        Some(path) => path,
        None => {
            println!(
                "{} No folder provided, will default to folder \"{}\"",
                "INFO:".cyan(),
                config.default_folder.display()
            );
            config.default_folder.clone()
        }
    };

    if !folder.is_dir() {
        return Err(PipelineError::FolderMissing { folder }.into());
    }
    Ok(folder)
}

fn print_summary(summary: &RunSummary) {
    for outcome in &summary.outcomes {
        match outcome {
            ReportOutcome::Written { path, .. } => {
                println!(
                    "{} {} ({})",
                    "File processed:".green(),
                    path.display(),
                    outcome.report()
                );
            }
            ReportOutcome::AlreadyProvided { report, path } => {
                println!(
                    "{} {} was provided with the inputs and copied as is to {}",
                    "INFO:".cyan(),
                    report,
                    path.display()
                );
            }
            ReportOutcome::MissingInputs { report, missing } => {
                println!(
                    "{} There are one or more files missing needed to generate the {} report.",
                    "FAILED:".red().bold(),
                    report
                );
                println!(
                    "Make sure you provided the correct files/file name formats and/or the correct folder/directory path."
                );
                for name in missing {
                    println!("  {} {}", "Missing file:".yellow(), name);
                }
            }
        }
    }

    let skipped = summary.skipped();
    if skipped > 0 {
        println!(
            "{} {} ({} report(s) skipped, outputs in {})",
            "FINISHED".bold(),
            summary.period,
            skipped,
            summary.output_dir.display()
        );
    } else {
        println!(
            "{} {} (outputs in {})",
            "FINISHED".bold(),
            summary.period,
            summary.output_dir.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_positional_arguments() {
        let cli = Cli::parse_from(["uvr-cli", "Inputs", "Nov", "2026", "-v", "--no-color"]);
        assert_eq!(cli.folder, Some(PathBuf::from("Inputs")));
        assert_eq!(cli.month.as_deref(), Some("Nov"));
        assert_eq!(cli.year.as_deref(), Some("2026"));
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_resolve_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::default();

        let file = dir.path().join("RgnAll HSES Accounts.xlsx");
        std::fs::write(&file, b"").unwrap();
        assert_eq!(resolve_folder(Some(file), &config).unwrap(), dir.path());
        assert_eq!(
            resolve_folder(Some(dir.path().to_path_buf()), &config).unwrap(),
            dir.path()
        );

        let err = resolve_folder(Some(dir.path().join("nope")), &config).unwrap_err();
        assert!(err.to_string().starts_with("There is no folder named"));
    }
}
