//! Locate typed input extracts in a working directory by file-name prefix

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Every input extract a run may consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    AllRegions,
    CentralOfficeOgm,
    CentralOfficePod,
    UserRoleListing,
    Regional,
    CentralOfficeTta,
    DanyaUsers,
    LewinAccounts,
    MonitoringNetworkUsers,
}

impl SourceKind {
    pub const ALL: [SourceKind; 9] = [
        SourceKind::AllRegions,
        SourceKind::CentralOfficeOgm,
        SourceKind::CentralOfficePod,
        SourceKind::UserRoleListing,
        SourceKind::Regional,
        SourceKind::CentralOfficeTta,
        SourceKind::DanyaUsers,
        SourceKind::LewinAccounts,
        SourceKind::MonitoringNetworkUsers,
    ];

    /// File-name prefix; `Regional` is matched by pattern instead
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            SourceKind::AllRegions => Some("RgnAll HSES Accounts"),
            SourceKind::CentralOfficeOgm => Some("Rgn0 OGM Accounts"),
            SourceKind::CentralOfficePod => Some("Rgn0 HSES POD Accounts"),
            SourceKind::UserRoleListing => Some("UserRoleListingReport"),
            SourceKind::Regional => None,
            SourceKind::CentralOfficeTta => Some("Rgn0 HSES T&TA Accounts"),
            SourceKind::DanyaUsers => Some("Danya User HSES Accounts"),
            SourceKind::LewinAccounts => Some("Lewin Accounts"),
            SourceKind::MonitoringNetworkUsers => Some("Monitoring_Network_Users"),
        }
    }

    /// Name printed when the extract is missing
    pub fn canonical_name(&self) -> &'static str {
        match self {
            SourceKind::AllRegions => "RgnAll HSES Accounts.xlsx",
            SourceKind::CentralOfficeOgm => "Rgn0 OGM Accounts.xlsx (Central Office OGM Accounts)",
            SourceKind::CentralOfficePod => {
                "Rgn0 HSES POD Accounts.xlsx (Central Office POD Accounts)"
            }
            SourceKind::UserRoleListing => "UserRoleListingReport.xlsx",
            SourceKind::Regional => "Rgn<##> HSES Accounts.xlsx",
            SourceKind::CentralOfficeTta => {
                "Rgn0 HSES T&TA Accounts.xlsx (Central Office T&TA Accounts)"
            }
            SourceKind::DanyaUsers => "Danya User HSES Accounts.xlsx",
            SourceKind::LewinAccounts => "Lewin Accounts.xlsx",
            SourceKind::MonitoringNetworkUsers => "Monitoring_Network_Users.xlsx",
        }
    }

    /// Whether a file name belongs to this kind
    pub fn matches(&self, file_name: &str) -> bool {
        match self.prefix() {
            Some(prefix) => file_name.starts_with(prefix),
            None => regional_pattern().is_match(file_name),
        }
    }
}

fn regional_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Rgn\d{2}").expect("valid regional file pattern"))
}

fn is_candidate(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".xlsx") && !file_name.starts_with("~$")
}

/// Input files found in one working directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSet {
    found: BTreeMap<SourceKind, PathBuf>,
    regional: Vec<PathBuf>,
}

impl SourceSet {
    /// Path for a single-file kind, if present
    pub fn get(&self, kind: SourceKind) -> Option<&Path> {
        if kind == SourceKind::Regional {
            return self.regional.first().map(PathBuf::as_path);
        }
        self.found.get(&kind).map(PathBuf::as_path)
    }

    pub fn has(&self, kind: SourceKind) -> bool {
        self.get(kind).is_some()
    }

    /// Regional extracts, sorted by file name
    pub fn regional(&self) -> &[PathBuf] {
        &self.regional
    }

    /// Canonical names of the kinds in `required` that were not found
    pub fn missing(&self, required: &[SourceKind]) -> Vec<String> {
        required
            .iter()
            .filter(|kind| !self.has(**kind))
            .map(|kind| kind.canonical_name().to_string())
            .collect()
    }
}

/// Scan `dir` (non-recursively) for input extracts
///
/// Only `.xlsx` files count and Office lock files are skipped. When several
/// files match a single-file kind the first by name wins.
pub fn locate(dir: &Path) -> Result<SourceSet> {
    let mut names: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        if is_candidate(&name) {
            names.push((name, path));
        }
    }
    names.sort();

    let mut set = SourceSet::default();
    for (name, path) in names {
        if SourceKind::Regional.matches(&name) {
            set.regional.push(path);
            continue;
        }
        if let Some(kind) = SourceKind::ALL.iter().find(|k| k.matches(&name)) {
            set.found.entry(*kind).or_insert(path);
        }
    }

    for kind in SourceKind::ALL {
        match set.get(kind) {
            Some(path) => log::debug!("{:?}: {}", kind, path.display()),
            None => log::debug!("{:?}: not found", kind),
        }
    }
    Ok(set)
}
