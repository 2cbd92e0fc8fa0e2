//! IT-AMS access tag derivation from free-text role descriptions
//!
//! Derivation happens in two stages. First each of the four categories (RPM,
//! SPS, PS, GS) is detected independently by substring matching against the
//! lower-cased roles text. Then the combined tag is chosen by evaluating
//! [`ACCESS_RULES`] in precedence order; the first rule whose predicate holds
//! wins. The category flags are kept as their own output columns so the
//! combined tag can be audited.

use crate::error::PipelineError;
use crate::table::{Cell, Table};

/// Combined IT-AMS access tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTag {
    Rpm,
    Sps,
    Ps,
    Gs,
    PsAndGs,
}

impl AccessTag {
    /// Tags in the order offered by the access-role dropdown
    pub const DROPDOWN: [AccessTag; 5] = [
        AccessTag::Ps,
        AccessTag::Gs,
        AccessTag::PsAndGs,
        AccessTag::Sps,
        AccessTag::Rpm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AccessTag::Rpm => "RPM",
            AccessTag::Sps => "SPS",
            AccessTag::Ps => "PS",
            AccessTag::Gs => "GS",
            AccessTag::PsAndGs => "PS and GS",
        }
    }
}

impl std::fmt::Display for AccessTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which of the four categories a roles text matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessFlags {
    pub rpm: bool,
    pub sps: bool,
    pub ps: bool,
    pub gs: bool,
}

/// A substring condition on lower-cased roles text
#[derive(Debug, Clone, Copy)]
enum RoleMatch {
    Contains(&'static str),
    /// `needle` present and `unless` absent anywhere in the text
    ContainsUnless {
        needle: &'static str,
        unless: &'static str,
    },
}

impl RoleMatch {
    fn matches(&self, roles: &str) -> bool {
        match self {
            RoleMatch::Contains(needle) => roles.contains(&needle.to_lowercase()),
            RoleMatch::ContainsUnless { needle, unless } => {
                roles.contains(&needle.to_lowercase()) && !roles.contains(&unless.to_lowercase())
            }
        }
    }
}

const RPM_MATCHES: &[RoleMatch] = &[RoleMatch::Contains("IT-AMS RPM Application Access")];

const SPS_MATCHES: &[RoleMatch] = &[RoleMatch::Contains("Supervisory Program Specialist")];

const PS_MATCHES: &[RoleMatch] = &[
    RoleMatch::Contains("IT-AMS PS Application Access"),
    RoleMatch::ContainsUnless {
        needle: "Program Specialist",
        unless: "Supervisory Program Specialist",
    },
];

const GS_MATCHES: &[RoleMatch] = &[
    RoleMatch::Contains("IT-AMS GS Application Access"),
    RoleMatch::ContainsUnless {
        needle: "Grants Specialist",
        unless: "National Centers Grants Specialist",
    },
];

/// One entry of the combined-tag rule list
pub struct AccessRule {
    /// Lower evaluates first
    pub precedence: u8,
    pub tag: AccessTag,
    pub predicate: fn(&AccessFlags) -> bool,
}

fn rpm_only(f: &AccessFlags) -> bool {
    f.rpm && !f.ps && !f.gs && !f.sps
}

fn sps_only(f: &AccessFlags) -> bool {
    f.sps && !f.ps && !f.gs && !f.rpm
}

fn ps_only(f: &AccessFlags) -> bool {
    f.ps && !f.sps && !f.gs && !f.rpm
}

fn gs_only(f: &AccessFlags) -> bool {
    f.gs && !f.sps && !f.ps && !f.rpm
}

fn ps_and_gs(f: &AccessFlags) -> bool {
    f.ps && f.gs && !f.sps && !f.rpm
}

/// Combined-tag rules, in precedence order
pub const ACCESS_RULES: [AccessRule; 5] = [
    AccessRule {
        precedence: 1,
        tag: AccessTag::Rpm,
        predicate: rpm_only,
    },
    AccessRule {
        precedence: 2,
        tag: AccessTag::Sps,
        predicate: sps_only,
    },
    AccessRule {
        precedence: 3,
        tag: AccessTag::Ps,
        predicate: ps_only,
    },
    AccessRule {
        precedence: 4,
        tag: AccessTag::Gs,
        predicate: gs_only,
    },
    AccessRule {
        precedence: 5,
        tag: AccessTag::PsAndGs,
        predicate: ps_and_gs,
    },
];

// Array order is evaluation order: precedence must strictly increase
const _: () = {
    let mut i = 1;
    while i < ACCESS_RULES.len() {
        assert!(ACCESS_RULES[i - 1].precedence < ACCESS_RULES[i].precedence);
        i += 1;
    }
};

/// Detect the four categories in a roles text
pub fn category_flags(roles_text: &str) -> AccessFlags {
    let roles = roles_text.to_lowercase();
    let any = |matchers: &[RoleMatch]| matchers.iter().any(|m| m.matches(&roles));
    AccessFlags {
        rpm: any(RPM_MATCHES),
        sps: any(SPS_MATCHES),
        ps: any(PS_MATCHES),
        gs: any(GS_MATCHES),
    }
}

/// Pick the combined tag for a set of category flags
pub fn combine_flags(flags: &AccessFlags) -> Option<AccessTag> {
    ACCESS_RULES
        .iter()
        .find(|rule| (rule.predicate)(flags))
        .map(|rule| rule.tag)
}

/// Derive the combined access tag for a roles text
///
/// Returns `None` when no category matches, or when the matched categories
/// form a combination no rule covers (e.g. RPM together with PS).
pub fn derive_access_tag(roles_text: &str) -> Option<AccessTag> {
    combine_flags(&category_flags(roles_text))
}

/// Flag column names, in the order they are inserted
pub const FLAG_COLUMNS: [&str; 4] = ["RPM", "PS", "GS", "SPS"];

/// Add the four flag columns and fill the combined access column
///
/// The flag columns are inserted immediately before the last column, which
/// is expected to be `access_column`; if the table has no such column it is
/// appended first. Rows where no rule fires keep whatever `access_column`
/// already held.
pub fn derive_access_columns(
    table: &mut Table,
    roles_column: &str,
    access_column: &str,
) -> Result<(), PipelineError> {
    table.require_column(roles_column)?;
    if !table.has_column(access_column) {
        table.push_column(access_column, Cell::Empty);
    }
    for flag in FLAG_COLUMNS {
        let pos = table.width() - 1;
        table.insert_column(pos, flag, Cell::Empty);
    }

    let roles_idx = table.require_column(roles_column)?;
    let rpm_idx = table.require_column("RPM")?;
    let ps_idx = table.require_column("PS")?;
    let gs_idx = table.require_column("GS")?;
    let sps_idx = table.require_column("SPS")?;
    let access_idx = table.require_column(access_column)?;

    let mut rows = table.take_rows();
    let mut tagged = 0usize;
    for row in &mut rows {
        let (flags, tag) = match row[roles_idx].as_str() {
            Some(roles) => (category_flags(roles), derive_access_tag(roles)),
            None => (AccessFlags::default(), None),
        };
        let mark = |on: bool, label: &str| if on { Cell::text(label) } else { Cell::Empty };
        row[rpm_idx] = mark(flags.rpm, "RPM");
        row[ps_idx] = mark(flags.ps, "PS");
        row[gs_idx] = mark(flags.gs, "GS");
        row[sps_idx] = mark(flags.sps, "SPS");

        if let Some(tag) = tag {
            row[access_idx] = Cell::text(tag.label());
            tagged += 1;
        }
    }
    log::debug!(
        "Derived access tags for {} of {} rows in '{}'",
        tagged,
        rows.len(),
        table.name
    );
    table.set_rows(rows);
    Ok(())
}
