//! Deterministic multi-key ordering of report tables
//!
//! All sorts here are stable and ascending. Cells compare with
//! [`Cell::sort_cmp`]: numbers numerically, text lexicographically, missing
//! values last.

use std::cmp::Ordering;

use crate::error::PipelineError;
use crate::table::{Cell, Row, Table};

/// Region assignment of a record: one code or a list of codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionKey {
    /// A single region code (0 is Central Office)
    Single(i64),
    /// Several regions, in the order they were listed
    Multi(Vec<i64>),
    /// No region recorded
    Absent,
}

impl RegionKey {
    /// Parse a region cell
    ///
    /// Numbers and numeric text are single codes; text containing a comma is
    /// a list of codes. Anything else is a structural error.
    pub fn parse(cell: &Cell) -> Result<Self, PipelineError> {
        let invalid = || PipelineError::InvalidRegion {
            value: cell.to_string(),
        };
        match cell {
            Cell::Empty => Ok(RegionKey::Absent),
            Cell::Int(i) => Ok(RegionKey::Single(*i)),
            Cell::Float(_) => cell.as_int().map(RegionKey::Single).ok_or_else(invalid),
            Cell::Bool(_) => Err(invalid()),
            Cell::Text(s) if s.trim().is_empty() => Ok(RegionKey::Absent),
            Cell::Text(s) if s.contains(',') => {
                let codes = s
                    .split(',')
                    .map(|part| parse_code(part).ok_or_else(invalid))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RegionKey::Multi(codes))
            }
            Cell::Text(s) => parse_code(s).map(RegionKey::Single).ok_or_else(invalid),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, RegionKey::Multi(_))
    }

    /// Comma-joined codes of a multi-region key
    fn label(codes: &[i64]) -> String {
        codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn rank(&self) -> u8 {
        match self {
            RegionKey::Single(_) => 0,
            RegionKey::Absent => 1,
            RegionKey::Multi(_) => 2,
        }
    }
}

fn parse_code(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

impl Ord for RegionKey {
    /// Single codes numerically, then records without a region, then
    /// multi-region records ordered by their comma-joined text
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RegionKey::Single(a), RegionKey::Single(b)) => a.cmp(b),
            (RegionKey::Multi(a), RegionKey::Multi(b)) => Self::label(a).cmp(&Self::label(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for RegionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_rows(a: &Row, b: &Row, indices: &[usize]) -> Ordering {
    for &idx in indices {
        let ord = a[idx].sort_cmp(&b[idx]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn key_indices(table: &Table, keys: &[&str]) -> Result<Vec<usize>, PipelineError> {
    keys.iter().map(|k| table.require_column(k)).collect()
}

/// Stable ascending sort by the given columns, in order
pub fn sort_records(mut table: Table, keys: &[&str]) -> Result<Table, PipelineError> {
    let indices = key_indices(&table, keys)?;
    let mut rows = table.take_rows();
    rows.sort_by(|a, b| compare_rows(a, b, &indices));
    table.set_rows(rows);
    Ok(table)
}

/// Sort with a leading region key, then the remaining columns
///
/// Single-code records come first, ordered numerically; multi-region records
/// follow, ordered by their text. Each partition is ordered by the full key
/// sequence on its own. Single codes are written back as numbers; every other
/// region cell keeps its original text.
pub fn sort_by_region(
    mut table: Table,
    region_column: &str,
    then: &[&str],
) -> Result<Table, PipelineError> {
    let region_idx = table.require_column(region_column)?;
    let indices = key_indices(&table, then)?;

    let keyed = table
        .take_rows()
        .into_iter()
        .map(|row| RegionKey::parse(&row[region_idx]).map(|key| (key, row)))
        .collect::<Result<Vec<_>, _>>()?;

    let (mut single, mut multi): (Vec<_>, Vec<_>) =
        keyed.into_iter().partition(|(key, _)| !key.is_multi());
    let by_key = |a: &(RegionKey, Row), b: &(RegionKey, Row)| {
        a.0.cmp(&b.0).then_with(|| compare_rows(&a.1, &b.1, &indices))
    };
    single.sort_by(by_key);
    multi.sort_by(by_key);

    let rows = single
        .into_iter()
        .chain(multi)
        .map(|(key, mut row)| {
            if let RegionKey::Single(code) = key {
                row[region_idx] = Cell::Int(code);
            }
            row
        })
        .collect();
    table.set_rows(rows);
    Ok(table)
}

/// Sort by `then`, then move rows with a missing `column` ahead of the rest
///
/// Within each group the name order from `then` is kept.
pub fn sort_missing_first(
    table: Table,
    column: &str,
    then: &[&str],
) -> Result<Table, PipelineError> {
    let mut table = sort_records(table, then)?;
    let idx = table.require_column(column)?;
    let (mut missing, present): (Vec<Row>, Vec<Row>) =
        table.take_rows().into_iter().partition(|row| row[idx].is_empty());
    missing.extend(present);
    table.set_rows(missing);
    Ok(table)
}
