//! Scalar spreadsheet cell values

use std::cmp::Ordering;

/// A single cell in an extract: text, number, or missing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value (blank cell)
    #[default]
    Empty,
    /// Text value
    Text(String),
    /// Whole number
    Int(i64),
    /// Fractional number
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl Cell {
    /// Create a text cell
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Blank cells and empty strings both count as missing
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Key used for joins and membership tests
    ///
    /// Exact, case-sensitive rendering of the value. Missing cells have no key
    /// and never match anything.
    pub fn key(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Case-sensitive substring test; non-text cells never match
    pub fn contains(&self, needle: &str) -> bool {
        self.as_str().is_some_and(|s| s.contains(needle))
    }

    /// Case-insensitive substring test; non-text cells never match
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.as_str()
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase()))
    }

    /// Ascending sort order: numbers, then text, then missing values last
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        match (self.sort_rank(), other.sort_rank()) {
            (a, b) if a != b => a.cmp(&b),
            (0, 0) => self.numeric().total_cmp(&other.numeric()),
            (1, 1) => self.to_string().cmp(&other.to_string()),
            _ => Ordering::Equal,
        }
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Cell::Int(_) | Cell::Float(_) | Cell::Bool(_) => 0,
            Cell::Text(s) if !s.is_empty() => 1,
            _ => 2,
        }
    }

    fn numeric(&self) -> f64 {
        match self {
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Bool(b) => f64::from(u8::from(*b)),
            _ => f64::NAN,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(fl) => write!(f, "{}", fl),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}
