//! Reporting period (`<Mon>-<YYYY>`) used to stamp output file names

use chrono::{Datelike, Month, NaiveDate};

/// Month and year a run produces reports for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub month: Month,
    pub year: i32,
}

impl ReportPeriod {
    /// Resolve command-line month/year against `today`
    ///
    /// Month accepts `Nov` or `November` in any case; year must be four
    /// digits. A missing or unparseable month falls back to the month after
    /// `today` (and that month's year, unless a valid year was given). A valid
    /// month with no year uses the current year.
    pub fn resolve(month: Option<&str>, year: Option<&str>, today: NaiveDate) -> Self {
        let year = match year {
            Some(raw) => {
                let parsed = parse_year(raw);
                if parsed.is_none() {
                    log::warn!("Invalid year provided ({}), will default accordingly", raw);
                }
                parsed
            }
            None => None,
        };

        let month = match month {
            Some(raw) => {
                let parsed = parse_month(raw);
                if parsed.is_none() {
                    log::warn!(
                        "Invalid month provided ({}), will default to the coming month",
                        raw
                    );
                }
                parsed
            }
            None => None,
        };

        match month {
            Some(month) => ReportPeriod {
                month,
                year: year.unwrap_or(today.year()),
            },
            None => {
                let next = Self::following(today);
                log::info!("Defaulting to the coming month ({})", abbreviation(next.month));
                ReportPeriod {
                    month: next.month,
                    year: year.unwrap_or(next.year),
                }
            }
        }
    }

    /// The calendar month after `today`
    pub fn following(today: NaiveDate) -> Self {
        let current = Month::try_from(today.month() as u8).unwrap_or(Month::January);
        let year = if current == Month::December {
            today.year() + 1
        } else {
            today.year()
        };
        ReportPeriod {
            month: current.succ(),
            year,
        }
    }

    /// `Nov-2026`
    pub fn stamp(&self) -> String {
        format!("{}-{}", abbreviation(self.month), self.year)
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stamp())
    }
}

fn abbreviation(month: Month) -> &'static str {
    &month.name()[..3]
}

fn parse_month(raw: &str) -> Option<Month> {
    let raw = raw.trim();
    let lower = raw.to_lowercase();
    (1u8..=12)
        .filter_map(|n| Month::try_from(n).ok())
        .find(|m| {
            let name = m.name().to_lowercase();
            lower == name || lower == name[..3]
        })
}

fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        raw.parse().ok()
    } else {
        None
    }
}
