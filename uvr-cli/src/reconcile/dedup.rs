//! Suppress records already owned by an authoritative table

use std::collections::HashSet;

use crate::error::PipelineError;
use crate::table::Table;

/// Remove rows of `subordinate` whose key appears anywhere in `authoritative`
///
/// Exact set membership on the key rendering; remaining rows keep their
/// order. Rows with a missing key are kept. Applying the same authoritative
/// table twice is a no-op.
pub fn exclude_known(
    mut subordinate: Table,
    authoritative: &Table,
    key_field: &str,
) -> Result<Table, PipelineError> {
    let sub_key = subordinate
        .column_index(key_field)
        .ok_or_else(|| PipelineError::JoinKeyAbsent {
            table: subordinate.name.clone(),
            key: key_field.to_string(),
        })?;
    let known: HashSet<String> = authoritative
        .column_values(key_field)
        .map_err(|_| PipelineError::JoinKeyAbsent {
            table: authoritative.name.clone(),
            key: key_field.to_string(),
        })?
        .into_iter()
        .filter_map(|c| c.key())
        .collect();

    let before = subordinate.len();
    subordinate.retain_rows(|row| match row[sub_key].key() {
        Some(key) => !known.contains(&key),
        None => true,
    });
    log::debug!(
        "Excluded {} of {} rows from '{}' already present in '{}'",
        before - subordinate.len(),
        before,
        subordinate.name,
        authoritative.name
    );
    Ok(subordinate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn make_regional() -> Table {
        Table::with_rows(
            "Rgn01",
            cols(&["Email", "Last Name"]),
            vec![
                vec!["a@x.gov".into(), "Adams".into()],
                vec!["b@x.gov".into(), "Baker".into()],
                vec!["c@x.gov".into(), "Clark".into()],
                vec![Cell::Empty, "Doe".into()],
            ],
        )
    }

    fn make_ogm() -> Table {
        Table::with_rows(
            "OGM",
            cols(&["User Location", "Email"]),
            vec![
                vec![Cell::Int(1), "b@x.gov".into()],
                vec![Cell::Int(0), "z@x.gov".into()],
            ],
        )
    }

    #[test]
    fn test_exclude_known_removes_authoritative_keys() {
        let result = exclude_known(make_regional(), &make_ogm(), "Email").unwrap();
        let emails: Vec<String> = result.rows().iter().map(|r| r[0].to_string()).collect();
        assert_eq!(emails, vec!["a@x.gov", "c@x.gov", ""]);
    }

    #[test]
    fn test_exclude_known_is_idempotent() {
        let ogm = make_ogm();
        let once = exclude_known(make_regional(), &ogm, "Email").unwrap();
        let twice = exclude_known(once.clone(), &ogm, "Email").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_exclude_known_missing_key_column() {
        let ogm = Table::new("OGM", cols(&["Mail"]));
        assert!(matches!(
            exclude_known(make_regional(), &ogm, "Email"),
            Err(PipelineError::JoinKeyAbsent { .. })
        ));
    }
}
