//! Left joins that carry auxiliary fields into a primary table

use std::collections::HashMap;

use crate::error::PipelineError;
use crate::table::{Cell, Table};

/// Left-join `carried_fields` from `auxiliary` into `primary` on `key_field`
///
/// The output has exactly the rows of `primary`, in order. Carried fields are
/// appended after the existing columns; a column of the same name already in
/// `primary` is dropped first so stale template values never shadow the
/// joined ones. Primary rows with no match (or a missing key) get missing
/// values. When the auxiliary table repeats a key, its first row wins.
pub fn left_join(
    mut primary: Table,
    auxiliary: &Table,
    key_field: &str,
    carried_fields: &[&str],
) -> Result<Table, PipelineError> {
    let primary_key = primary
        .column_index(key_field)
        .ok_or_else(|| PipelineError::JoinKeyAbsent {
            table: primary.name.clone(),
            key: key_field.to_string(),
        })?;
    let aux_key = auxiliary
        .column_index(key_field)
        .ok_or_else(|| PipelineError::JoinKeyAbsent {
            table: auxiliary.name.clone(),
            key: key_field.to_string(),
        })?;
    let aux_fields = carried_fields
        .iter()
        .map(|f| auxiliary.require_column(f))
        .collect::<Result<Vec<_>, _>>()?;

    // Index auxiliary rows by key for fast lookup
    let mut index: HashMap<String, usize> = HashMap::new();
    for (row_idx, row) in auxiliary.rows().iter().enumerate() {
        if let Some(key) = row[aux_key].key() {
            index.entry(key).or_insert(row_idx);
        }
    }

    let key_name = primary.columns()[primary_key].clone();
    for field in carried_fields {
        if *field != key_name && primary.drop_column(field) {
            log::debug!("Replaced stale column '{}' in '{}'", field, primary.name);
        }
    }
    let primary_key = primary.require_column(&key_name)?;

    let mut rows = primary.take_rows();
    let mut matched = 0usize;
    for row in &mut rows {
        let aux_row = row[primary_key]
            .key()
            .and_then(|k| index.get(&k))
            .map(|&i| &auxiliary.rows()[i]);
        if aux_row.is_some() {
            matched += 1;
        }
        for &col in &aux_fields {
            row.push(aux_row.map(|r| r[col].clone()).unwrap_or(Cell::Empty));
        }
    }

    for field in carried_fields {
        primary.push_column(*field, Cell::Empty);
    }
    log::debug!(
        "Joined {:?} from '{}' into '{}': {} of {} rows matched",
        carried_fields,
        auxiliary.name,
        primary.name,
        matched,
        rows.len()
    );
    primary.set_rows(rows);
    Ok(primary)
}

/// Drop the trailing placeholder column, then join `field` in its place
///
/// Source templates end with a blank column meant for the value this join
/// supplies; the fresh value lands back in the last position.
pub fn refresh_trailing_column(
    mut primary: Table,
    auxiliary: &Table,
    key_field: &str,
    field: &str,
) -> Result<Table, PipelineError> {
    primary.require_column(key_field).map_err(|_| PipelineError::JoinKeyAbsent {
        table: primary.name.clone(),
        key: key_field.to_string(),
    })?;
    if let Some(dropped) = primary.drop_last_column() {
        log::debug!("Dropped placeholder column '{}' from '{}'", dropped, primary.name);
    }
    left_join(primary, auxiliary, key_field, &[field])
}
