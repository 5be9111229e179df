use indexmap::IndexSet;
use serde_json::{Map, Value};

use super::{decode_timestamp, kind, Cell, Table, TimeUnit, TIME_COLUMN};
use crate::Error;

/// Builds a table from a list of flat records.
///
/// Columns are the union of record keys in first-seen order; absent keys
/// become [`Cell::Null`]. With `time_field`, the raw field is decoded with
/// `time_unit` into a leading `time` column that becomes the ordering key.
/// With `cast_objects_to_numeric`, every column holding text is parsed to
/// numbers and unparseable text is an error.
pub fn to_table(
    records: &[Value],
    time_field: Option<&str>,
    time_unit: TimeUnit,
    cast_objects_to_numeric: bool,
) -> Result<Table, Error> {
    let records = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record.as_object().ok_or_else(|| {
                Error::malformed(format!("record {i}: expected a mapping, got {}", kind(record)))
            })
        })
        .collect::<Result<Vec<&Map<String, Value>>, Error>>()?;

    // The raw time field is held apart from the column set, so a field
    // literally named `time` cannot collide with the derived column.
    let is_data_column = |key: &str| match time_field {
        Some(field) => key != field && key != TIME_COLUMN,
        None => true,
    };

    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in &records {
        columns.extend(record.keys().map(String::as_str).filter(|k| is_data_column(*k)));
    }

    let mut rows: Vec<Vec<Cell>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(*c).map(Cell::from).unwrap_or(Cell::Null))
                .collect()
        })
        .collect();
    let mut names: Vec<String> = columns.iter().map(|c| c.to_string()).collect();

    if cast_objects_to_numeric {
        cast_text_columns(&names, &mut rows)?;
    }

    let Some(field) = time_field else {
        return Ok(Table::from_parts(names, rows, false));
    };

    for (i, (record, row)) in records.iter().zip(rows.iter_mut()).enumerate() {
        let raw = record
            .get(field)
            .ok_or_else(|| Error::malformed(format!("record {i}: missing time field {field:?}")))?;
        let time = decode_timestamp(raw, time_unit)
            .map_err(|e| Error::malformed(format!("record {i}: {e}")))?;
        row.insert(0, Cell::Time(time));
    }
    names.insert(0, TIME_COLUMN.to_string());

    Ok(Table::from_parts(names, rows, true))
}

/// Parses every column that holds at least one text cell.
fn cast_text_columns(names: &[String], rows: &mut [Vec<Cell>]) -> Result<(), Error> {
    for (idx, name) in names.iter().enumerate() {
        if !rows.iter().any(|row| matches!(row[idx], Cell::Text(_))) {
            continue;
        }
        for row in rows.iter_mut() {
            row[idx] = row[idx]
                .to_numeric()
                .map_err(|e| Error::malformed(format!("column {name:?}: {e}")))?;
        }
    }
    Ok(())
}
