//! Normalized tabular output.
//!
//! Coinglass endpoints return a handful of irregular JSON shapes. The
//! builders in this module reshape each of them into a [`Table`] (or a
//! [`MultiKeyTable`] for per-exchange breakdowns) with a regular row/column
//! layout. Builders are pure functions over `serde_json::Value` payloads.

mod cell;
mod flat;
mod liquidation;
mod multi;
mod time;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::Error;

pub use self::cell::Cell;
pub use self::flat::to_table;
pub use self::liquidation::{
    to_heatmap_tables, to_liquidation_table, HEATMAP_COLUMNS, LIQUIDATION_MAP_COLUMNS,
    PRICE_TICK_COLUMNS,
};
pub use self::multi::{to_multi_key_table, CompositeKey, FieldValue, MultiKeyTable, EXCHANGE_NAME_KEY};
pub use self::time::{decode_timestamp, TimeUnit};

/// Name of the derived ordering column of time-indexed tables.
pub const TIME_COLUMN: &str = "time";

/// An ordered sequence of rows over a fixed, ordered set of named columns.
///
/// When the table is time-indexed, the first column is always [`TIME_COLUMN`]
/// and holds only [`Cell::Time`] values. Rows keep the order of the payload
/// they were built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    time_indexed: bool,
}

impl Table {
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>, time_indexed: bool) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        debug_assert!(!time_indexed || columns.first().map(String::as_str) == Some(TIME_COLUMN));
        Self {
            columns,
            rows,
            time_indexed,
        }
    }

    /// Column names, in output order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows; each row has one cell per column.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// The cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Name of the ordering key column, if the table is time-indexed.
    pub fn key(&self) -> Option<&str> {
        self.time_indexed.then_some(TIME_COLUMN)
    }

    /// The ordering key values, if the table is time-indexed.
    pub fn time_index(&self) -> Option<Vec<DateTime<Utc>>> {
        if !self.time_indexed {
            return None;
        }
        self.rows.iter().map(|row| row[0].as_time()).collect()
    }
}

/// Serializes as an array of records (`[{column: value, ...}, ...]`).
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Record<'a>(&'a [String], &'a [Cell]);

        impl Serialize for Record<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, cell) in self.0.iter().zip(self.1) {
                    map.serialize_entry(name, cell)?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record(&self.columns, row))?;
        }
        seq.end()
    }
}

/// Interprets a payload as a list of records.
pub(crate) fn as_records<'a>(payload: &'a Value, what: &str) -> Result<&'a [Value], Error> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::malformed(format!("{what}: expected a list, got {}", kind(payload))))
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Table {
        to_table(
            json!([
                {"t": 1_700_000_000, "o": "1.5", "c": 2},
                {"t": 1_700_000_060, "o": "1.75", "c": 3}
            ])
            .as_array()
            .unwrap(),
            Some("t"),
            TimeUnit::Seconds,
            true,
        )
        .unwrap()
    }

    #[test]
    fn accessors() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.columns(), ["time", "o", "c"]);
        assert_eq!(table.key(), Some("time"));
        assert_eq!(table.get(1, "o"), Some(&Cell::Number(1.75)));
        assert_eq!(table.get(2, "o"), None);
        assert_eq!(table.get(0, "missing"), None);
        assert_eq!(
            table.column("c").unwrap(),
            vec![&Cell::Number(2.0), &Cell::Number(3.0)]
        );
        let index = table.time_index().unwrap();
        assert_eq!(index[1].timestamp(), 1_700_000_060);
    }

    #[test]
    fn serializes_as_records() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!([
                {"time": "2023-11-14T22:13:20Z", "o": 1.5, "c": 2},
                {"time": "2023-11-14T22:14:20Z", "o": 1.75, "c": 3}
            ])
        );
    }

    #[test]
    fn as_records_rejects_non_lists() {
        assert!(as_records(&json!([{"a": 1}]), "coins").is_ok());
        let err = as_records(&json!({"a": 1}), "coins").unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }
}
