//! Per-instrument, per-exchange breakdowns.
//!
//! Some endpoints return one record per instrument where certain fields hold a
//! list of per-exchange mappings:
//!
//! ```json
//! {"symbol": "BTC", "uMarginList": [{"exchangeName": "Binance", "rate": 0.01}]}
//! ```
//!
//! These are flattened into a [`MultiKeyTable`] whose rows are
//! `(field, exchange, metric)` composite keys and whose columns are the
//! instruments.
//!
//! Scalar instrument-level fields are dropped from the output, and when two
//! instruments share a group label the later one replaces the earlier one's
//! column. A `null` group label becomes a column named `null`.

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use super::{kind, Cell, Table};
use crate::Error;

/// Key naming the exchange inside each per-exchange mapping.
pub const EXCHANGE_NAME_KEY: &str = "exchangeName";

/// Row label of a [`MultiKeyTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    /// Name of the list-valued field on the instrument record.
    pub category: String,
    pub exchange: String,
    pub metric: String,
}

impl CompositeKey {
    pub fn new(category: &str, exchange: &str, metric: &str) -> Self {
        Self {
            category: category.to_string(),
            exchange: exchange.to_string(),
            metric: metric.to_string(),
        }
    }
}

/// A field of an instrument record, tagged by shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Scalar(&'a Value),
    ExchangeList(&'a [Value]),
}

impl<'a> From<&'a Value> for FieldValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Array(entries) => FieldValue::ExchangeList(entries),
            other => FieldValue::Scalar(other),
        }
    }
}

/// Wide table with composite-key rows and one column per instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiKeyTable {
    keys: Vec<CompositeKey>,
    columns: IndexMap<String, IndexMap<CompositeKey, Cell>>,
}

impl MultiKeyTable {
    /// Row index: union of all composite keys, in first-seen order.
    pub fn keys(&self) -> &[CompositeKey] {
        &self.keys
    }

    /// Instrument labels, in column order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Value for `key` in the instrument column `group`; `None` when the
    /// instrument has no entry for that key.
    pub fn get(&self, group: &str, key: &CompositeKey) -> Option<&Cell> {
        self.columns.get(group)?.get(key)
    }

    /// All entries of one instrument column.
    pub fn column(&self, group: &str) -> Option<&IndexMap<CompositeKey, Cell>> {
        self.columns.get(group)
    }

    /// Flattens into a [`Table`] with columns `category, exchange, metric`
    /// followed by one column per instrument.
    pub fn to_table(&self) -> Table {
        let mut names = vec![
            "category".to_string(),
            "exchange".to_string(),
            "metric".to_string(),
        ];
        names.extend(self.columns.keys().cloned());

        let rows = self
            .keys
            .iter()
            .map(|key| {
                let mut row = vec![
                    Cell::Text(key.category.clone()),
                    Cell::Text(key.exchange.clone()),
                    Cell::Text(key.metric.clone()),
                ];
                row.extend(
                    self.columns
                        .values()
                        .map(|column| column.get(key).cloned().unwrap_or(Cell::Null)),
                );
                row
            })
            .collect();

        Table::from_parts(names, rows, false)
    }
}

/// Builds a [`MultiKeyTable`] from instrument records, labelling each
/// instrument's column with the value of `group_key_field`.
pub fn to_multi_key_table(records: &[Value], group_key_field: &str) -> Result<MultiKeyTable, Error> {
    let mut columns: IndexMap<String, IndexMap<CompositeKey, Cell>> = IndexMap::new();

    for (i, record) in records.iter().enumerate() {
        let record = record.as_object().ok_or_else(|| {
            Error::malformed(format!("instrument {i}: expected a mapping, got {}", kind(record)))
        })?;
        let label = group_label(record, group_key_field)
            .map_err(|e| Error::malformed(format!("instrument {i}: {e}")))?;
        let entries =
            flatten_instrument(record).map_err(|e| Error::malformed(format!("instrument {i}: {e}")))?;

        if columns.insert(label.clone(), entries).is_some() {
            tracing::debug!("instrument label {:?} seen twice, keeping the later one", label);
        }
    }

    let mut keys: IndexSet<CompositeKey> = IndexSet::new();
    for column in columns.values() {
        keys.extend(column.keys().cloned());
    }

    Ok(MultiKeyTable {
        keys: keys.into_iter().collect(),
        columns,
    })
}

fn group_label(record: &Map<String, Value>, field: &str) -> Result<String, String> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => Ok(v.to_string()),
        Some(other) => Err(format!("group key {field:?} is a {}", kind(other))),
        None => Err(format!("missing group key {field:?}")),
    }
}

/// Emits `(field, exchange, metric) -> value` for every list-valued field.
fn flatten_instrument(record: &Map<String, Value>) -> Result<IndexMap<CompositeKey, Cell>, String> {
    let mut flattened = IndexMap::new();

    for (field, value) in record {
        let FieldValue::ExchangeList(entries) = FieldValue::from(value) else {
            continue;
        };
        for entry in entries {
            let entry = entry
                .as_object()
                .ok_or_else(|| format!("{field:?}: expected exchange mappings, got {}", kind(entry)))?;
            let exchange = entry
                .get(EXCHANGE_NAME_KEY)
                .and_then(Value::as_str)
                .ok_or_else(|| format!("{field:?}: entry without {EXCHANGE_NAME_KEY:?}"))?;
            for (metric, value) in entry {
                if metric == EXCHANGE_NAME_KEY {
                    continue;
                }
                flattened.insert(CompositeKey::new(field, exchange, metric), Cell::from(value));
            }
        }
    }

    Ok(flattened)
}
