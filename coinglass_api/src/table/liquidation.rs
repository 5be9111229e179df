//! Liquidation map and liquidation heatmap payloads.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{decode_timestamp, Cell, Table, TimeUnit, TIME_COLUMN};
use crate::Error;

/// Columns of the liquidation-map table. The last column is unused by the
/// provider and kept as received.
pub const LIQUIDATION_MAP_COLUMNS: [&str; 4] = ["liqprice", "liqusd", "leverage", "none"];

/// Columns of the heatmap price-tick table.
pub const PRICE_TICK_COLUMNS: [&str; 6] = ["t", "o", "h", "l", "c", "reserved"];

/// Columns of the heatmap liquidation table.
pub const HEATMAP_COLUMNS: [&str; 3] = [TIME_COLUMN, "price", "liqusd"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiquidationMapPayload {
    last_price: f64,
    /// Leverage bucket label to `[liqPrice, liqUsd, leverage, unused]` tuples.
    data: IndexMap<String, Vec<Vec<Value>>>,
}

#[derive(Deserialize)]
struct HeatmapPayload {
    /// `[x, y, liqUsd]`, x indexing `prices` and y indexing `y`.
    liq: Vec<Vec<Value>>,
    prices: Vec<Vec<Value>>,
    y: Vec<Value>,
}

/// Flattens a liquidation map into one table and returns the last price.
///
/// Buckets are concatenated in payload order, entries in bucket order.
pub fn to_liquidation_table(payload: &Value) -> Result<(Table, f64), Error> {
    let payload = LiquidationMapPayload::deserialize(payload)
        .map_err(|e| Error::malformed(format!("liquidation map: {e}")))?;

    let mut rows = Vec::new();
    for (bucket, entries) in &payload.data {
        for (i, entry) in entries.iter().enumerate() {
            rows.push(
                fixed_row(entry, LIQUIDATION_MAP_COLUMNS.len())
                    .map_err(|e| Error::malformed(format!("bucket {bucket:?} entry {i}: {e}")))?,
            );
        }
    }

    let table = Table::from_parts(column_names(&LIQUIDATION_MAP_COLUMNS), rows, false);
    Ok((table, payload.last_price))
}

/// Splits a liquidation heatmap into `(liquidations, price ticks)`.
///
/// Each liquidation triple is joined by position: `x` selects a row of the
/// price ticks, whose `t` is decoded into `time`, and `y` selects an entry of
/// the `y` axis, which becomes `price`.
pub fn to_heatmap_tables(payload: &Value) -> Result<(Table, Table), Error> {
    let payload = HeatmapPayload::deserialize(payload)
        .map_err(|e| Error::malformed(format!("liquidation heatmap: {e}")))?;

    let ticks = payload
        .prices
        .iter()
        .enumerate()
        .map(|(i, tick)| {
            fixed_row(tick, PRICE_TICK_COLUMNS.len())
                .map_err(|e| Error::malformed(format!("price tick {i}: {e}")))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let mut rows = Vec::with_capacity(payload.liq.len());
    for (i, triple) in payload.liq.iter().enumerate() {
        let context = |e: String| Error::malformed(format!("liquidation {i}: {e}"));
        let [x, y, liq_usd] = triple.as_slice() else {
            return Err(context(format!("expected 3 values, got {}", triple.len())));
        };
        let x = position(x, payload.prices.len()).map_err(|e| context(format!("x {e}")))?;
        let y = position(y, payload.y.len()).map_err(|e| context(format!("y {e}")))?;

        let time = decode_timestamp(&payload.prices[x][0], TimeUnit::Auto)
            .map_err(|e| context(e.to_string()))?;
        rows.push(vec![
            Cell::Time(time),
            Cell::from(&payload.y[y]),
            Cell::from(liq_usd),
        ]);
    }

    let liquidations = Table::from_parts(column_names(&HEATMAP_COLUMNS), rows, true);
    let prices = Table::from_parts(column_names(&PRICE_TICK_COLUMNS), ticks, false);
    Ok((liquidations, prices))
}

fn fixed_row(values: &[Value], arity: usize) -> Result<Vec<Cell>, String> {
    if values.len() != arity {
        return Err(format!("expected {arity} values, got {}", values.len()));
    }
    Ok(values.iter().map(Cell::from).collect())
}

/// Reads a positional index and checks it against the axis length.
fn position(value: &Value, len: usize) -> Result<usize, String> {
    let index = value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
        .ok_or_else(|| format!("index {value} is not a non-negative integer"))?;
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| format!("index {index} out of range for axis of length {len}"))
}

fn column_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
