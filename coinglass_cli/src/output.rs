use std::io::Write;

use anyhow::Result;
use coinglass_api::{Cell, Table};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

/// A table rendered to strings: one header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl From<&Table> for Grid {
    fn from(table: &Table) -> Self {
        Self {
            header: table.columns().to_vec(),
            rows: table
                .rows()
                .iter()
                .map(|row| row.iter().map(format_cell).collect())
                .collect(),
        }
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        other => other.to_string(),
    }
}

// -- Table output --

fn build(grid: &Grid) -> tabled::Table {
    let mut builder = Builder::default();
    builder.push_record(grid.header.clone());
    for row in &grid.rows {
        builder.push_record(row.clone());
    }
    builder.build()
}

pub fn render_table(grid: &Grid) -> String {
    build(grid).to_string()
}

// -- Markdown output --

pub fn render_markdown(grid: &Grid) -> String {
    let mut table = build(grid);
    table.with(Style::markdown());
    table.to_string()
}

// -- CSV output --

pub fn write_csv<W: Write>(grid: &Grid, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&grid.header)?;
    for row in &grid.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Prints a grid in a text format. JSON goes through [`print_json`] instead,
/// so callers can keep native types there.
pub fn print_grid(grid: &Grid, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_table(grid)),
        OutputFormat::Markdown => println!("{}", render_markdown(grid)),
        OutputFormat::Csv => write_csv(grid, std::io::stdout())?,
        OutputFormat::Json => print_json(&grid_records(grid)),
    }
    Ok(())
}

fn grid_records(grid: &Grid) -> Vec<serde_json::Map<String, serde_json::Value>> {
    grid.rows
        .iter()
        .map(|row| {
            grid.header
                .iter()
                .cloned()
                .zip(row.iter().cloned().map(serde_json::Value::String))
                .collect()
        })
        .collect()
}

/// Prints a normalized table in any format.
pub fn print_table(table: &Table, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(table);
            Ok(())
        }
        _ => print_grid(&Grid::from(table), format),
    }
}

#[cfg(test)]
mod tests {
    use coinglass_api::table::to_table;
    use coinglass_api::TimeUnit;
    use serde_json::json;

    use super::*;

    fn sample() -> Table {
        let records = json!([
            {"t": 1_700_000_000, "o": "1.5", "c": "2"},
            {"t": 1_700_000_060, "o": "2.25", "c": ""}
        ]);
        to_table(records.as_array().unwrap(), Some("t"), TimeUnit::Auto, true).unwrap()
    }

    #[test]
    fn grid_from_table() {
        let grid = Grid::from(&sample());
        assert_eq!(grid.header, ["time", "o", "c"]);
        assert_eq!(grid.rows[0], ["2023-11-14 22:13:20", "1.5", "2"]);
        // nulls render as empty cells
        assert_eq!(grid.rows[1][2], "");
    }

    #[test]
    fn csv_headers_and_rows() {
        let mut buf = Vec::new();
        write_csv(&Grid::from(&sample()), &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "time,o,c");
        assert_eq!(lines[1], "2023-11-14 22:13:20,1.5,2");
        assert_eq!(lines[2], "2023-11-14 22:14:20,2.25,");
    }

    #[test]
    fn markdown_structure() {
        let md = render_markdown(&Grid::from(&sample()));
        assert!(md.contains('|'));
        assert!(md.contains("---"));
        let header_line = md.lines().next().unwrap();
        assert!(header_line.contains("time"));
        assert!(header_line.contains("o"));
        assert_eq!(md.lines().count(), 4);
    }

    #[test]
    fn plain_table_contains_values() {
        let text = render_table(&Grid::from(&sample()));
        assert!(text.contains("2023-11-14 22:14:20"));
        assert!(text.contains("2.25"));
    }

    #[test]
    fn manual_grid() {
        let mut grid = Grid::new(["coin"]);
        grid.push(vec!["BTC".to_string()]);
        grid.push(vec!["ETH".to_string()]);
        let mut buf = Vec::new();
        write_csv(&grid, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "coin\nBTC\nETH\n");
    }

    #[test]
    fn grid_json_records_follow_header() {
        let mut grid = Grid::new(["exchange", "pair"]);
        grid.push(vec!["OKX".to_string(), "BTC-USDT-SWAP".to_string()]);
        let records = grid_records(&grid);
        assert_eq!(
            serde_json::Value::Array(records.into_iter().map(Into::into).collect()),
            json!([{"exchange": "OKX", "pair": "BTC-USDT-SWAP"}])
        );
    }

    #[test]
    fn json_is_array_of_records() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["o"], json!(1.5));
    }
}
