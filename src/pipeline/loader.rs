//! Raw row loader for CSV files
//!
//! Every column is read as text; typed parsing and issue reporting belong
//! to the record store, not the loader.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::store::RawRow;

/// Load raw rows from a CSV file. Null and empty cells are omitted from
/// the row mapping, so the store sees them as missing.
pub fn load_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match extension.as_str() {
        // infer_schema_length 0 keeps every column as a string column
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
            .collect()
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv",
            extension
        ),
    };

    dataframe_to_rows(&df)
}

fn dataframe_to_rows(df: &DataFrame) -> Result<Vec<RawRow>> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().to_string();
        let values = column
            .str()
            .with_context(|| format!("Column '{}' was not read as text", name))?;
        columns.push((name, values));
    }

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut row = RawRow::new();
        for (name, values) in &columns {
            if let Some(value) = values.get(i) {
                if !value.is_empty() {
                    row.insert(name.clone(), value.to_string());
                }
            }
        }
        rows.push(row);
    }

    Ok(rows)
}
