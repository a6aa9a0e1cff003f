//! Reading the listing file into untyped rows

use crate::config::ColumnsConfig;
use crate::error::LoadError;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// One row of the listing file, keyed by header name.
///
/// Empty cells are absent, so `get` returns `None` for both a missing column
/// and an empty value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

fn column_names(columns: &ColumnsConfig) -> [&str; 10] {
    [
        &columns.id,
        &columns.title,
        &columns.street,
        &columns.district,
        &columns.lat,
        &columns.lon,
        &columns.rent,
        &columns.admin_fee,
        &columns.area,
        &columns.url,
    ]
}

/// Read every row of the CSV file at `path`, in file order.
///
/// All columns are read as text; typing is left to the normalizer. Rows with
/// no non-blank cell are skipped.
pub fn read_rows(path: &Path, columns: &ColumnsConfig) -> Result<Vec<RawRow>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let unreadable = |source: PolarsError| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    // Schema inference over zero rows types every column as a string.
    // Over-long rows are truncated to the header and invalid UTF-8 becomes U+FFFD.
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .with_truncate_ragged_lines(true)
        .with_encoding(CsvEncoding::LossyUtf8)
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(unreadable)?;

    if df.column(&columns.id).is_err() {
        return Err(LoadError::MissingColumn(columns.id.clone()));
    }

    let mut present: Vec<(&str, &StringChunked)> = Vec::new();
    for name in column_names(columns) {
        match df.column(name) {
            Ok(series) => present.push((name, series.str().map_err(unreadable)?)),
            Err(_) => warn!("Column '{}' missing from {:?}", name, path),
        }
    }

    let rows: Vec<RawRow> = (0..df.height())
        .map(|idx| {
            let mut row = RawRow::default();
            for (name, values) in &present {
                if let Some(value) = values.get(idx).filter(|v| !v.trim().is_empty()) {
                    row.insert(name, value);
                }
            }
            row
        })
        .filter(|row| !row.is_empty())
        .collect();

    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}
