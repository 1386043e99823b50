// ============================================================
// Layer 4 — CSV Record Loader
// ============================================================
// Loads headerless tweet files of the form
//
//     id,entity,sentiment,text
//     2401,Borderlands,Positive,"im getting on borderlands and i will murder you all ,"
//
// using the `csv` crate, which handles quoted fields, embedded
// commas and embedded newlines for us.
//
// Parsing rules:
//   - An empty cell is a null cell (None)
//   - `id` is the only typed column: a cell that does not parse
//     as an integer becomes None instead of failing the load
//   - Short rows get None for the missing trailing columns,
//     extra columns are ignored
//   - Bytes that are not valid UTF-8 are decoded lossily
//
// Whatever the file looks like, the loader always reports the
// same four-column schema.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::record::RawRecord;
use crate::domain::traits::RecordSource;

/// The type a column is read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Str,
}

/// Name and type of every column, in file order
pub type Schema = [(&'static str, ColumnType)];

pub const SCHEMA: [(&str, ColumnType); 4] = [
    ("id",        ColumnType::Int),
    ("entity",    ColumnType::Str),
    ("sentiment", ColumnType::Str),
    ("text",      ColumnType::Str),
];

/// Loads one headerless CSV file of tweet records.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The fixed schema every loaded record follows
    pub fn schema(&self) -> &'static Schema {
        &SCHEMA
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            // Row width varies in the wild; missing cells become None below
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;

        let mut records = Vec::new();
        for (line, row) in reader.byte_records().enumerate() {
            let row = row.with_context(|| {
                format!("Malformed CSV in '{}' at record {}", self.path.display(), line + 1)
            })?;
            records.push(parse_row(&row));
        }

        tracing::debug!(
            "Loaded {} records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Turn one CSV row into a RawRecord, mapping empty cells to None.
fn parse_row(row: &csv::ByteRecord) -> RawRecord {
    let cell = |i: usize| -> Option<String> {
        row.get(i)
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    };

    RawRecord {
        id:        cell(0).and_then(|s| s.trim().parse::<i64>().ok()),
        entity:    cell(1),
        sentiment: cell(2),
        text:      cell(3),
    }
}
