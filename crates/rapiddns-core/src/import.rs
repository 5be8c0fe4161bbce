//! CSV-to-RecordSet adapter for export files.
//!
//! Columns are positional: subdomain, value, type, date. Export CSVs usually
//! start with a header, but some ship without one; the first row is skipped
//! as a header only if one of its cells is a known column name.

use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::types::{Record, RecordSet};

const HEADER_TOKENS: [&str; 4] = ["subdomain", "type", "value", "date"];

const SUBDOMAIN: usize = 0;
const VALUE: usize = 1;
const RECORD_TYPE: usize = 2;
const DATE: usize = 3;

fn record(row: &csv::StringRecord) -> Record {
    let cell = |idx: usize| row.get(idx).unwrap_or_default().to_string();
    Record {
        record_type: cell(RECORD_TYPE),
        value: cell(VALUE),
        timestamp: String::new(),
        date: cell(DATE),
        subdomain: cell(SUBDOMAIN),
    }
}

fn is_header(row: &csv::StringRecord) -> bool {
    row.iter()
        .any(|cell| HEADER_TOKENS.contains(&cell.trim().to_lowercase().as_str()))
}

impl RecordSet {
    /// Parse an export CSV from any reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = reader.records();
        let mut records = Vec::new();

        if let Some(first) = rows.next().transpose()? {
            if !is_header(&first) {
                records.push(record(&first));
            }
        }
        for row in rows {
            records.push(record(&row?));
        }

        Ok(Self::from_records("ok", records))
    }

    /// Parse an export CSV file
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }
}
