//! Output formatting for different formats.

pub mod files;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use rapiddns::{Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::cli::args::Column;

/// Header row for CSV output.
pub const CSV_HEADER: [&str; 5] = ["Subdomain", "Type", "Value", "Date", "Timestamp"];

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// CSV with a header row
    Csv,
    /// Tab-separated subdomain, type, value and date
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Write a record set in the given format.
pub fn write_records<W: Write>(out: &mut W, set: &RecordSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, set)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(CSV_HEADER)?;
            for r in set {
                writer.write_record([&r.subdomain, &r.record_type, &r.value, &r.date, &r.timestamp])?;
            }
            writer.flush()?;
        }
        OutputFormat::Text => {
            for r in set {
                writeln!(out, "{}\t{}\t{}\t{}", r.subdomain, r.record_type, r.value, r.date)?;
            }
        }
    }
    Ok(())
}

/// Unique non-empty values of one column, sorted.
pub fn column_values(set: &RecordSet, column: Column) -> Vec<String> {
    let pick = |r: &Record| -> Option<String> {
        let value = match column {
            Column::Subdomain => &r.subdomain,
            Column::Type => &r.record_type,
            Column::Value => &r.value,
            Column::Ip => {
                r.as_ip()?;
                &r.value
            }
        };
        (!value.is_empty()).then(|| value.clone())
    };

    set.iter()
        .filter_map(pick)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Write column values: a JSON array for json, one per line otherwise.
pub fn write_column<W: Write>(out: &mut W, values: &[String], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, values)?;
        writeln!(out)?;
    } else {
        for v in values {
            writeln!(out, "{v}")?;
        }
    }
    Ok(())
}

/// Console messages for a command run.
///
/// Progress and status text goes to stderr so stdout stays machine-readable.
/// In silent mode only written file paths are printed, to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    pub silent: bool,
}

impl Console {
    pub const fn new(silent: bool) -> Self {
        Self { silent }
    }

    /// Informational line, suppressed in silent mode.
    pub fn info(&self, message: impl std::fmt::Display) {
        if !self.silent {
            eprintln!("{message}");
        }
    }

    /// Warning line on stderr, printed in silent mode too.
    pub fn warn(&self, message: impl std::fmt::Display) {
        eprintln!("{} {message}", "Warning:".yellow().bold());
    }

    /// Announce a written file.
    pub fn written(&self, path: &Path, message: impl std::fmt::Display) {
        if self.silent {
            println!("{}", path.display());
        } else {
            eprintln!("{message} {}", path.display().to_string().cyan());
        }
    }
}
