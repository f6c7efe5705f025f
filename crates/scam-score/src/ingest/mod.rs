//! Delimited-text ingestion and export around the scoring engine.

mod export;

pub use export::{export_path, export_writer, ExportError};

use crate::scoring::normalizer::normalize_column_name;
use crate::scoring::schema;
use crate::scoring::{Cell, RecordTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Field separators accepted for applicant exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Delimiter::Comma => ",",
            Delimiter::Semicolon => ";",
            Delimiter::Tab => "\\t",
            Delimiter::Pipe => "|",
        };
        f.write_str(label)
    }
}

impl FromStr for Delimiter {
    type Err = IngestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "," => return Ok(Delimiter::Comma),
            ";" => return Ok(Delimiter::Semicolon),
            "\t" => return Ok(Delimiter::Tab),
            "|" => return Ok(Delimiter::Pipe),
            _ => {}
        }

        match raw.trim().to_ascii_lowercase().as_str() {
            "comma" => Ok(Delimiter::Comma),
            "semicolon" => Ok(Delimiter::Semicolon),
            "tab" | "\\t" => Ok(Delimiter::Tab),
            "pipe" => Ok(Delimiter::Pipe),
            _ => Err(IngestError::UnsupportedDelimiter(raw.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read applicant export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported delimiter '{0}', expected one of ',', ';', tab, '|'")]
    UnsupportedDelimiter(String),
    #[error("applicant export has no header row")]
    MissingHeader,
}

pub struct CsvIngest;

impl CsvIngest {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        delimiter: Delimiter,
    ) -> Result<RecordTable, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, delimiter)
    }

    /// Reads a header row plus records. Each non-empty cell that parses as a plain
    /// number is typed numeric with its sign intact; everything else, and every cell
    /// of an identifier column, is kept as text for the normalizer.
    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: Delimiter,
    ) -> Result<RecordTable, IngestError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect();
        if headers.iter().all(|header| header.trim().is_empty()) {
            return Err(IngestError::MissingHeader);
        }

        let identifiers: Vec<bool> = headers
            .iter()
            .map(|header| schema::is_identifier(&normalize_column_name(header)))
            .collect();

        let mut table = RecordTable::new(headers);
        for record in csv_reader.records() {
            let record = record?;
            let cells = record
                .iter()
                .enumerate()
                .map(|(index, raw)| {
                    to_cell(raw, identifiers.get(index).copied().unwrap_or(false))
                })
                .collect();
            table.push_row(cells);
        }

        debug!(
            columns = table.columns().len(),
            rows = table.len(),
            %delimiter,
            "parsed applicant export"
        );

        Ok(table)
    }
}

fn to_cell(raw: &str, identifier: bool) -> Cell {
    if raw.is_empty() {
        return Cell::Missing;
    }

    if !identifier {
        if let Ok(value) = raw.parse::<f64>() {
            if value.is_finite() {
                return Cell::Number(value);
            }
        }
    }

    Cell::Text(raw.to_string())
}
