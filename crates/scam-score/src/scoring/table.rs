use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell of an input or normalized table.
///
/// `Missing` doubles as the not-a-number sentinel: absent cells and cells whose
/// text could not be resolved to a number both end up here. `Bool` counts as 1 or 0
/// wherever a number is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Renders the cell for delimited-text export. Missing values become empty fields.
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Bool(flag) => flag.to_string(),
            Cell::Number(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
        }
    }
}

/// Rectangular, row-major table handed to the engine by the ingest collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with `Missing` and dropping surplus cells.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Builds a table from keyed records, keeping columns in first-seen order.
    pub fn from_records(records: Vec<BTreeMap<String, Cell>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|existing| existing == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut table = Self::new(columns);
        for mut record in records {
            let row = table
                .columns
                .iter()
                .map(|column| record.remove(column).unwrap_or(Cell::Missing))
                .collect();
            table.rows.push(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the table into column-major form.
    pub(crate) fn into_columns(self) -> Vec<(String, Vec<Cell>)> {
        let mut columns: Vec<(String, Vec<Cell>)> = self
            .columns
            .into_iter()
            .map(|name| (name, Vec::with_capacity(self.rows.len())))
            .collect();

        for row in self.rows {
            for (index, cell) in row.into_iter().enumerate() {
                columns[index].1.push(cell);
            }
        }

        columns
    }
}

/// One normalized column: trimmed name plus cleaned values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Column-major table produced by the normalizer and consumed by every scoring stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    columns: Vec<Column>,
    len: usize,
}

impl NormalizedTable {
    pub(crate) fn new(columns: Vec<Column>, len: usize) -> Self {
        Self { columns, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Case-insensitive lookup on the trimmed column name; the first match wins.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Every column whose name contains `fragment`, ignoring ASCII case.
    pub fn columns_containing<'a>(
        &'a self,
        fragment: &'a str,
    ) -> impl Iterator<Item = &'a Column> + 'a {
        let needle = fragment.to_ascii_lowercase();
        self.columns
            .iter()
            .filter(move |column| column.name.to_ascii_lowercase().contains(&needle))
    }

    pub fn row(&self, index: usize) -> Vec<(&str, &Cell)> {
        self.columns
            .iter()
            .filter_map(|column| {
                column
                    .values
                    .get(index)
                    .map(|cell| (column.name.as_str(), cell))
            })
            .collect()
    }
}
