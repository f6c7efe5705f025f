use super::Delimiter;
use crate::scoring::{CreditDecision, ScoredTable, DERIVED_COLUMNS};
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write scored export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode scored export: {0}")]
    Csv(#[from] csv::Error),
}

pub fn export_path<P: AsRef<Path>>(
    scored: &ScoredTable,
    path: P,
    delimiter: Delimiter,
    decision: Option<CreditDecision>,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    export_writer(scored, file, delimiter, decision)
}

/// Writes normalized input columns followed by the derived columns, one row per
/// record, returning the number of records written.
pub fn export_writer<W: Write>(
    scored: &ScoredTable,
    writer: W,
    delimiter: Delimiter,
    decision: Option<CreditDecision>,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(writer);

    let columns = scored.normalized().columns();
    let header = columns
        .iter()
        .map(|column| column.name.as_str())
        .chain(DERIVED_COLUMNS);
    csv_writer.write_record(header)?;

    let indices = scored.indices(decision);
    for index in &indices {
        let inputs = columns.iter().map(|column| {
            column
                .values
                .get(*index)
                .map(|cell| cell.render())
                .unwrap_or_default()
        });
        let derived = scored.assessments()[*index].render();
        csv_writer.write_record(inputs.chain(derived))?;
    }

    csv_writer.flush()?;
    Ok(indices.len())
}
