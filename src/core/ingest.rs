// repairlog - core/ingest.rs
//
// Header-driven reading of the exported maintenance log.
// Core layer: accepts any Read trait object; the app layer opens files.

use crate::core::model::MaintenanceRecord;
use crate::util::constants;
use crate::util::error::IngestError;
use std::io::Read;
use std::path::Path;

/// Positions of the known columns within the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    area: Option<usize>,
    machine_name: Option<usize>,
    mechanism_node: Option<usize>,
    comments: Option<usize>,
}

impl ColumnMap {
    /// A header that appears more than once maps to its last occurrence.
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().collect::<Vec<_>>().iter().rposition(|h| *h == name);
        Self {
            area: find(constants::COLUMN_AREA),
            machine_name: find(constants::COLUMN_MACHINE_NAME),
            mechanism_node: find(constants::COLUMN_MECHANISM_NODE),
            comments: find(constants::COLUMN_COMMENTS),
        }
    }
}

/// Cell value at `idx`, or `default` when the column or the cell is absent.
fn cell(record: &csv::StringRecord, idx: Option<usize>, default: &str) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or(default).to_string()
}

/// Read every data row of a comma-separated maintenance log.
///
/// The first row is the header. Rows may be shorter or longer than the
/// header; missing cells take the same default as a missing column.
/// `source` is used for error messages only.
pub fn read_records<R: Read>(
    reader: R,
    source: &Path,
) -> Result<Vec<MaintenanceRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| IngestError::Csv {
        path: source.to_path_buf(),
        source: e,
    })?;
    let columns = ColumnMap::from_headers(headers);

    tracing::debug!(
        file = %source.display(),
        headers = headers.len(),
        has_comments = columns.comments.is_some(),
        "CSV header parsed"
    );
    if columns.comments.is_none() {
        tracing::warn!(
            file = %source.display(),
            column = constants::COLUMN_COMMENTS,
            "Input has no comments column; no instructions can be extracted"
        );
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| IngestError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;

        records.push(MaintenanceRecord {
            area: cell(&record, columns.area, constants::UNKNOWN_FIELD),
            machine_name: cell(&record, columns.machine_name, constants::UNKNOWN_FIELD),
            mechanism_node: cell(&record, columns.mechanism_node, constants::UNKNOWN_FIELD),
            comments: cell(&record, columns.comments, ""),
        });
    }

    tracing::debug!(
        file = %source.display(),
        rows = records.len(),
        "CSV rows read"
    );

    Ok(records)
}
