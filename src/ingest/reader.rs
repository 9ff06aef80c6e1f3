//! Single-file ingestor.
//!
//! Reads one step's CSV extract and turns every row into a partial unit
//! record carrying exactly one step record for that file's step.

use super::discovery::StepFile;
use super::timestamp::parse_completed_at;
use crate::config::ColumnConfig;
use crate::model::{DuplicatePolicy, StepOrder, StepRecord, StepUpdate, UnitRecord};
use crate::utils::error::IngestError;
use log::{debug, warn};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Partial unit records read from one step file
#[derive(Debug, Clone)]
pub struct PartialBatch {
    /// Canonical step name every record in the batch carries
    pub step_name: String,

    /// File the batch was read from
    pub source: PathBuf,

    /// Serial number -> partial unit record
    pub units: HashMap<String, UnitRecord>,

    /// Data rows read
    pub rows: usize,

    /// Rows repeating a serial number with a different timestamp
    pub conflicts: usize,
}

/// Ingest one discovered step file
///
/// **Public** - unit of work run by the ingestion pool
///
/// # Errors
/// * `IngestError::UnknownStep` - Step is not in the canonical order
/// * `IngestError::ReadFailed` - File cannot be opened or read
/// * `IngestError::MissingColumn` - Header lacks a configured column
/// * `IngestError::MissingSerialNumber` / `IngestError::InvalidTimestamp` - Bad row
pub fn ingest_step_file(
    file: &StepFile,
    order: &StepOrder,
    columns: &ColumnConfig,
    policy: DuplicatePolicy,
) -> Result<PartialBatch, IngestError> {
    if !order.contains(&file.step_name) {
        return Err(IngestError::UnknownStep {
            path: file.path.clone(),
            step: file.step_name.clone(),
        });
    }

    debug!("Ingesting step '{}' from {}", file.step_name, file.path.display());

    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&file.path)
        .map_err(|source| IngestError::ReadFailed {
            path: file.path.clone(),
            source,
        })?;

    read_step_rows(reader, &file.path, &file.step_name, columns, policy)
}

/// Parse step rows from any reader
///
/// **Public** - lets callers ingest in-memory extracts; `path` is used for
/// error reporting only.
pub fn read_step_records<R: io::Read>(
    input: R,
    path: &Path,
    step_name: &str,
    columns: &ColumnConfig,
    policy: DuplicatePolicy,
) -> Result<PartialBatch, IngestError> {
    let reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    read_step_rows(reader, path, step_name, columns, policy)
}

fn read_step_rows<R: io::Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
    step_name: &str,
    columns: &ColumnConfig,
    policy: DuplicatePolicy,
) -> Result<PartialBatch, IngestError> {
    let read_failed = |source| IngestError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(read_failed)?.clone();
    let serial_idx = column_index(&headers, &columns.serial_number, path)?;
    let completed_idx = column_index(&headers, &columns.completed_at, path)?;

    let mut batch = PartialBatch {
        step_name: step_name.to_string(),
        source: path.to_path_buf(),
        units: HashMap::new(),
        rows: 0,
        conflicts: 0,
    };

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(read_failed)?;
        let row = index + 1;
        batch.rows += 1;

        let serial = record
            .get(serial_idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IngestError::MissingSerialNumber {
                path: path.to_path_buf(),
                row,
            })?;

        let raw_time = record.get(completed_idx).unwrap_or("");
        let completed_at =
            parse_completed_at(raw_time).ok_or_else(|| IngestError::InvalidTimestamp {
                path: path.to_path_buf(),
                row,
                value: raw_time.to_string(),
            })?;

        let step = StepRecord::new(step_name, completed_at);
        match batch.units.get_mut(serial) {
            None => {
                batch
                    .units
                    .insert(serial.to_string(), UnitRecord::new(serial, step));
            }
            Some(unit) => {
                if unit.set_step(step, policy) == StepUpdate::Conflict {
                    batch.conflicts += 1;
                    warn!(
                        "{}: row {} repeats serial '{}' with a different timestamp ({:?})",
                        path.display(),
                        row,
                        serial,
                        policy
                    );
                }
            }
        }
    }

    debug!(
        "Read {} rows ({} units) for step '{}'",
        batch.rows,
        batch.units.len(),
        step_name
    );

    Ok(batch)
}

fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}
