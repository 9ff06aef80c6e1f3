//! JSON result writer.
//!
//! Writes the result set with run metadata, versioned so the layout can evolve.

use crate::aggregator::ResultSet;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Schema version for compatibility checking
    pub version: String,

    pub project_code: String,

    /// Units that entered aggregation
    pub units: usize,

    /// Timestamp when the document was generated
    pub generated_at: String,

    pub result: ResultSet,
}

impl ResultDocument {
    pub fn new(result: ResultSet, project_code: impl Into<String>, units: usize) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            project_code: project_code.into(),
            units,
            generated_at: Utc::now().to_rfc3339(),
            result,
        }
    }
}

/// Write a result document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_result(
    document: &ResultDocument,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON result to: {}", output_path.display());
    let contents = render_result(document)?;
    super::commit_outputs(&[super::PendingOutput::new(output_path, contents)])?;

    Ok(())
}

/// Serialize a result document to pretty JSON bytes
pub fn render_result(document: &ResultDocument) -> Result<Vec<u8>, OutputError> {
    serde_json::to_vec_pretty(document).map_err(OutputError::SerializationFailed)
}

/// Read a result document from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_result(input_path: impl AsRef<Path>) -> Result<ResultDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading JSON result from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: ResultDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Result loaded: version {}, {} steps",
        document.version,
        document.result.step_order.len()
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{DayBuckets, PairHistogram};
    use crate::model::StepOrder;

    #[test]
    fn test_write_creates_parent_dirs_and_reads_back() {
        let order = StepOrder::new(["A", "B"]).unwrap();
        let mut histogram = PairHistogram::new(order.pair_count(), DayBuckets::new(7));
        histogram.record(order.pair_index(0, 1), 12);
        let document = ResultDocument::new(ResultSet::from_histogram(&order, &histogram), "N199", 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/result.json");
        write_result(&document, &path).unwrap();

        let loaded = read_result(&path).unwrap();
        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.result.counts("A", "B").unwrap()[7], 1);
        assert_eq!(loaded.result.step_order, vec!["A", "B"]);
    }

    #[test]
    fn test_write_rejects_empty_path() {
        let order = StepOrder::new(["A"]).unwrap();
        let histogram = PairHistogram::new(order.pair_count(), DayBuckets::new(7));
        let document = ResultDocument::new(ResultSet::from_histogram(&order, &histogram), "N199", 0);
        assert!(write_result(&document, "").is_err());
    }
}
