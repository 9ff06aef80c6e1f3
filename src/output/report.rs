//! CSV report writer.
//!
//! One row per (fromStep, toStep) pair in canonical order, comma-delimited
//! with CRLF terminators:
//!
//! ```text
//! ProjectCode,FromStep,ToStep,1-Days,2-Days,3-Days,4-Days,5-Days,6-Days,7-Days,>7-Days
//! ```

use crate::aggregator::ResultSet;
use crate::utils::config::REPORT_KEY_COLUMNS;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::io::Write;
use std::path::Path;

/// Header row for a result set
pub fn report_header(result: &ResultSet) -> Vec<String> {
    REPORT_KEY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(result.buckets().labels())
        .collect()
}

/// Write the report to a file
///
/// **Public** - main entry point for report output
///
/// # Arguments
/// * `result` - Aggregated result set
/// * `project_code` - Value of the ProjectCode column
/// * `output_path` - Destination CSV file; parent directories are created.
///   The file only appears once the whole report was rendered.
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::CsvFailed` / `OutputError::WriteFailed` - I/O error during write
pub fn write_report(
    result: &ResultSet,
    project_code: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());
    let contents = render_report(result, project_code)?;
    super::commit_outputs(&[super::PendingOutput::new(output_path, contents)])?;

    info!("Report written successfully");
    Ok(())
}

/// Render the report in memory
pub fn render_report(result: &ResultSet, project_code: &str) -> Result<Vec<u8>, OutputError> {
    let mut buf = Vec::new();
    let rows = write_report_to(result, project_code, &mut buf)?;
    debug!("Rendered report: {} rows, {} bytes", rows, buf.len());
    Ok(buf)
}

/// Write the report to any writer, returning the number of data rows
pub fn write_report_to<W: Write>(
    result: &ResultSet,
    project_code: &str,
    output: W,
) -> Result<usize, OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::CRLF)
        .from_writer(output);

    writer.write_record(report_header(result))?;

    let mut rows = 0;
    for (from, to, counts) in result.rows() {
        let mut record = Vec::with_capacity(REPORT_KEY_COLUMNS.len() + counts.len());
        record.push(project_code.to_string());
        record.push(from.to_string());
        record.push(to.to_string());
        record.extend(counts.iter().map(u64::to_string));
        writer.write_record(&record)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
