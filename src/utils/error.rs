//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid JSON config: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to read input directory {path}: {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by a single ingestor for its step file
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: missing column '{column}' in header")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: row {row} has no serial number")]
    MissingSerialNumber { path: PathBuf, row: usize },

    #[error("{path}: row {row} has unparseable timestamp '{value}'")]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("{path}: step '{step}' is not part of the canonical step order")]
    UnknownStep { path: PathBuf, step: String },
}

/// Every error collected from the ingestion phase
#[derive(Error, Debug)]
#[error("{}", format_failures(.errors))]
pub struct IngestFailure {
    pub errors: Vec<IngestError>,
}

fn format_failures(errors: &[IngestError]) -> String {
    let mut message = format!("{} step file(s) failed to ingest", errors.len());
    for err in errors {
        message.push_str(&format!("\n  - {}", err));
    }
    message
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_failure_lists_every_error() {
        let failure = IngestFailure {
            errors: vec![
                IngestError::MissingColumn {
                    path: PathBuf::from("a.csv"),
                    column: "Date".to_string(),
                },
                IngestError::MissingSerialNumber {
                    path: PathBuf::from("b.csv"),
                    row: 4,
                },
            ],
        };

        let message = failure.to_string();
        assert!(message.starts_with("2 step file(s) failed to ingest"));
        assert!(message.contains("\n  - a.csv: missing column 'Date' in header"));
        assert!(message.contains("\n  - b.csv: row 4 has no serial number"));
    }
}
