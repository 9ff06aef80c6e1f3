//! Output writers for the transition-time result set.
//!
//! This module handles writing data to disk in various formats:
//! - CSV report (the primary output)
//! - JSON result dumps
//! - Text summaries
//!
//! Files are rendered in memory first and committed together through
//! [`commit_outputs`], so a failed run leaves no partial output behind.

pub mod json;
pub mod report;
pub mod summary;

// Re-export main functions
pub use json::{read_result, render_result, write_result, ResultDocument};
pub use report::{render_report, report_header, write_report, write_report_to};
pub use summary::generate_text_summary;

use crate::utils::error::OutputError;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate an output path and create its parent directories
fn prepare_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// A rendered output file waiting to be committed
#[derive(Debug, Clone)]
pub struct PendingOutput {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl PendingOutput {
    pub fn new(path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Write every output or none of them
///
/// **Public** - final stage of the report command
///
/// Each file is written to a `.tmp` sibling and renamed into place only once
/// all of them were written. On failure the temporaries, and any output
/// already renamed in this call, are removed.
///
/// # Errors
/// * `OutputError::InvalidPath` - A path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error while writing or renaming
pub fn commit_outputs(outputs: &[PendingOutput]) -> Result<(), OutputError> {
    for output in outputs {
        prepare_path(&output.path)?;
    }

    let mut staged: Vec<PathBuf> = Vec::with_capacity(outputs.len());
    for output in outputs {
        let temp_path = temp_path_for(&output.path);
        if let Err(e) = fs::write(&temp_path, &output.contents) {
            remove_all(&staged);
            remove_all(std::slice::from_ref(&temp_path));
            return Err(OutputError::WriteFailed(e));
        }
        debug!("Staged {} ({} bytes)", temp_path.display(), output.contents.len());
        staged.push(temp_path);
    }

    for (i, (output, temp_path)) in outputs.iter().zip(&staged).enumerate() {
        if let Err(e) = fs::rename(temp_path, &output.path) {
            let committed: Vec<PathBuf> = outputs[..i].iter().map(|o| o.path.clone()).collect();
            remove_all(&committed);
            remove_all(&staged[i..]);
            return Err(OutputError::WriteFailed(e));
        }
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("nested/b.json");

        commit_outputs(&[
            PendingOutput::new(&a, b"first".to_vec()),
            PendingOutput::new(&b, b"second".to_vec()),
        ])
        .unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "first");
        assert_eq!(fs::read_to_string(&b).unwrap(), "second");
        assert!(!temp_path_for(&a).exists());
        assert!(!temp_path_for(&b).exists());
    }

    #[test]
    fn test_directory_target_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");

        let err = commit_outputs(&[
            PendingOutput::new(&a, b"first".to_vec()),
            PendingOutput::new(dir.path(), b"second".to_vec()),
        ])
        .unwrap_err();

        assert!(matches!(err, OutputError::InvalidPath(_)));
        assert!(!a.exists());
    }

    #[test]
    fn test_failed_write_removes_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let b = blocker.join("b.json");

        let err = commit_outputs(&[
            PendingOutput::new(&a, b"first".to_vec()),
            PendingOutput::new(&b, b"second".to_vec()),
        ])
        .unwrap_err();

        assert!(matches!(err, OutputError::WriteFailed(_)));
        assert!(!a.exists());
        assert!(!temp_path_for(&a).exists());
    }
}
