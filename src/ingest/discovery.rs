//! Locate step extracts in the input directory.
//!
//! A step's file name is derived from the configured template and the step's
//! short code. Directories, non-CSV entries and names matching no short code
//! are skipped.

use crate::config::ProcessConfig;
use crate::utils::config::CSV_EXTENSION;
use crate::utils::error::ConfigError;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A discovered step extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFile {
    /// Short code used in the file name
    pub short_name: String,

    /// Canonical step name the rows belong to
    pub step_name: String,

    pub path: PathBuf,
}

/// Scan `input_dir` for the extracts named by `config`
///
/// **Public** - main entry point for file discovery
///
/// # Returns
/// Matched files in short-code order. Short codes without a file are logged
/// and left out.
///
/// # Errors
/// * `ConfigError::InputDirUnreadable` - Directory cannot be listed
pub fn discover_step_files(
    input_dir: impl AsRef<Path>,
    config: &ProcessConfig,
) -> Result<Vec<StepFile>, ConfigError> {
    let input_dir = input_dir.as_ref();
    let unreadable = |source| ConfigError::InputDirUnreadable {
        path: input_dir.to_path_buf(),
        source,
    };

    let wanted: HashMap<String, &str> = config
        .step_order_short
        .iter()
        .map(|short| (config.file_name_for(short), short.as_str()))
        .collect();

    let mut found: HashMap<&str, PathBuf> = HashMap::new();
    for entry in std::fs::read_dir(input_dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();

        if path.is_dir() || !has_csv_extension(&path) {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match wanted.get(file_name) {
            Some(short) => {
                debug!("Matched step '{}' to {}", short, path.display());
                found.insert(*short, path);
            }
            None => debug!("Ignoring unmatched file: {}", path.display()),
        }
    }

    let mut files = Vec::with_capacity(found.len());
    for short in &config.step_order_short {
        let Some(path) = found.remove(short.as_str()) else {
            warn!(
                "No extract found for step '{}' (expected '{}')",
                short,
                config.file_name_for(short)
            );
            continue;
        };
        let Some(step_name) = config.step_name_for(short) else {
            warn!("Step '{}' has no name mapping, skipping {}", short, path.display());
            continue;
        };
        files.push(StepFile {
            short_name: short.clone(),
            step_name: step_name.to_string(),
            path,
        });
    }

    Ok(files)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config() -> ProcessConfig {
        ProcessConfig::from_toml_str(
            r#"
step_order = ["Alpha", "Beta", "Gamma"]
step_order_short = ["A", "B", "C"]
file_template = "extract-{step}.csv"

[name_map]
A = "Alpha"
B = "Beta"
C = "Gamma"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_discovers_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("extract-B.csv"), "").unwrap();
        fs::write(dir.path().join("extract-A.csv"), "").unwrap();
        fs::write(dir.path().join("extract-Z.csv"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("extract-C.csv")).unwrap();

        let files = discover_step_files(dir.path(), &config()).unwrap();

        let shorts: Vec<_> = files.iter().map(|f| f.short_name.as_str()).collect();
        assert_eq!(shorts, vec!["A", "B"]);
        assert_eq!(files[0].step_name, "Alpha");
        assert_eq!(files[1].path, dir.path().join("extract-B.csv"));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover_step_files(&missing, &config()),
            Err(ConfigError::InputDirUnreadable { .. })
        ));
    }
}
