//! Process configuration: canonical step order, file mapping and pipeline knobs.
//!
//! Loaded from TOML (or JSON when the file extension is `.json`).
//!
//! ```toml
//! project_code = "N199"
//! step_order = ["Laser Mark", "CNC Finish", "Anodize", "Final QC"]
//! step_order_short = ["LM", "CNC", "AN", "FQC"]
//!
//! [name_map]
//! LM = "Laser Mark"
//! CNC = "CNC Finish"
//! AN = "Anodize"
//! FQC = "Final QC"
//!
//! [columns]
//! serial_number = "Serial Number"
//! completed_at = "Date"
//!
//! [pipeline]
//! workers = 24
//! max_open_files = 4
//! bucket_boundary = 7
//! duplicate_policy = "overwrite"
//! elapsed_policy = "fold_into_first"
//! ```

use crate::aggregator::ElapsedPolicy;
use crate::model::{DuplicatePolicy, StepOrder};
use crate::utils::config::{
    DEFAULT_BUCKET_BOUNDARY, DEFAULT_COMPLETED_AT_COLUMN, DEFAULT_FILE_TEMPLATE,
    DEFAULT_MAX_OPEN_FILES, DEFAULT_PROJECT_CODE, DEFAULT_SERIAL_COLUMN, DEFAULT_WORKERS,
    STEP_PLACEHOLDER,
};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Top-level process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Value of the first report column
    #[serde(default = "default_project_code", alias = "ProjectCode")]
    pub project_code: String,

    /// Canonical step names in manufacturing order
    #[serde(alias = "StepOrder")]
    pub step_order: Vec<String>,

    /// Short codes used to locate step files, in order
    #[serde(alias = "StepOrderShort")]
    pub step_order_short: Vec<String>,

    /// Short code -> canonical step name
    #[serde(alias = "NameMap")]
    pub name_map: BTreeMap<String, String>,

    /// Step file name template containing `{step}`
    #[serde(default = "default_file_template")]
    pub file_template: String,

    #[serde(default)]
    pub columns: ColumnConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Header names of the columns read from each step extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_serial_column")]
    pub serial_number: String,

    #[serde(default = "default_completed_at_column")]
    pub completed_at: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            serial_number: default_serial_column(),
            completed_at: default_completed_at_column(),
        }
    }
}

/// Concurrency and aggregation knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Aggregation worker pool size
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum number of step files ingested at once
    #[serde(default = "default_max_open_files")]
    pub max_open_files: usize,

    /// Number of exact-day buckets before the overflow bucket
    #[serde(default = "default_bucket_boundary")]
    pub bucket_boundary: usize,

    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    #[serde(default)]
    pub elapsed_policy: ElapsedPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_open_files: DEFAULT_MAX_OPEN_FILES,
            bucket_boundary: DEFAULT_BUCKET_BOUNDARY,
            duplicate_policy: DuplicatePolicy::default(),
            elapsed_policy: ElapsedPolicy::default(),
        }
    }
}

fn default_project_code() -> String {
    DEFAULT_PROJECT_CODE.to_string()
}

fn default_file_template() -> String {
    DEFAULT_FILE_TEMPLATE.to_string()
}

fn default_serial_column() -> String {
    DEFAULT_SERIAL_COLUMN.to_string()
}

fn default_completed_at_column() -> String {
    DEFAULT_COMPLETED_AT_COLUMN.to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_max_open_files() -> usize {
    DEFAULT_MAX_OPEN_FILES
}

fn default_bucket_boundary() -> usize {
    DEFAULT_BUCKET_BOUNDARY
}

impl ProcessConfig {
    /// Load a config file, choosing the format from the extension
    ///
    /// **Public** - main entry point for configuration loading
    ///
    /// # Errors
    /// * `ConfigError::ReadFailed` - File cannot be read
    /// * `ConfigError::TomlError` / `ConfigError::JsonError` - Malformed content
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Reading config from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate the configuration and build the canonical step order
    ///
    /// **Public** - must succeed before any ingestion starts
    ///
    /// # Errors
    /// `ConfigError::Invalid` describing the first problem found
    pub fn validate(&self) -> Result<StepOrder, ConfigError> {
        let order = StepOrder::new(self.step_order.iter().cloned())?;

        if self.step_order_short.is_empty() {
            return Err(ConfigError::Invalid("step_order_short is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.step_order_short.len());
        for short in &self.step_order_short {
            if !seen.insert(short.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "short code '{}' appears more than once",
                    short
                )));
            }
            let name = self.name_map.get(short).ok_or_else(|| {
                ConfigError::Invalid(format!("short code '{}' has no name_map entry", short))
            })?;
            if !order.contains(name) {
                return Err(ConfigError::Invalid(format!(
                    "short code '{}' maps to '{}', which is not in step_order",
                    short, name
                )));
            }
        }

        if !self.file_template.contains(STEP_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "file_template must contain '{}'",
                STEP_PLACEHOLDER
            )));
        }

        let pipeline = &self.pipeline;
        if pipeline.workers == 0 {
            return Err(ConfigError::Invalid("pipeline.workers must be at least 1".to_string()));
        }
        if pipeline.max_open_files == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.max_open_files must be at least 1".to_string(),
            ));
        }
        if pipeline.bucket_boundary == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.bucket_boundary must be at least 1".to_string(),
            ));
        }

        Ok(order)
    }

    /// Expected file name of the extract for a step short code
    pub fn file_name_for(&self, short: &str) -> String {
        self.file_template.replace(STEP_PLACEHOLDER, short)
    }

    /// Canonical step name for a short code
    pub fn step_name_for(&self, short: &str) -> Option<&str> {
        self.name_map.get(short).map(String::as_str)
    }
}
