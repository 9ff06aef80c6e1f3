use crate::aggregator::ElapsedPolicy;
use crate::config::ProcessConfig;
use crate::model::DuplicatePolicy;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Process config file (TOML or JSON)
    pub config_path: PathBuf,

    /// Directory holding the step extracts
    pub input_dir: PathBuf,

    /// Output path for the CSV report
    pub output_csv: PathBuf,

    /// Output path for the JSON result (optional)
    pub output_json: Option<PathBuf>,

    /// Overrides for values in the config file
    pub workers: Option<usize>,
    pub max_open_files: Option<usize>,
    pub bucket_boundary: Option<usize>,
    pub project_code: Option<String>,
    pub elapsed_policy: Option<ElapsedPolicy>,
    pub duplicate_policy: Option<DuplicatePolicy>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.toml"),
            input_dir: PathBuf::from("."),
            output_csv: PathBuf::from("report.csv"),
            output_json: None,
            workers: None,
            max_open_files: None,
            bucket_boundary: None,
            project_code: None,
            elapsed_policy: None,
            duplicate_policy: None,
            print_summary: false,
        }
    }
}

impl ReportArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut ProcessConfig) {
        if let Some(workers) = self.workers {
            config.pipeline.workers = workers;
        }
        if let Some(max_open_files) = self.max_open_files {
            config.pipeline.max_open_files = max_open_files;
        }
        if let Some(boundary) = self.bucket_boundary {
            config.pipeline.bucket_boundary = boundary;
        }
        if let Some(code) = &self.project_code {
            config.project_code = code.clone();
        }
        if let Some(policy) = self.elapsed_policy {
            config.pipeline.elapsed_policy = policy;
        }
        if let Some(policy) = self.duplicate_policy {
            config.pipeline.duplicate_policy = policy;
        }
    }
}
