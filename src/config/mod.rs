//! Run configuration loading and validation.

pub mod process;

pub use process::{ColumnConfig, PipelineConfig, ProcessConfig};
