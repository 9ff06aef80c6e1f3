//! Step extract ingestion.
//!
//! This module handles:
//! - Locating step extracts in the input directory
//! - Parsing one extract into partial unit records
//! - Running one ingestor per extract concurrently and collecting all errors

pub mod discovery;
pub mod pool;
pub mod reader;
pub mod timestamp;

// Re-export main types
pub use discovery::{discover_step_files, StepFile};
pub use pool::{ingest_all, IngestOptions};
pub use reader::{ingest_step_file, read_step_records, PartialBatch};
pub use timestamp::parse_completed_at;
