//! Step Transit
//!
//! Cross-step transition-time reports for manufactured units.
//!
//! Per-step CSV extracts are ingested concurrently, merged into one
//! step-completion history per serial number, and aggregated on a worker
//! pool into a histogram of how many days units took between every pair of
//! steps in the canonical process order.
//!
//! ## Getting Started
//!
//! ```bash
//! step-transit report --config process.toml --input ./extracts --out report.csv
//! ```

pub mod aggregator;
pub mod commands;
pub mod config;
pub mod ingest;
pub mod model;
pub mod output;
pub mod utils;
