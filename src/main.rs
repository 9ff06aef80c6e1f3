//! Step Transit CLI
//!
//! Builds cross-step transition-time reports from per-step CSV extracts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use step_transit::aggregator::ElapsedPolicy;
use step_transit::model::DuplicatePolicy;
use step_transit::commands::{display_version, execute_report, validate_config_file, ReportArgs};

/// Step Transit - transition-time reports for manufacturing steps
#[derive(Parser, Debug)]
#[command(name = "step-transit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true, alias = "debug")]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest step extracts and write the transition-time report
    Report {
        /// Process config file (TOML, or JSON with a .json extension)
        #[arg(short, long, env = "STEP_TRANSIT_CONFIG")]
        config: PathBuf,

        /// Directory holding the step extracts
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the CSV report
        #[arg(short, long, default_value = "report.csv")]
        out: PathBuf,

        /// Output path for a JSON copy of the result (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Aggregation worker count (overrides config)
        #[arg(long)]
        workers: Option<usize>,

        /// Maximum step files read at once (overrides config)
        #[arg(long)]
        max_open_files: Option<usize>,

        /// Exact-day buckets before the overflow bucket (overrides config)
        #[arg(long)]
        boundary: Option<usize>,

        /// Value of the ProjectCode column (overrides config)
        #[arg(long)]
        project_code: Option<String>,

        /// Handling of transitions whose later step is not after the earlier one
        #[arg(long, value_enum)]
        elapsed_policy: Option<ElapsedPolicy>,

        /// Resolution of a step recorded twice for the same serial number
        #[arg(long, value_enum)]
        duplicate_policy: Option<DuplicatePolicy>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a process config file
    Validate {
        /// Path to process config file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            config,
            input,
            out,
            json,
            workers,
            max_open_files,
            boundary,
            project_code,
            elapsed_policy,
            duplicate_policy,
            summary,
        } => {
            let args = ReportArgs {
                config_path: config,
                input_dir: input,
                output_csv: out,
                output_json: json,
                workers,
                max_open_files,
                bucket_boundary: boundary,
                project_code,
                elapsed_policy,
                duplicate_policy,
                print_summary: summary,
            };

            if let Err(err) = execute_report(args) {
                log::error!("{:#}", err);
                std::process::exit(1);
            }
        }

        Commands::Validate { config } => {
            validate_config_file(&config)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
