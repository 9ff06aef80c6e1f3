//! Report command implementation.
//!
//! The report command:
//! 1. Loads and validates the process config
//! 2. Discovers step extracts in the input directory
//! 3. Ingests every extract concurrently
//! 4. Merges partial records per serial number
//! 5. Aggregates transition times across a worker pool
//! 6. Writes output files

use super::models::ReportArgs;
use crate::aggregator::{merge_batches, Aggregate, AggregateOptions, MergeStats, Master};
use crate::config::ProcessConfig;
use crate::ingest::{discover_step_files, ingest_all, IngestOptions};
use crate::output::{
    commit_outputs, generate_text_summary, render_report, render_result, PendingOutput,
    ResultDocument,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Everything produced by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Step files that were ingested
    pub files: usize,

    pub merge: MergeStats,

    pub aggregate: Aggregate,
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Config read or validation failures
/// * Unreadable input directory
/// * Any ingestion error (all of them are reported)
/// * File write errors
///
/// No output file is written unless every stage succeeds, including the
/// rendering of every requested output.
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/6: Loading config from {}...", args.config_path.display());
    let mut config = ProcessConfig::from_file(&args.config_path)
        .context("Failed to read config file")?;
    args.apply_overrides(&mut config);

    let output = run_pipeline(&config, &args.input_dir)?;

    info!("Step 6/6: Writing output files...");
    let mut outputs = vec![PendingOutput::new(
        &args.output_csv,
        render_report(&output.aggregate.result, &config.project_code)
            .context("Failed to render report")?,
    )];
    if let Some(json_path) = &args.output_json {
        let document = ResultDocument::new(
            output.aggregate.result.clone(),
            config.project_code.clone(),
            output.aggregate.stats.units,
        );
        outputs.push(PendingOutput::new(
            json_path,
            render_result(&document).context("Failed to serialize JSON result")?,
        ));
    }
    commit_outputs(&outputs).context("Failed to write output files")?;

    info!("✓ Report written to: {}", args.output_csv.display());
    if let Some(json_path) = &args.output_json {
        info!("✓ JSON result written to: {}", json_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(64));
        println!("TRANSITION SUMMARY");
        println!("{}", "=".repeat(64));
        println!("Project:     {}", config.project_code);
        println!("Step files:  {}", output.files);
        println!("Conflicts:   {}", output.merge.conflicts);
        println!("\n{}", generate_text_summary(&output.aggregate.result, output.aggregate.stats.units));
        println!("{}", "=".repeat(64));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Run discovery, ingestion, merge and aggregation for a loaded config
///
/// **Public** - the whole pipeline short of writing files
pub fn run_pipeline(config: &ProcessConfig, input_dir: impl AsRef<Path>) -> Result<PipelineOutput> {
    let input_dir = input_dir.as_ref();
    let order = config.validate().context("Invalid config")?;
    debug!("Canonical step order: {:?}", order.names());

    info!("Step 2/6: Discovering step extracts in {}...", input_dir.display());
    let files = discover_step_files(input_dir, config).context("Failed to scan input directory")?;
    info!("Found {} of {} step extracts", files.len(), config.step_order_short.len());

    info!("Step 3/6: Ingesting step extracts...");
    let ingest_options = IngestOptions {
        max_open_files: config.pipeline.max_open_files,
        columns: config.columns.clone(),
        duplicate_policy: config.pipeline.duplicate_policy,
    };
    let mut batches: Vec<_> = ingest_all(&files, &order, &ingest_options)
        .context("Failed to read step files")?
        .into_iter()
        .collect();
    // Merge in short-code order so KeepFirst does not depend on arrival order
    batches.sort_by_key(|batch| files.iter().position(|f| f.path == batch.source));

    info!("Step 4/6: Merging unit records...");
    let (units, merge) = merge_batches(batches, config.pipeline.duplicate_policy);
    debug!(
        "Merged {} partial records from {} batches into {} units ({} conflicts)",
        merge.partial_records, merge.batches, merge.units, merge.conflicts
    );

    info!("Step 5/6: Aggregating transition times...");
    let master = Master::new(AggregateOptions {
        workers: config.pipeline.workers,
        bucket_boundary: config.pipeline.bucket_boundary,
        elapsed_policy: config.pipeline.elapsed_policy,
    });
    let aggregate = master
        .run(&units, &order)
        .context("Failed to start aggregation workers")?;

    if aggregate.stats.non_positive > 0 {
        info!(
            "{} transitions had a later step at or before the earlier one ({:?})",
            aggregate.stats.non_positive, config.pipeline.elapsed_policy
        );
    }

    Ok(PipelineOutput {
        files: files.len(),
        merge,
        aggregate,
    })
}
