use crate::config::ProcessConfig;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a process config file and print what it describes
pub fn validate_config_file(file_path: &Path) -> Result<()> {
    println!("Validating config: {}", file_path.display());

    let config = ProcessConfig::from_file(file_path).context("Failed to read config file")?;
    let order = config.validate().context("Invalid config")?;

    println!("✓ Valid process config");
    println!("  Project:        {}", config.project_code);
    println!("  Steps:          {}", order.len());
    println!("  Step pairs:     {}", order.pair_count());
    println!("  Bucket boundary: {}", config.pipeline.bucket_boundary);
    println!("  Workers:        {}", config.pipeline.workers);
    println!("  Max open files: {}", config.pipeline.max_open_files);
    println!();
    println!("Step files:");
    for short in &config.step_order_short {
        println!(
            "  {:<8} {:<32} {}",
            short,
            config.step_name_for(short).unwrap_or("?"),
            config.file_name_for(short)
        );
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Step Transit v{}", env!("CARGO_PKG_VERSION"));
    println!("Result Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Cross-step transition-time reports for manufacturing step extracts.");
}
