//! stac-merkle CLI Binary
//!
//! Command-line interface for computing and verifying Merkle hashes over STAC catalogs.

use clap::Parser;
use stac_merkle::cli::{map_error, Cli, RunContext, EXIT_ERROR, EXIT_MISMATCH, EXIT_OK};
use stac_merkle::config::ConfigLoader;
use stac_merkle::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info, warn};

fn main() {
    let cli = Cli::parse();
    let config_dir = cli.command.config_dir();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_ERROR);
    }

    info!(command = cli.command.name(), "stac-merkle starting");

    let context = match RunContext::new(&config_dir, cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_ERROR);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output.text);
            if output.success {
                info!("Command completed successfully");
                process::exit(EXIT_OK);
            }
            warn!("Command completed with mismatches");
            process::exit(EXIT_MISMATCH);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_ERROR);
        }
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.command.config_dir())
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}
