//! # Testflow Configuration Validator
//!
//! Command-line tool for validating workflow configuration before a service
//! embedding the core is started.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use testflow_core::config::{ConfigManager, LoggingConfig, StoreBackend};
use testflow_core::logging::init_structured_logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate testflow configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment overlay to apply (development, test, production, ...)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate the merged configuration
    Validate,

    /// Print the merged configuration with credentials masked
    Show,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    init_structured_logging(&LoggingConfig {
        level: level.to_string(),
        json: false,
    });

    let result = match cli.command {
        Some(Commands::Show) => show_config(&cli),
        Some(Commands::Validate) | None => validate_config(&cli),
    };

    match result {
        Ok(()) => {
            info!("Configuration validation completed successfully");
            process::exit(0);
        }
        Err(e) => {
            error!("Configuration validation failed: {:#}", e);
            eprintln!("Configuration invalid: {e:#}");
            process::exit(1);
        }
    }
}

fn load(cli: &Cli) -> anyhow::Result<std::sync::Arc<ConfigManager>> {
    ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &cli.environment)
        .with_context(|| format!("loading configuration for environment '{}'", cli.environment))
}

fn validate_config(cli: &Cli) -> anyhow::Result<()> {
    let manager = load(cli)?;
    let config = manager.config();

    println!("Environment: {}", manager.environment());
    println!("Config Directory: {}", manager.config_directory().display());
    println!("Log level: {} (json: {})", config.logging.level, config.logging.json);
    println!(
        "Max comment length: {}",
        config.validation.max_comment_length
    );
    match config.store.backend {
        StoreBackend::Memory => println!("Store: in-memory"),
        StoreBackend::Postgres => println!(
            "Store: postgres (max_connections: {})",
            config.store.max_connections
        ),
    }

    println!("Configuration is valid");
    Ok(())
}

fn show_config(cli: &Cli) -> anyhow::Result<()> {
    let manager = load(cli)?;
    let rendered = serde_json::to_string_pretty(&manager.config().sanitized())
        .context("rendering configuration")?;
    println!("{rendered}");
    Ok(())
}
