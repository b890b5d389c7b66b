// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # fleetscale
//!
//! Scales a fleet of stateless worker containers horizontally (instance count)
//! and vertically (per-container resource limits), then reloads the load
//! balancer so routing matches the new fleet.
//!
//! ## Commands
//!
//! - `fleetscale --hor N` - scale the fleet to N members
//! - `fleetscale --vert [--memory M --memory-swap S --cpuset-cpus C]` - apply limits
//! - `fleetscale status` - list the live fleet
//! - `fleetscale plan --hor N` - show what `--hor N` would do
//! - `fleetscale config show|validate|generate` - configuration management
//!
//! Only one scale should run against a fleet at a time.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use fleetscale::commands::{self, ConfigCommand, ScaleArgs};

/// Scale a container fleet horizontally and vertically
#[derive(Parser)]
#[command(name = "fleetscale")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "FLEETSCALE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "FLEETSCALE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(flatten)]
    scale: ScaleArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the live fleet
    #[command(name = "status")]
    Status,

    /// Show the operations a horizontal scale would dispatch
    #[command(name = "plan")]
    Plan {
        /// Number of containers to plan for
        #[arg(long, value_name = "N", value_parser = commands::scale::parse_target)]
        hor: usize,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Status) => commands::status::execute(cli.config).await,
        Some(Commands::Plan { hor }) => commands::plan::execute(hor, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            if cli.scale.to_request().is_empty() {
                eprintln!("{}", "Nothing to do. Pass --hor N and/or --vert. Use --help for usage.".yellow());
                std::process::exit(2);
            }
            if !commands::scale::execute(cli.scale, cli.config).await? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
