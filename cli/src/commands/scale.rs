// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Scale command
//!
//! Horizontal (`--hor N`) and vertical (`--vert` with `--memory`,
//! `--memory-swap`, `--cpuset-cpus`) scaling. Both may be given in one
//! invocation; horizontal runs first.
//!
//! # Usage
//!
//! ```bash
//! # Scale to 10 workers
//! fleetscale --hor 10
//!
//! # Scale to 20 workers, then give every container 400m memory and CPUs 0-3
//! fleetscale --hor 20 --vert --memory 400m --memory-swap 400m --cpuset-cpus 0-3
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fleetscale_core::application::{HorizontalReport, ScaleOutcome, ScaleRequest, VerticalReport};
use fleetscale_core::domain::plan::MAX_FLEET_SIZE;
use fleetscale_core::domain::resources::{
    ResourceProfile, DEFAULT_CPUSET_CPUS, DEFAULT_MEMORY, DEFAULT_MEMORY_SWAP,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ScaleArgs {
    /// Number of containers to horizontally scale to
    #[arg(long, value_name = "N", value_parser = parse_target)]
    pub hor: Option<usize>,

    /// Apply resource limits to the fleet and singleton services
    #[arg(long)]
    pub vert: bool,

    /// Memory limit for the containers
    #[arg(long, default_value = DEFAULT_MEMORY)]
    pub memory: String,

    /// Memory plus swap limit for the containers
    #[arg(long, default_value = DEFAULT_MEMORY_SWAP)]
    pub memory_swap: String,

    /// CPUs the containers may run on (e.g. 0-3 or 0,2)
    #[arg(long, default_value = DEFAULT_CPUSET_CPUS)]
    pub cpuset_cpus: String,
}

/// Parse a horizontal target, rejecting sizes the fleet identities cannot hold.
pub fn parse_target(s: &str) -> std::result::Result<usize, String> {
    let target: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative integer", s))?;
    if target > MAX_FLEET_SIZE {
        return Err(format!("must be at most {}", MAX_FLEET_SIZE));
    }
    Ok(target)
}

impl ScaleArgs {
    pub fn to_request(&self) -> ScaleRequest {
        ScaleRequest {
            horizontal: self.hor,
            vertical: self.vert.then(|| {
                ResourceProfile::new(
                    self.memory.clone(),
                    self.memory_swap.clone(),
                    self.cpuset_cpus.clone(),
                )
            }),
        }
    }
}

/// Run the scale request. Returns `Ok(false)` if any part of it failed.
pub async fn execute(args: ScaleArgs, config_override: Option<PathBuf>) -> Result<bool> {
    let request = args.to_request();

    // Reject malformed quantities before connecting to anything.
    if let Some(profile) = &request.vertical {
        if let Err(e) = profile.normalize() {
            eprintln!("{} {}", "✗".red(), e);
            return Ok(false);
        }
    }

    let service = super::build_service(config_override)?;
    info!(
        "Dispatching scale request: horizontal={:?} vertical={}",
        request.horizontal,
        request.vertical.is_some()
    );
    let outcome = match service.run(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            return Ok(false);
        }
    };

    print_outcome(&outcome);
    Ok(outcome.is_success())
}

fn print_outcome(outcome: &ScaleOutcome) {
    match &outcome.horizontal {
        Some(Ok(report)) => print_horizontal(report),
        Some(Err(e)) => eprintln!("{} Horizontal scaling failed: {}", "✗".red(), e),
        None => {}
    }

    match &outcome.vertical {
        Some(Ok(report)) => print_vertical(report),
        Some(Err(e)) => eprintln!("{} Vertical scaling failed: {}", "✗".red(), e),
        None => {}
    }
}

fn print_horizontal(report: &HorizontalReport) {
    println!("{}", "Horizontal scaling".bold());
    println!(
        "  Fleet: {} -> {} (target {})",
        report.observed.len(),
        report.resulting_fleet().len(),
        report.target
    );

    if let Some(kind) = report.plan.kind() {
        let mut succeeded = report.succeeded.clone();
        succeeded.sort();
        let ok: Vec<String> = succeeded.iter().map(|id| id.to_string()).collect();
        if !ok.is_empty() {
            println!("  {} {}: {}", "✓".green(), kind, ok.join(", "));
        }
        for failure in &report.failed {
            println!("  {} {}", "✗".red(), failure);
        }
    } else {
        println!("  {}", "No membership changes".dimmed());
    }

    match &report.reload {
        Ok(()) => println!("  {} Load balancer reloaded", "✓".green()),
        Err(e) => println!("  {} {}", "✗".red(), e),
    }
}

fn print_vertical(report: &VerticalReport) {
    let profile = &report.profile;
    println!("{}", "Vertical scaling".bold());
    println!(
        "  {} memory={} memory-swap={} cpuset-cpus={} on {} container(s)",
        "✓".green(),
        profile.memory,
        profile.memory_swap,
        profile.cpuset_cpus,
        report.targets.len()
    );
}
