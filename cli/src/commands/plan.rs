// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `fleetscale plan --hor N` - show what a horizontal scale would do

use anyhow::{Context, Result};
use colored::Colorize;
use fleetscale_core::domain::plan::ScalePlan;
use std::path::PathBuf;

pub async fn execute(target: usize, config_override: Option<PathBuf>) -> Result<()> {
    let service = super::build_service(config_override)?;
    let (fleet, plan) = service
        .plan(target)
        .await
        .context("Failed to read fleet")?;

    println!("Fleet: {} -> {} members", fleet.len(), target);
    let names = service.inspector().member_names(plan.ids().iter().copied());
    match plan {
        ScalePlan::Unchanged => println!("{}", "No changes (reload only)".dimmed()),
        ScalePlan::Add(_) => println!("{} {}", "Would add:".green(), names.join(", ")),
        ScalePlan::Remove(_) => println!("{} {}", "Would remove:".yellow(), names.join(", ")),
    }
    Ok(())
}
