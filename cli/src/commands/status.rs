// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `fleetscale status` - print the live fleet

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub async fn execute(config_override: Option<PathBuf>) -> Result<()> {
    let service = super::build_service(config_override)?;
    let fleet = service
        .status()
        .await
        .context("Failed to read fleet")?;

    println!("{} {}", "Fleet size:".bold(), fleet.len());
    for name in service.inspector().member_names(fleet.ids()) {
        println!("  {}", name);
    }
    if fleet.is_empty() {
        println!("  {}", "(no fleet members running)".dimmed());
    }
    Ok(())
}
