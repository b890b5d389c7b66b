// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the fleetscale CLI

pub mod config;
pub mod plan;
pub mod scale;
pub mod status;

pub use self::config::ConfigCommand;
pub use self::scale::ScaleArgs;

use anyhow::{Context, Result};
use fleetscale_core::application::ScaleService;
use fleetscale_core::domain::config::ScalerConfig;
use fleetscale_core::infrastructure::{CommandReloadTrigger, DockerRuntime};
use std::path::PathBuf;
use std::sync::Arc;

/// Load and validate configuration, then wire the Docker runtime and reload hook.
pub fn build_service(config_override: Option<PathBuf>) -> Result<ScaleService> {
    let config = ScalerConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    let runtime = DockerRuntime::new(&config).context("Failed to initialize container runtime")?;
    let reload = CommandReloadTrigger::from_config(&config.spec.reload)
        .context("Failed to initialize reload trigger")?;

    ScaleService::from_config(Arc::new(runtime), Arc::new(reload), &config)
}
