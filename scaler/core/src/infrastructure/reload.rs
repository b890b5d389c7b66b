// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Load balancer reload via an external command (default
//! `./load_balancer.sh reload`). A non-zero exit is a failed reload.

use crate::domain::config::ReloadConfig;
use crate::domain::runtime::{ReloadTrigger, RuntimeError};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

pub struct CommandReloadTrigger {
    program: String,
    args: Vec<String>,
}

impl CommandReloadTrigger {
    pub fn new(command: &[String]) -> Result<Self, RuntimeError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| RuntimeError::ReloadFailed("reload command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn from_config(config: &ReloadConfig) -> Result<Self, RuntimeError> {
        Self::new(&config.command)
    }
}

#[async_trait]
impl ReloadTrigger for CommandReloadTrigger {
    async fn reload(&self) -> Result<(), RuntimeError> {
        debug!("Running reload command: {} {:?}", self.program, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| RuntimeError::ReloadFailed(format!("failed to run {}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(RuntimeError::ReloadFailed(format!(
            "{} exited with {}: {}",
            self.program,
            output.status,
            stderr.trim()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandReloadTrigger::new(&[]).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let trigger = CommandReloadTrigger::new(&command(&["true"])).unwrap();
        trigger.reload().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_reports_stderr() {
        let trigger =
            CommandReloadTrigger::new(&command(&["sh", "-c", "echo no upstreams >&2; exit 3"])).unwrap();
        let err = trigger.reload().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no upstreams"), "unexpected error: {}", msg);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let trigger = CommandReloadTrigger::new(&command(&["/nonexistent/fleetscale-reload"])).unwrap();
        assert!(matches!(trigger.reload().await, Err(RuntimeError::ReloadFailed(_))));
    }
}
