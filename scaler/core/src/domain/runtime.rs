// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::resources::NormalizedProfile;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the container runtime or the reload hook.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("Container runtime unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to create container {name}: {reason}")]
    CreateFailed { name: String, reason: String },

    #[error("Failed to destroy container {name}: {reason}")]
    DestroyFailed { name: String, reason: String },

    #[error("Failed to update resource limits: {0}")]
    UpdateFailed(String),

    #[error("Reload failed: {0}")]
    ReloadFailed(String),
}

/// The container runtime capabilities the reconcilers consume.
///
/// Implementations must tolerate concurrent `create`/`destroy` calls for
/// distinct names; no locking happens above this trait.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Names of all running containers, fleet or not.
    async fn list_names(&self) -> Result<Vec<String>, RuntimeError>;

    /// Run once before a batch of `create` calls, e.g. to pull the image the
    /// new members share.
    async fn prepare(&self) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Create and start one container with the given name.
    async fn create(&self, name: &str) -> Result<(), RuntimeError>;

    /// Stop and remove one container by name.
    async fn destroy(&self, name: &str) -> Result<(), RuntimeError>;

    /// Apply memory, memory-swap and cpuset limits to every named container.
    ///
    /// Containers that accept the limits keep them even if others reject them;
    /// there is no rollback.
    async fn update_limits(
        &self,
        names: &[String],
        profile: &NormalizedProfile,
    ) -> Result<(), RuntimeError>;
}

/// Republishes the fleet topology to the traffic router.
///
/// Must be safe to call when nothing changed.
#[async_trait]
pub trait ReloadTrigger: Send + Sync {
    async fn reload(&self) -> Result<(), RuntimeError>;
}
