// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Vertical Reconciler
//!
//! Applies one resource profile to every fleet member and every singleton
//! service in a single runtime call. Topology is unchanged, so no reload.

use crate::application::inspector::FleetInspector;
use crate::domain::error::ScaleError;
use crate::domain::resources::{NormalizedProfile, ResourceProfile};
use crate::domain::runtime::ContainerRuntime;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct VerticalReport {
    pub profile: NormalizedProfile,
    /// Every container the update was issued against.
    pub targets: Vec<String>,
}

pub struct VerticalReconciler {
    runtime: Arc<dyn ContainerRuntime>,
    inspector: Arc<FleetInspector>,
    singletons: Vec<String>,
}

impl VerticalReconciler {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        inspector: Arc<FleetInspector>,
        singletons: Vec<String>,
    ) -> Self {
        Self {
            runtime,
            inspector,
            singletons,
        }
    }

    /// Normalize `profile` and apply it. Parse errors abort before any runtime call.
    pub async fn reconcile(&self, profile: &ResourceProfile) -> Result<VerticalReport, ScaleError> {
        let profile = profile.normalize()?;
        self.apply(profile).await
    }

    /// Apply an already-normalized profile.
    pub async fn apply(&self, profile: NormalizedProfile) -> Result<VerticalReport, ScaleError> {
        let fleet = self.inspector.current_fleet().await?;

        let mut targets = self.inspector.member_names(fleet.ids());
        targets.extend(self.singletons.iter().cloned());

        info!(
            "Updating limits on {} container(s): memory={} memory-swap={} cpuset-cpus={}",
            targets.len(),
            profile.memory,
            profile.memory_swap,
            profile.cpuset_cpus
        );

        self.runtime
            .update_limits(&targets, &profile)
            .await
            .map_err(ScaleError::VerticalUpdateFailed)?;

        Ok(VerticalReport { profile, targets })
    }
}
