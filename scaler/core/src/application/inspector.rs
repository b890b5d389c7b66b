// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Fleet Inspector
//!
//! Reads the live fleet from the container runtime. Read-only, no retries.

use crate::domain::error::ScaleError;
use crate::domain::fleet::{Fleet, FleetMemberId, FleetNaming};
use crate::domain::runtime::ContainerRuntime;
use std::sync::Arc;
use tracing::debug;

pub struct FleetInspector {
    runtime: Arc<dyn ContainerRuntime>,
    naming: FleetNaming,
}

impl FleetInspector {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, naming: FleetNaming) -> Self {
        Self { runtime, naming }
    }

    pub fn naming(&self) -> &FleetNaming {
        &self.naming
    }

    /// Current fleet members, ascending. Empty if no container matches.
    pub async fn current_fleet(&self) -> Result<Fleet, ScaleError> {
        let names = self
            .runtime
            .list_names()
            .await
            .map_err(ScaleError::RuntimeUnavailable)?;

        let fleet: Fleet = names
            .iter()
            .filter_map(|name| {
                let id = self.naming.parse(name);
                if id.is_none() {
                    debug!("Ignoring non-fleet container: {}", name);
                }
                id
            })
            .collect();

        metrics::gauge!("fleetscale_fleet_size").set(fleet.len() as f64);
        debug!("Observed fleet of {} members: {:?}", fleet.len(), fleet.to_vec());
        Ok(fleet)
    }

    /// Container names for the given members.
    pub fn member_names(&self, ids: impl IntoIterator<Item = FleetMemberId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| self.naming.container_name(id))
            .collect()
    }
}
