// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Horizontal Reconciler
//!
//! Read the fleet, plan the delta, run every add (or every remove) as its own
//! task, wait for all of them, then reload the load balancer exactly once.
//!
//! Failures are collected rather than propagated mid-batch: one failed
//! operation never cancels its siblings, and the reload runs even when some
//! operations failed so routing matches what actually exists.

use crate::application::inspector::FleetInspector;
use crate::domain::error::{OperationFailure, OperationKind, ScaleError};
use crate::domain::fleet::{Fleet, FleetMemberId};
use crate::domain::plan::{check_target, RemovalPolicy, ScalePlan};
use crate::domain::runtime::{ContainerRuntime, ReloadTrigger, RuntimeError};
use std::sync::Arc;
use tracing::{info, warn};

/// What a horizontal reconciliation did.
#[derive(Debug)]
pub struct HorizontalReport {
    pub target: usize,
    /// Fleet as observed before dispatch.
    pub observed: Fleet,
    pub plan: ScalePlan,
    pub succeeded: Vec<FleetMemberId>,
    pub failed: Vec<OperationFailure>,
    pub reload: Result<(), RuntimeError>,
}

impl HorizontalReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.reload.is_ok()
    }

    /// The fleet implied by the operations that succeeded.
    pub fn resulting_fleet(&self) -> Fleet {
        match self.plan.kind() {
            Some(OperationKind::Add) => self.observed.with_changes(&self.succeeded, &[]),
            Some(OperationKind::Remove) => self.observed.with_changes(&[], &self.succeeded),
            None => self.observed.clone(),
        }
    }

    /// Batch failures take precedence over a failed reload.
    pub fn check(&self) -> Result<(), ScaleError> {
        if !self.failed.is_empty() {
            return Err(ScaleError::PartialBatchFailure {
                failed: self.failed.clone(),
                succeeded: self.succeeded.clone(),
            });
        }
        if let Err(e) = &self.reload {
            return Err(ScaleError::ReloadFailed(e.clone()));
        }
        Ok(())
    }
}

pub struct HorizontalReconciler {
    runtime: Arc<dyn ContainerRuntime>,
    reload: Arc<dyn ReloadTrigger>,
    inspector: Arc<FleetInspector>,
    policy: RemovalPolicy,
}

impl HorizontalReconciler {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        reload: Arc<dyn ReloadTrigger>,
        inspector: Arc<FleetInspector>,
        policy: RemovalPolicy,
    ) -> Self {
        Self {
            runtime,
            reload,
            inspector,
            policy,
        }
    }

    /// Read the fleet and compute the plan without touching anything.
    pub async fn plan(&self, target: usize) -> Result<(Fleet, ScalePlan), ScaleError> {
        check_target(target)?;
        let fleet = self.inspector.current_fleet().await?;
        let plan = ScalePlan::compute(&fleet, target, self.policy);
        Ok((fleet, plan))
    }

    /// Bring the fleet to `target` members.
    ///
    /// Returns `Err` only if the target is out of range or the fleet could not
    /// be read, in which case nothing was dispatched and no reload happened. Operation and reload failures are
    /// in the report; see [`HorizontalReport::check`].
    pub async fn reconcile(&self, target: usize) -> Result<HorizontalReport, ScaleError> {
        let (observed, plan) = self.plan(target).await?;

        let (succeeded, failed) = match plan.kind() {
            Some(kind) => {
                info!(
                    "Scaling fleet {} -> {}: {} {} operation(s) on {:?}",
                    observed.len(),
                    target,
                    plan.len(),
                    kind,
                    plan.ids()
                );
                self.dispatch(kind, plan.ids()).await
            }
            None => {
                info!("Fleet already at {} members, nothing to dispatch", target);
                (Vec::new(), Vec::new())
            }
        };

        let reload = self.reload.reload().await;
        match &reload {
            Ok(()) => {
                metrics::counter!("fleetscale_reloads_total", "outcome" => "success").increment(1);
                info!("Load balancer reloaded");
            }
            Err(e) => {
                metrics::counter!("fleetscale_reloads_total", "outcome" => "failure").increment(1);
                warn!("Load balancer reload failed: {}", e);
            }
        }

        Ok(HorizontalReport {
            target,
            observed,
            plan,
            succeeded,
            failed,
            reload,
        })
    }

    /// Run one task per identifier and wait for every one of them.
    ///
    /// An add batch is preceded by a single `prepare` call. If that fails,
    /// every add in the batch fails with its error and nothing is created.
    async fn dispatch(
        &self,
        kind: OperationKind,
        ids: &[FleetMemberId],
    ) -> (Vec<FleetMemberId>, Vec<OperationFailure>) {
        if kind == OperationKind::Add {
            if let Err(e) = self.runtime.prepare().await {
                warn!("Runtime preparation failed, skipping {} add(s): {}", ids.len(), e);
                metrics::counter!("fleetscale_operations_total", "kind" => kind.as_str(), "outcome" => "failure")
                    .increment(ids.len() as u64);
                let error = e.to_string();
                let failed = ids
                    .iter()
                    .map(|&id| OperationFailure {
                        id,
                        kind,
                        error: error.clone(),
                    })
                    .collect();
                return (Vec::new(), failed);
            }
        }

        let mut handles = Vec::with_capacity(ids.len());
        for &id in ids {
            let runtime = self.runtime.clone();
            let name = self.inspector.naming().container_name(id);

            handles.push((
                id,
                tokio::spawn(async move {
                    match kind {
                        OperationKind::Add => runtime.create(&name).await,
                        OperationKind::Remove => runtime.destroy(&name).await,
                    }
                }),
            ));
        }

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (id, handle) in handles {
            let error = match handle.await {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) => Some(format!("task aborted: {}", e)),
            };

            match error {
                None => {
                    metrics::counter!("fleetscale_operations_total", "kind" => kind.as_str(), "outcome" => "success")
                        .increment(1);
                    succeeded.push(id);
                }
                Some(error) => {
                    metrics::counter!("fleetscale_operations_total", "kind" => kind.as_str(), "outcome" => "failure")
                        .increment(1);
                    warn!("Failed to {} fleet member {}: {}", kind, id, error);
                    failed.push(OperationFailure { id, kind, error });
                }
            }
        }

        info!(
            "{} batch finished: {} succeeded, {} failed",
            kind,
            succeeded.len(),
            failed.len()
        );
        (succeeded, failed)
    }
}
