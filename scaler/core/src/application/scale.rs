// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Scale Service
//!
//! Entry point for a scale request carrying an optional horizontal target
//! and/or an optional vertical profile.
//!
//! # Ordering
//!
//! 1. The vertical profile is normalized and the horizontal target range
//!    checked first, so bad input fails the whole request before any container
//!    is touched.
//! 2. Horizontal reconciliation runs to completion, reload included.
//! 3. Vertical reconciliation runs against the fleet as it now exists. It runs
//!    even when the horizontal step reported failures.

use crate::application::horizontal::{HorizontalReconciler, HorizontalReport};
use crate::application::inspector::FleetInspector;
use crate::application::vertical::{VerticalReconciler, VerticalReport};
use crate::domain::config::ScalerConfig;
use crate::domain::error::ScaleError;
use crate::domain::fleet::{Fleet, FleetNaming};
use crate::domain::plan::{check_target, RemovalPolicy, ScalePlan};
use crate::domain::resources::ResourceProfile;
use crate::domain::runtime::{ContainerRuntime, ReloadTrigger};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ScaleRequest {
    pub horizontal: Option<usize>,
    pub vertical: Option<ResourceProfile>,
}

impl ScaleRequest {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ScaleOutcome {
    pub horizontal: Option<Result<HorizontalReport, ScaleError>>,
    pub vertical: Option<Result<VerticalReport, ScaleError>>,
}

impl ScaleOutcome {
    /// Every error the request produced, horizontal first.
    pub fn errors(&self) -> Vec<ScaleError> {
        let mut errors = Vec::new();
        match &self.horizontal {
            Some(Ok(report)) => {
                if let Err(e) = report.check() {
                    errors.push(e);
                }
            }
            Some(Err(e)) => errors.push(e.clone()),
            None => {}
        }
        if let Some(Err(e)) = &self.vertical {
            errors.push(e.clone());
        }
        errors
    }

    pub fn is_success(&self) -> bool {
        self.errors().is_empty()
    }
}

pub struct ScaleService {
    inspector: Arc<FleetInspector>,
    horizontal: HorizontalReconciler,
    vertical: VerticalReconciler,
}

impl ScaleService {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        reload: Arc<dyn ReloadTrigger>,
        naming: FleetNaming,
        singletons: Vec<String>,
        policy: RemovalPolicy,
    ) -> Self {
        let inspector = Arc::new(FleetInspector::new(runtime.clone(), naming));
        Self {
            horizontal: HorizontalReconciler::new(runtime.clone(), reload, inspector.clone(), policy),
            vertical: VerticalReconciler::new(runtime, inspector.clone(), singletons),
            inspector,
        }
    }

    pub fn from_config(
        runtime: Arc<dyn ContainerRuntime>,
        reload: Arc<dyn ReloadTrigger>,
        config: &ScalerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self::new(
            runtime,
            reload,
            config.naming()?,
            config.spec.singletons.clone(),
            config.spec.policy.removal,
        ))
    }

    pub fn inspector(&self) -> &FleetInspector {
        &self.inspector
    }

    pub async fn status(&self) -> Result<Fleet, ScaleError> {
        self.inspector.current_fleet().await
    }

    /// Dry run of the horizontal step.
    pub async fn plan(&self, target: usize) -> Result<(Fleet, ScalePlan), ScaleError> {
        self.horizontal.plan(target).await
    }

    /// Run a scale request. `Err` means the request was rejected before any
    /// runtime call; everything after that is reported in the outcome.
    pub async fn run(&self, request: &ScaleRequest) -> Result<ScaleOutcome, ScaleError> {
        let profile = request
            .vertical
            .as_ref()
            .map(ResourceProfile::normalize)
            .transpose()?;
        if let Some(target) = request.horizontal {
            check_target(target)?;
        }

        let mut outcome = ScaleOutcome::default();

        if let Some(target) = request.horizontal {
            outcome.horizontal = Some(self.horizontal.reconcile(target).await);
        }

        if let Some(profile) = profile {
            outcome.vertical = Some(self.vertical.apply(profile).await);
        }

        Ok(outcome)
    }
}
