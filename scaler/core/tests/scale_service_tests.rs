// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Vertical reconciliation and combined scale requests.

mod support;

use fleetscale_core::application::{FleetInspector, ScaleRequest, ScaleService, VerticalReconciler};
use fleetscale_core::domain::config::ScalerConfig;
use fleetscale_core::domain::error::ScaleError;
use fleetscale_core::domain::fleet::FleetNaming;
use fleetscale_core::domain::plan::MAX_FLEET_SIZE;
use fleetscale_core::domain::resources::ResourceProfile;
use std::sync::Arc;
use support::{names, Journal, MockReload, MockRuntime};

fn singletons() -> Vec<String> {
    vec!["leader".to_string(), "load_balancer".to_string()]
}

fn vertical(running: &[&str]) -> (Arc<Journal>, Arc<MockRuntime>, VerticalReconciler) {
    let journal = Arc::new(Journal::default());
    let runtime = Arc::new(MockRuntime::new(journal.clone(), running));
    let inspector = Arc::new(FleetInspector::new(runtime.clone(), FleetNaming::default()));
    let reconciler = VerticalReconciler::new(runtime.clone(), inspector, singletons());
    (journal, runtime, reconciler)
}

fn service(running: &[&str]) -> (Arc<Journal>, Arc<MockRuntime>, Arc<MockReload>, ScaleService) {
    let journal = Arc::new(Journal::default());
    let runtime = Arc::new(MockRuntime::new(journal.clone(), running));
    let reload = Arc::new(MockReload::new(journal.clone()));
    let service = ScaleService::from_config(runtime.clone(), reload.clone(), &ScalerConfig::default()).unwrap();
    (journal, runtime, reload, service)
}

#[tokio::test]
async fn test_vertical_normalizes_swap_before_runtime_call() {
    let (_journal, runtime, reconciler) = vertical(&["f1", "f2", "leader", "load_balancer"]);

    let report = reconciler
        .reconcile(&ResourceProfile::new("400m", "200m", "0-3"))
        .await
        .unwrap();

    assert_eq!(report.profile.memory_swap, "400m");

    let updates = runtime.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    let (targets, profile) = &updates[0];
    assert_eq!(profile.memory, "400m");
    assert_eq!(profile.memory_swap, "400m");
    assert_eq!(profile.cpuset_cpus, "0-3");
    assert_eq!(profile.memory_bytes, 400 * 1024 * 1024);

    let mut expected = names(&[1, 2]);
    expected.extend(singletons());
    assert_eq!(targets, &expected);
}

#[tokio::test]
async fn test_vertical_keeps_larger_swap() {
    let (_journal, runtime, reconciler) = vertical(&["f1"]);

    reconciler
        .reconcile(&ResourceProfile::new("100m", "200m", "1"))
        .await
        .unwrap();

    let updates = runtime.updates.lock().unwrap();
    assert_eq!(updates[0].1.memory_swap, "200m");
}

#[tokio::test]
async fn test_vertical_with_empty_fleet_still_updates_singletons() {
    let (_journal, runtime, reconciler) = vertical(&["leader", "load_balancer"]);

    let report = reconciler.reconcile(&ResourceProfile::default()).await.unwrap();

    assert_eq!(report.targets, singletons());
    assert_eq!(runtime.updates.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_vertical_invalid_format_makes_no_runtime_calls() {
    let (journal, _runtime, reconciler) = vertical(&["f1"]);

    let err = reconciler
        .reconcile(&ResourceProfile::new("big", "100m", "1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ScaleError::InvalidFormat(_)));
    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn test_vertical_update_failure_is_surfaced() {
    let (_journal, runtime, reconciler) = vertical(&["f1"]);
    runtime.set_update_fails();

    let err = reconciler
        .reconcile(&ResourceProfile::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScaleError::VerticalUpdateFailed(_)));
    assert!(err.to_string().contains("leader"));
}

#[tokio::test]
async fn test_vertical_does_not_reload() {
    let (journal, _runtime, _reload, service) = service(&["f1"]);

    let request = ScaleRequest {
        horizontal: None,
        vertical: Some(ResourceProfile::default()),
    };
    let outcome = service.run(&request).await.unwrap();

    assert!(outcome.is_success());
    assert!(outcome.horizontal.is_none());
    assert_eq!(journal.count_prefix("reload"), 0);
}

#[tokio::test]
async fn test_horizontal_runs_before_vertical() {
    let (journal, _runtime, reload, service) = service(&["f1", "leader", "load_balancer"]);

    let request = ScaleRequest {
        horizontal: Some(3),
        vertical: Some(ResourceProfile::new("200m", "100m", "1")),
    };
    let outcome = service.run(&request).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(reload.calls(), 1);

    let entries = journal.entries();
    let reload_at = entries.iter().position(|e| e == "reload").unwrap();
    let update_at = entries.iter().position(|e| e.starts_with("update")).unwrap();
    assert!(reload_at < update_at, "journal: {:?}", entries);

    // The vertical step sees the members the horizontal step created.
    let vertical = outcome.vertical.unwrap().unwrap();
    let mut expected = names(&[1, 2, 3]);
    expected.extend(singletons());
    assert_eq!(vertical.targets, expected);
    assert_eq!(vertical.profile.memory_swap, "200m");
}

#[tokio::test]
async fn test_invalid_profile_aborts_before_horizontal() {
    let (journal, runtime, reload, service) = service(&["f1"]);

    let request = ScaleRequest {
        horizontal: Some(5),
        vertical: Some(ResourceProfile::new("100m", "1.5g", "1")),
    };
    let err = service.run(&request).await.unwrap_err();

    assert!(matches!(err, ScaleError::InvalidFormat(_)));
    assert!(journal.entries().is_empty());
    assert_eq!(reload.calls(), 0);
    assert_eq!(runtime.running(), names(&[1]));
}

#[tokio::test]
async fn test_vertical_runs_after_partial_horizontal_failure() {
    let (_journal, runtime, reload, service) = service(&["f1"]);
    runtime.fail_on("f2");

    let request = ScaleRequest {
        horizontal: Some(3),
        vertical: Some(ResourceProfile::default()),
    };
    let outcome = service.run(&request).await.unwrap();

    assert_eq!(reload.calls(), 1);
    let errors = outcome.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ScaleError::PartialBatchFailure { .. }));

    let vertical = outcome.vertical.unwrap().unwrap();
    let mut expected = names(&[1, 3]);
    expected.extend(singletons());
    assert_eq!(vertical.targets, expected);
}

#[tokio::test]
async fn test_empty_request_does_nothing() {
    let (journal, _runtime, _reload, service) = service(&["f1"]);

    let request = ScaleRequest::default();
    assert!(request.is_empty());

    let outcome = service.run(&request).await.unwrap();
    assert!(outcome.is_success());
    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn test_status_and_plan() {
    let (journal, _runtime, _reload, service) = service(&["f3", "f1", "leader"]);

    let fleet = service.status().await.unwrap();
    assert_eq!(service.inspector().member_names(fleet.ids()), names(&[1, 3]));

    let (_, plan) = service.plan(1).await.unwrap();
    assert_eq!(plan.ids().len(), 1);
    assert_eq!(plan.ids()[0].get(), 3);
    assert_eq!(journal.count_prefix("destroy"), 0);
}

#[cfg(target_pointer_width = "64")]
#[tokio::test]
async fn test_oversized_target_aborts_before_vertical() {
    let (journal, _runtime, reload, service) = service(&["f1"]);

    let request = ScaleRequest {
        horizontal: Some(MAX_FLEET_SIZE + 1),
        vertical: Some(ResourceProfile::default()),
    };
    let err = service.run(&request).await.unwrap_err();

    assert!(matches!(err, ScaleError::InvalidFormat(_)));
    assert!(journal.entries().is_empty());
    assert_eq!(reload.calls(), 0);
}
