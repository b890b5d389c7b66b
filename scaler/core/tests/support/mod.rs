// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-memory container runtime and reload hook for reconciler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fleetscale_core::domain::resources::NormalizedProfile;
use fleetscale_core::domain::runtime::{ContainerRuntime, ReloadTrigger, RuntimeError};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Ordered record of every call made against the mocks.
#[derive(Default)]
pub struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub struct MockRuntime {
    running: Mutex<BTreeSet<String>>,
    failing: Mutex<HashSet<String>>,
    list_unavailable: AtomicBool,
    update_fails: AtomicBool,
    prepare_fails: AtomicBool,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub updates: Mutex<Vec<(Vec<String>, NormalizedProfile)>>,
    journal: Arc<Journal>,
}

impl MockRuntime {
    pub fn new(journal: Arc<Journal>, names: &[&str]) -> Self {
        Self {
            running: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            failing: Mutex::new(HashSet::new()),
            list_unavailable: AtomicBool::new(false),
            update_fails: AtomicBool::new(false),
            prepare_fails: AtomicBool::new(false),
            delay: Duration::from_millis(20),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn set_list_unavailable(&self) {
        self.list_unavailable.store(true, Ordering::SeqCst);
    }

    pub fn set_update_fails(&self) {
        self.update_fails.store(true, Ordering::SeqCst);
    }

    pub fn set_prepare_fails(&self) {
        self.prepare_fails.store(true, Ordering::SeqCst);
    }

    pub fn running(&self) -> Vec<String> {
        self.running.lock().unwrap().iter().cloned().collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn operation(&self, op: &str, name: &str) -> Result<(), String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.journal.record(format!("{} {}", op, name));
        if self.failing.lock().unwrap().contains(name) {
            return Err(format!("{} rejected by mock", name));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn list_names(&self) -> Result<Vec<String>, RuntimeError> {
        self.journal.record("list");
        if self.list_unavailable.load(Ordering::SeqCst) {
            return Err(RuntimeError::Unavailable("daemon not running".to_string()));
        }
        Ok(self.running())
    }

    async fn prepare(&self) -> Result<(), RuntimeError> {
        self.journal.record("prepare");
        if self.prepare_fails.load(Ordering::SeqCst) {
            return Err(RuntimeError::Unavailable("image pull denied".to_string()));
        }
        Ok(())
    }

    async fn create(&self, name: &str) -> Result<(), RuntimeError> {
        self.operation("create", name)
            .await
            .map_err(|reason| RuntimeError::CreateFailed { name: name.to_string(), reason })?;
        self.running.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    async fn destroy(&self, name: &str) -> Result<(), RuntimeError> {
        self.operation("destroy", name)
            .await
            .map_err(|reason| RuntimeError::DestroyFailed { name: name.to_string(), reason })?;
        self.running.lock().unwrap().remove(name);
        Ok(())
    }

    async fn update_limits(
        &self,
        names: &[String],
        profile: &NormalizedProfile,
    ) -> Result<(), RuntimeError> {
        self.journal.record(format!("update {}", names.join(",")));
        self.updates.lock().unwrap().push((names.to_vec(), profile.clone()));
        if self.update_fails.load(Ordering::SeqCst) {
            return Err(RuntimeError::UpdateFailed("leader: cannot lower memory".to_string()));
        }
        Ok(())
    }
}

pub struct MockReload {
    calls: AtomicUsize,
    fails: AtomicBool,
    journal: Arc<Journal>,
}

impl MockReload {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fails: AtomicBool::new(false),
            journal,
        }
    }

    pub fn set_fails(&self) {
        self.fails.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReloadTrigger for MockReload {
    async fn reload(&self) -> Result<(), RuntimeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.record("reload");
        if self.fails.load(Ordering::SeqCst) {
            return Err(RuntimeError::ReloadFailed("haproxy exited with 1".to_string()));
        }
        Ok(())
    }
}

pub fn names(ids: &[u32]) -> Vec<String> {
    ids.iter().map(|n| format!("f{}", n)).collect()
}
