// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Fleet Membership
//!
//! - [`FleetMemberId`] - positive integer identity of one worker container.
//! - [`Fleet`] - the set of live members observed in a single read.
//! - [`FleetNaming`] - maps identities to container names (`<prefix><id>`) and back.
//!
//! Members are fungible: an identity is the only thing a member carries. A
//! `Fleet` is a snapshot and is never cached across reconciliations.

use crate::domain::error::ScaleError;
use std::collections::BTreeSet;
use std::fmt;

/// Identity of a fleet member. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FleetMemberId(u32);

impl FleetMemberId {
    /// Returns `None` for zero.
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FleetMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the live fleet, ordered ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    members: BTreeSet<FleetMemberId>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: FleetMemberId) -> bool {
        self.members.contains(&id)
    }

    /// Largest identifier, if any.
    pub fn max(&self) -> Option<FleetMemberId> {
        self.members.iter().next_back().copied()
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = FleetMemberId> + '_ {
        self.members.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<FleetMemberId> {
        self.ids().collect()
    }

    /// Apply a set of additions and removals, returning the resulting snapshot.
    pub fn with_changes(&self, added: &[FleetMemberId], removed: &[FleetMemberId]) -> Self {
        let mut members = self.members.clone();
        for id in removed {
            members.remove(id);
        }
        members.extend(added.iter().copied());
        Self { members }
    }
}

impl FromIterator<FleetMemberId> for Fleet {
    fn from_iter<I: IntoIterator<Item = FleetMemberId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Naming convention for fleet containers: a fixed letter prefix followed by
/// the decimal identity, e.g. `f12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetNaming {
    prefix: String,
}

impl FleetNaming {
    pub fn new(prefix: impl Into<String>) -> Result<Self, ScaleError> {
        let prefix = prefix.into();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ScaleError::InvalidFormat(format!(
                "fleet prefix must be a non-empty run of letters, got '{}'",
                prefix
            )));
        }
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn container_name(&self, id: FleetMemberId) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Extract the identity from a container name, or `None` if the name is not
    /// a fleet member (wrong prefix, non-digit suffix, or identity zero).
    /// Identities beyond `u32::MAX` are also `None` and logged as a warning.
    pub fn parse(&self, name: &str) -> Option<FleetMemberId> {
        let digits = name.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.parse::<u32>() {
            Ok(id) => FleetMemberId::new(id),
            Err(_) => {
                tracing::warn!(
                    "Container {} matches the fleet pattern but its identity exceeds {}; not counted",
                    name,
                    u32::MAX
                );
                None
            }
        }
    }
}

impl Default for FleetNaming {
    fn default() -> Self {
        Self {
            prefix: "f".to_string(),
        }
    }
}
