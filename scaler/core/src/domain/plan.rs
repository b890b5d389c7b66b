// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Horizontal planning: turn (current fleet, desired count) into the minimal
//! set of add or remove operations.
//!
//! New identities fill gaps left by earlier removals before extending the
//! numeric range, so identities stay dense and low over the fleet's history.
//! Which members get removed is a [`RemovalPolicy`].

use crate::domain::error::{OperationKind, ScaleError};
use crate::domain::fleet::{Fleet, FleetMemberId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which members to remove when shrinking.
///
/// `HighestFirst` removes the newest-numbered members and keeps the low,
/// presumably longer-lived ones. The choice is arbitrary; `LowestFirst` is
/// equally valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    #[default]
    HighestFirst,
    LowestFirst,
}

impl FromStr for RemovalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "highest-first" => Ok(Self::HighestFirst),
            "lowest-first" => Ok(Self::LowestFirst),
            other => Err(format!(
                "unknown removal policy '{}'. Supported: highest-first, lowest-first",
                other
            )),
        }
    }
}

/// Largest horizontal target. Every target up to this has enough free
/// identities in `1..=u32::MAX` for the gap-filling search.
pub const MAX_FLEET_SIZE: usize = u32::MAX as usize;

/// Reject targets the identity space cannot hold.
pub fn check_target(target: usize) -> Result<(), ScaleError> {
    if target > MAX_FLEET_SIZE {
        return Err(ScaleError::InvalidFormat(format!(
            "target fleet size {} exceeds the maximum of {}",
            target, MAX_FLEET_SIZE
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalePlan {
    Unchanged,
    /// New identities, ascending.
    Add(Vec<FleetMemberId>),
    /// Identities to remove, in policy order.
    Remove(Vec<FleetMemberId>),
}

impl ScalePlan {
    /// Compute the plan that brings `fleet` to `target` members.
    ///
    /// `target` must pass [`check_target`].
    pub fn compute(fleet: &Fleet, target: usize, policy: RemovalPolicy) -> Self {
        let current = fleet.len();

        if target > current {
            let delta = target - current;
            // The `delta` smallest free identities are all <= max(existing) + delta.
            let ids = (1..=u32::MAX)
                .filter_map(FleetMemberId::new)
                .filter(|id| !fleet.contains(*id))
                .take(delta)
                .collect();
            Self::Add(ids)
        } else if target < current {
            let delta = current - target;
            let ids = match policy {
                RemovalPolicy::HighestFirst => fleet.ids().rev().take(delta).collect(),
                RemovalPolicy::LowestFirst => fleet.ids().take(delta).collect(),
            };
            Self::Remove(ids)
        } else {
            Self::Unchanged
        }
    }

    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            Self::Unchanged => None,
            Self::Add(_) => Some(OperationKind::Add),
            Self::Remove(_) => Some(OperationKind::Remove),
        }
    }

    pub fn ids(&self) -> &[FleetMemberId] {
        match self {
            Self::Unchanged => &[],
            Self::Add(ids) | Self::Remove(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// The fleet that results if every operation succeeds.
    pub fn apply(&self, fleet: &Fleet) -> Fleet {
        match self {
            Self::Unchanged => fleet.clone(),
            Self::Add(ids) => fleet.with_changes(ids, &[]),
            Self::Remove(ids) => fleet.with_changes(&[], ids),
        }
    }
}
