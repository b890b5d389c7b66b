// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Scaling error taxonomy.
//!
//! - `InvalidFormat` is a caller input error and aborts before any runtime call.
//! - `RuntimeUnavailable` means the fleet could not be read.
//! - `PartialBatchFailure` aggregates every failed add/remove of one batch; the
//!   fleet is left in whatever mixed state the batch produced.

use crate::domain::fleet::FleetMemberId;
use crate::domain::runtime::RuntimeError;
use std::fmt;
use thiserror::Error;

/// Direction of a single horizontal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Remove,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed add/remove inside a horizontal batch.
#[derive(Debug, Clone)]
pub struct OperationFailure {
    pub id: FleetMemberId,
    pub kind: OperationKind,
    pub error: String,
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.error)
    }
}

#[derive(Debug, Clone, Error)]
pub enum ScaleError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(#[source] RuntimeError),

    #[error("{}", batch_summary(.failed, .succeeded))]
    PartialBatchFailure {
        failed: Vec<OperationFailure>,
        succeeded: Vec<FleetMemberId>,
    },

    #[error("Load balancer reload failed: {0}")]
    ReloadFailed(#[source] RuntimeError),

    #[error("Resource limit update failed: {0}")]
    VerticalUpdateFailed(#[source] RuntimeError),
}

fn batch_summary(failed: &[OperationFailure], succeeded: &[FleetMemberId]) -> String {
    let details = failed
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    format!(
        "{} of {} operations failed: {}",
        failed.len(),
        failed.len() + succeeded.len(),
        details
    )
}
