// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Resource profiles for vertical scaling.
//!
//! The runtime's swap limit is memory + swap combined, so it can never be set
//! below the memory limit. [`ResourceProfile::normalize`] raises swap to the
//! memory value when the supplied swap is smaller.

use crate::domain::error::ScaleError;
use crate::domain::memory::parse_memory;

pub const DEFAULT_MEMORY: &str = "100m";
pub const DEFAULT_MEMORY_SWAP: &str = "100m";
pub const DEFAULT_CPUSET_CPUS: &str = "1";

/// Resource limits as supplied by the caller, unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProfile {
    pub memory: String,
    pub memory_swap: String,
    pub cpuset_cpus: String,
}

impl Default for ResourceProfile {
    fn default() -> Self {
        Self {
            memory: DEFAULT_MEMORY.to_string(),
            memory_swap: DEFAULT_MEMORY_SWAP.to_string(),
            cpuset_cpus: DEFAULT_CPUSET_CPUS.to_string(),
        }
    }
}

/// A validated profile, ready for the runtime.
///
/// The strings are the caller's spelling; the byte counts are their parsed
/// values and always fit the runtime's signed 64-bit limit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProfile {
    pub memory: String,
    pub memory_swap: String,
    pub cpuset_cpus: String,
    pub memory_bytes: i64,
    pub memory_swap_bytes: i64,
}

impl ResourceProfile {
    pub fn new(
        memory: impl Into<String>,
        memory_swap: impl Into<String>,
        cpuset_cpus: impl Into<String>,
    ) -> Self {
        Self {
            memory: memory.into(),
            memory_swap: memory_swap.into(),
            cpuset_cpus: cpuset_cpus.into(),
        }
    }

    /// Parse and validate every field, raising swap to memory if needed.
    pub fn normalize(&self) -> Result<NormalizedProfile, ScaleError> {
        let memory_bytes = limit_bytes(&self.memory)?;
        let swap_bytes = limit_bytes(&self.memory_swap)?;
        validate_cpuset(&self.cpuset_cpus)?;

        let (memory_swap, memory_swap_bytes) = if swap_bytes < memory_bytes {
            tracing::debug!(
                "memory-swap {} is below memory {}; raising swap to {}",
                self.memory_swap,
                self.memory,
                self.memory
            );
            (self.memory.clone(), memory_bytes)
        } else {
            (self.memory_swap.clone(), swap_bytes)
        };

        Ok(NormalizedProfile {
            memory: self.memory.clone(),
            memory_swap,
            cpuset_cpus: self.cpuset_cpus.clone(),
            memory_bytes,
            memory_swap_bytes,
        })
    }
}

/// Parse a memory quantity that must fit in a signed 64-bit byte count.
fn limit_bytes(quantity: &str) -> Result<i64, ScaleError> {
    let bytes = parse_memory(quantity)?;
    i64::try_from(bytes).map_err(|_| {
        ScaleError::InvalidFormat(format!("memory quantity '{}' exceeds the runtime limit", quantity))
    })
}

/// Accepts Docker cpuset syntax: comma-separated CPU indices or `lo-hi` ranges.
fn validate_cpuset(cpuset: &str) -> Result<(), ScaleError> {
    let invalid = || ScaleError::InvalidFormat(format!("invalid cpuset '{}'", cpuset));

    if cpuset.is_empty() {
        return Err(invalid());
    }
    for part in cpuset.split(',') {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: u32 = lo.parse().map_err(|_| invalid())?;
                let hi: u32 = hi.parse().map_err(|_| invalid())?;
                if lo > hi {
                    return Err(invalid());
                }
            }
            None => {
                part.parse::<u32>().map_err(|_| invalid())?;
            }
        }
    }
    Ok(())
}
