// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Human-readable memory quantities ("100m", "1g", "512k").
//!
//! Byte counts are what limit comparisons and the Docker API use. The caller's
//! spelling is kept for reporting.

use crate::domain::error::ScaleError;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

fn unit_multiplier(unit: char) -> u64 {
    match unit.to_ascii_lowercase() {
        'k' => KIB,
        'm' => MIB,
        'g' => GIB,
        _ => 1,
    }
}

/// Parse a memory quantity into a byte count.
///
/// A trailing `k`, `m` or `g` (any case) scales the numeric prefix by the
/// matching power of 1024. Any other trailing letter counts as bytes, and a
/// string ending in a digit is read whole.
pub fn parse_memory(spec: &str) -> Result<u64, ScaleError> {
    let trimmed = spec.trim();
    let invalid = || ScaleError::InvalidFormat(format!("invalid memory quantity '{}'", spec));

    let last = trimmed.chars().last().ok_or_else(invalid)?;
    let (digits, multiplier) = if last.is_ascii_digit() {
        (trimmed, 1)
    } else {
        (&trimmed[..trimmed.len() - last.len_utf8()], unit_multiplier(last))
    };

    let value: u64 = digits.parse().map_err(|_| invalid())?;
    value.checked_mul(multiplier).ok_or_else(invalid)
}
