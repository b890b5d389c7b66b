// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod inspector;
pub mod horizontal;
pub mod vertical;
pub mod scale;

// Re-export use cases for convenience
pub use inspector::FleetInspector;
pub use horizontal::{HorizontalReconciler, HorizontalReport};
pub use vertical::{VerticalReconciler, VerticalReport};
pub use scale::{ScaleOutcome, ScaleRequest, ScaleService};
