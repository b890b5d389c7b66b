// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `fleetscale-core` - Fleet Reconciliation
//!
//! Scales a fleet of stateless worker containers horizontally (instance count)
//! and vertically (per-instance resource limits), then asks the traffic router
//! to pick up the new topology.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Fleet`, `ScalePlan`, `ResourceProfile`, runtime traits, config |
//! | [`application`] | Application | Fleet inspector, horizontal/vertical reconcilers, `ScaleService` |
//! | [`infrastructure`] | Infrastructure | Docker runtime (bollard), command reload trigger |
//!
//! Every reconciliation reads the fleet fresh from the container runtime. Nothing
//! is cached between calls, and concurrent reconciliations against the same fleet
//! are not guarded: callers must run one at a time.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
