// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer
//!
//! Pure types and policies. The only I/O surface is the pair of traits in
//! [`runtime`], which infrastructure implements.
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`memory`] | `parse_memory` |
//! | [`fleet`] | `FleetMemberId`, `Fleet`, `FleetNaming` |
//! | [`plan`] | `ScalePlan`, `RemovalPolicy` |
//! | [`resources`] | `ResourceProfile`, `NormalizedProfile` |
//! | [`runtime`] | `ContainerRuntime`, `ReloadTrigger`, `RuntimeError` |
//! | [`error`] | `ScaleError`, `OperationFailure` |
//! | [`config`] | `ScalerConfig` |

pub mod memory;
pub mod fleet;
pub mod plan;
pub mod resources;
pub mod runtime;
pub mod error;
pub mod config;
