// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod docker;
pub mod reload;

pub use docker::DockerRuntime;
pub use reload::CommandReloadTrigger;
