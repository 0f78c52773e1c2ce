// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The seams between the trace engine and its host. Everything the engine
//! needs from the outside world arrives through these traits.

pub use plan::{Instrumentation, PlanNode};
pub use render::{BindParam, RenderError, ValueRenderer};
pub use sink::TraceSink;
pub use snapshot::SnapshotSource;

mod plan;
mod render;
mod sink;
mod snapshot;
