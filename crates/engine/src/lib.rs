// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Statement trace engine.
//!
//! Produces an Oracle-10046-style trace of every statement a host query
//! engine runs: per-phase timing, bind values, buffer/WAL/OS resource
//! deltas, block I/O wait events with cache-tier classification, and a
//! per-node execution plan breakdown.
//!
//! The host drives [`SessionTracer`] from its lifecycle callbacks in strict
//! order (plan → bind → execute → end). Everything here is best-effort by
//! construction: no path in this crate can fail the traced statement.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use attribution::AttributionTable;
pub use config::{
	TRACE_LEVEL_BASIC, TRACE_LEVEL_BIND, TRACE_LEVEL_MAX, TRACE_LEVEL_OFF, TRACE_LEVEL_PLAN, TRACE_LEVEL_WAIT,
	TraceConfig,
};
pub use qtrace_core::Result;
pub use session::SessionTracer;
pub use sink::FileSink;
pub use tier::{TierAccumulator, TierEstimate, classify, estimate_split};

mod attribution;
mod config;
pub mod plan;
mod session;
mod sink;
mod statement;
mod tier;
mod waits;
