// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{OsUsage, ResourceUsage};

/// Supplies point-in-time counter snapshots on demand.
///
/// The engine-side counters are always available; the OS-side counters may
/// not be (unsupported platform, permission denied), in which case the
/// OS-level records are simply absent from the trace.
pub trait SnapshotSource {
	fn resource_usage(&self) -> ResourceUsage;

	fn os_usage(&self, pid: u32) -> Option<OsUsage>;
}
