// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cell::Cell;

use qtrace_core::{OsUsage, ResourceUsage, interface::SnapshotSource};

/// Snapshot source returning whatever the test scripted. Counters are
/// advanced between lifecycle hooks to simulate engine activity.
pub struct StubSource {
	resource: Cell<ResourceUsage>,
	os: Cell<Option<OsUsage>>,
}

impl StubSource {
	pub fn new() -> Self {
		Self {
			resource: Cell::new(ResourceUsage::default()),
			os: Cell::new(None),
		}
	}

	pub fn set_resource(&self, usage: ResourceUsage) {
		self.resource.set(usage);
	}

	pub fn set_os(&self, usage: Option<OsUsage>) {
		self.os.set(usage);
	}

	/// Bump the shared-buffer counters in place, as a running statement
	/// would.
	pub fn add_shared(&self, hit: u64, read: u64) {
		let mut usage = self.resource.get();
		usage.shared_hit += hit;
		usage.shared_read += read;
		self.resource.set(usage);
	}
}

impl Default for StubSource {
	fn default() -> Self {
		Self::new()
	}
}

impl SnapshotSource for StubSource {
	fn resource_usage(&self) -> ResourceUsage {
		self.resource.get()
	}

	fn os_usage(&self, _pid: u32) -> Option<OsUsage> {
		self.os.get()
	}
}
