// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// Engine-side resource counters at one point in time. Every field is a
/// monotonically increasing count within one process lifetime; a decrease
/// between two snapshots means the underlying counter was reset.
///
/// `read_time_us`/`write_time_us` are the host's accumulated block I/O
/// timing counters; they stay zero when the host does not track I/O timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
	pub shared_hit: u64,
	pub shared_read: u64,
	pub shared_dirtied: u64,
	pub shared_written: u64,
	pub local_hit: u64,
	pub local_read: u64,
	pub local_dirtied: u64,
	pub local_written: u64,
	pub temp_read: u64,
	pub temp_written: u64,
	pub wal_records: u64,
	pub wal_fpi: u64,
	pub wal_bytes: u64,
	pub read_time_us: u64,
	pub write_time_us: u64,
}

impl ResourceUsage {
	/// Field-by-field `end - start`. Negative results are preserved so a
	/// counter reset stays visible to the caller.
	pub fn diff(start: &Self, end: &Self) -> ResourceDelta {
		ResourceDelta {
			shared_hit: end.shared_hit as i64 - start.shared_hit as i64,
			shared_read: end.shared_read as i64 - start.shared_read as i64,
			shared_dirtied: end.shared_dirtied as i64 - start.shared_dirtied as i64,
			shared_written: end.shared_written as i64 - start.shared_written as i64,
			local_hit: end.local_hit as i64 - start.local_hit as i64,
			local_read: end.local_read as i64 - start.local_read as i64,
			local_dirtied: end.local_dirtied as i64 - start.local_dirtied as i64,
			local_written: end.local_written as i64 - start.local_written as i64,
			temp_read: end.temp_read as i64 - start.temp_read as i64,
			temp_written: end.temp_written as i64 - start.temp_written as i64,
			wal_records: end.wal_records as i64 - start.wal_records as i64,
			wal_fpi: end.wal_fpi as i64 - start.wal_fpi as i64,
			wal_bytes: end.wal_bytes as i64 - start.wal_bytes as i64,
			read_time_us: end.read_time_us as i64 - start.read_time_us as i64,
			write_time_us: end.write_time_us as i64 - start.write_time_us as i64,
		}
	}
}

/// Per-phase delta between two [`ResourceUsage`] snapshots. Signed: a
/// negative field is a flagged anomaly, never clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDelta {
	pub shared_hit: i64,
	pub shared_read: i64,
	pub shared_dirtied: i64,
	pub shared_written: i64,
	pub local_hit: i64,
	pub local_read: i64,
	pub local_dirtied: i64,
	pub local_written: i64,
	pub temp_read: i64,
	pub temp_written: i64,
	pub wal_records: i64,
	pub wal_fpi: i64,
	pub wal_bytes: i64,
	pub read_time_us: i64,
	pub write_time_us: i64,
}

impl ResourceDelta {
	pub fn has_shared(&self) -> bool {
		self.shared_hit != 0 || self.shared_read != 0 || self.shared_dirtied != 0 || self.shared_written != 0
	}

	pub fn has_local(&self) -> bool {
		self.local_hit != 0 || self.local_read != 0 || self.local_dirtied != 0 || self.local_written != 0
	}

	pub fn has_temp(&self) -> bool {
		self.temp_read != 0 || self.temp_written != 0
	}

	pub fn has_wal(&self) -> bool {
		self.wal_records != 0 || self.wal_fpi != 0 || self.wal_bytes != 0
	}

	pub fn shared_reset(&self) -> bool {
		self.shared_hit < 0 || self.shared_read < 0 || self.shared_dirtied < 0 || self.shared_written < 0
	}

	pub fn local_reset(&self) -> bool {
		self.local_hit < 0 || self.local_read < 0 || self.local_dirtied < 0 || self.local_written < 0
	}

	pub fn temp_reset(&self) -> bool {
		self.temp_read < 0 || self.temp_written < 0
	}

	pub fn wal_reset(&self) -> bool {
		self.wal_records < 0 || self.wal_fpi < 0 || self.wal_bytes < 0
	}

	pub fn reset_detected(&self) -> bool {
		self.shared_reset() || self.local_reset() || self.temp_reset() || self.wal_reset()
			|| self.read_time_us < 0 || self.write_time_us < 0
	}
}
