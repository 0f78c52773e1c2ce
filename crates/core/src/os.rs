// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// OS-level process statistics at one point in time, as read from the
/// kernel's per-process accounting. CPU time is carried both in raw clock
/// ticks and in seconds derived by the reader, so diffing needs no access
/// to the tick rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OsUsage {
	pub utime_ticks: u64,
	pub stime_ticks: u64,
	pub utime_secs: f64,
	pub stime_secs: f64,
	/// Bytes read through any syscall, including cache-served reads.
	pub rchar: u64,
	pub wchar: u64,
	pub syscr: u64,
	pub syscw: u64,
	/// Bytes the process actually caused to be fetched from storage.
	pub read_bytes: u64,
	pub write_bytes: u64,
	pub cancelled_write_bytes: u64,
	pub vm_rss_kb: u64,
	pub vm_peak_kb: u64,
}

impl OsUsage {
	pub fn total_cpu_secs(&self) -> f64 {
		self.utime_secs + self.stime_secs
	}

	pub fn diff(start: &Self, end: &Self) -> OsDelta {
		OsDelta {
			utime_ticks: end.utime_ticks as i64 - start.utime_ticks as i64,
			stime_ticks: end.stime_ticks as i64 - start.stime_ticks as i64,
			utime_secs: end.utime_secs - start.utime_secs,
			stime_secs: end.stime_secs - start.stime_secs,
			rchar: end.rchar as i64 - start.rchar as i64,
			wchar: end.wchar as i64 - start.wchar as i64,
			syscr: end.syscr as i64 - start.syscr as i64,
			syscw: end.syscw as i64 - start.syscw as i64,
			read_bytes: end.read_bytes as i64 - start.read_bytes as i64,
			write_bytes: end.write_bytes as i64 - start.write_bytes as i64,
			cancelled_write_bytes: end.cancelled_write_bytes as i64 - start.cancelled_write_bytes as i64,
			vm_rss_kb: end.vm_rss_kb as i64 - start.vm_rss_kb as i64,
			vm_peak_kb: end.vm_peak_kb as i64 - start.vm_peak_kb as i64,
		}
	}
}

/// Signed delta between two [`OsUsage`] snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OsDelta {
	pub utime_ticks: i64,
	pub stime_ticks: i64,
	pub utime_secs: f64,
	pub stime_secs: f64,
	pub rchar: i64,
	pub wchar: i64,
	pub syscr: i64,
	pub syscw: i64,
	pub read_bytes: i64,
	pub write_bytes: i64,
	pub cancelled_write_bytes: i64,
	pub vm_rss_kb: i64,
	pub vm_peak_kb: i64,
}

impl OsDelta {
	pub fn total_cpu_secs(&self) -> f64 {
		self.utime_secs + self.stime_secs
	}

	pub fn has_io(&self) -> bool {
		self.rchar != 0 || self.wchar != 0 || self.syscr != 0 || self.syscw != 0 || self.read_bytes != 0
			|| self.write_bytes != 0
	}

	/// Resident set size is a gauge and may shrink; only the monotonic
	/// counters participate in reset detection.
	pub fn reset_detected(&self) -> bool {
		self.utime_ticks < 0
			|| self.stime_ticks < 0
			|| self.rchar < 0 || self.wchar < 0
			|| self.syscr < 0 || self.syscw < 0
			|| self.read_bytes < 0
			|| self.write_bytes < 0
			|| self.vm_peak_kb < 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_diff_cpu_and_io() {
		let start = OsUsage {
			utime_ticks: 100,
			stime_ticks: 40,
			utime_secs: 1.0,
			stime_secs: 0.4,
			read_bytes: 8192,
			syscr: 10,
			..Default::default()
		};
		let end = OsUsage {
			utime_ticks: 160,
			stime_ticks: 50,
			utime_secs: 1.6,
			stime_secs: 0.5,
			read_bytes: 24576,
			syscr: 14,
			..Default::default()
		};
		let delta = OsUsage::diff(&start, &end);
		assert_eq!(delta.utime_ticks, 60);
		assert_eq!(delta.stime_ticks, 10);
		assert!((delta.total_cpu_secs() - 0.7).abs() < 1e-9);
		assert_eq!(delta.read_bytes, 16384);
		assert_eq!(delta.syscr, 4);
		assert!(delta.has_io());
		assert!(!delta.reset_detected());
	}

	#[test]
	fn test_rss_shrink_is_not_a_reset() {
		let start = OsUsage {
			vm_rss_kb: 2048,
			vm_peak_kb: 4096,
			..Default::default()
		};
		let end = OsUsage {
			vm_rss_kb: 1024,
			vm_peak_kb: 4096,
			..Default::default()
		};
		let delta = OsUsage::diff(&start, &end);
		assert_eq!(delta.vm_rss_kb, -1024);
		assert!(!delta.reset_detected());
	}

	#[test]
	fn test_tick_rollback_is_a_reset() {
		let start = OsUsage {
			utime_ticks: 500,
			..Default::default()
		};
		let end = OsUsage {
			utime_ticks: 3,
			..Default::default()
		};
		assert!(OsUsage::diff(&start, &end).reset_detected());
	}
}
