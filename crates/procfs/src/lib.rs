// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Linux `/proc` statistics reader.
//!
//! Assembles an [`OsUsage`] snapshot for a process from three sources:
//! `/proc/<pid>/stat` (CPU time in clock ticks), `/proc/<pid>/io` (syscall
//! and storage I/O counters), and `/proc/<pid>/status` (resident and peak
//! memory). Reads are best-effort: an unreadable file yields `None` rather
//! than an error, and the caller simply traces without OS-level records.

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::fs;

use once_cell::sync::Lazy;
use qtrace_core::OsUsage;
use tracing::debug;

/// Clock ticks per second, from `sysconf(_SC_CLK_TCK)`. Falls back to the
/// conventional 100 when the call fails.
static CLOCK_TICKS_PER_SEC: Lazy<f64> = Lazy::new(|| {
	let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
	if ticks > 0 {
		ticks as f64
	} else {
		100.0
	}
});

fn ticks_to_secs(ticks: u64) -> f64 {
	ticks as f64 / *CLOCK_TICKS_PER_SEC
}

/// Reads OS-level statistics for one process.
#[derive(Debug, Clone, Copy)]
pub struct ProcReader {
	pid: u32,
}

impl ProcReader {
	pub fn new(pid: u32) -> Self {
		Self {
			pid,
		}
	}

	pub fn current() -> Self {
		Self::new(std::process::id())
	}

	pub fn pid(&self) -> u32 {
		self.pid
	}

	/// One complete snapshot. `None` when the CPU accounting cannot be
	/// read; the I/O counters alone may be unreadable (they require
	/// same-user access) and then stay zero.
	pub fn read(&self) -> Option<OsUsage> {
		let stat = fs::read_to_string(format!("/proc/{}/stat", self.pid)).ok()?;
		let (utime_ticks, stime_ticks) = parse_stat(&stat)?;

		let mut usage = OsUsage {
			utime_ticks,
			stime_ticks,
			utime_secs: ticks_to_secs(utime_ticks),
			stime_secs: ticks_to_secs(stime_ticks),
			..Default::default()
		};

		match fs::read_to_string(format!("/proc/{}/io", self.pid)) {
			Ok(io) => parse_io(&io, &mut usage),
			Err(err) => {
				debug!("io counters unreadable for pid {}: {}", self.pid, err);
			}
		}

		if let Ok(status) = fs::read_to_string(format!("/proc/{}/status", self.pid)) {
			parse_status(&status, &mut usage);
		}

		Some(usage)
	}
}

/// Extract utime and stime from a `/proc/<pid>/stat` line. The comm field
/// is skipped by searching for its closing parenthesis, since it may itself
/// contain spaces and parentheses.
fn parse_stat(line: &str) -> Option<(u64, u64)> {
	let rest = &line[line.rfind(')')? + 1..];
	let fields: Vec<&str> = rest.split_whitespace().collect();
	// After the comm field: state, ppid, pgrp, session, tty_nr, tpgid,
	// flags, minflt, cminflt, majflt, cmajflt, utime, stime, ...
	let utime = fields.get(11)?.parse().ok()?;
	let stime = fields.get(12)?.parse().ok()?;
	Some((utime, stime))
}

fn parse_io(content: &str, usage: &mut OsUsage) {
	for line in content.lines() {
		let Some((key, value)) = line.split_once(':') else {
			continue;
		};
		let Ok(value) = value.trim().parse::<u64>() else {
			continue;
		};
		match key {
			"rchar" => usage.rchar = value,
			"wchar" => usage.wchar = value,
			"syscr" => usage.syscr = value,
			"syscw" => usage.syscw = value,
			"read_bytes" => usage.read_bytes = value,
			"write_bytes" => usage.write_bytes = value,
			"cancelled_write_bytes" => usage.cancelled_write_bytes = value,
			_ => {}
		}
	}
}

fn parse_status(content: &str, usage: &mut OsUsage) {
	for line in content.lines() {
		let Some((key, value)) = line.split_once(':') else {
			continue;
		};
		let kb = value.trim().trim_end_matches("kB").trim();
		let Ok(kb) = kb.parse::<u64>() else {
			continue;
		};
		match key {
			"VmRSS" => usage.vm_rss_kb = kb,
			"VmPeak" => usage.vm_peak_kb = kb,
			_ => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_stat_plain_comm() {
		let line = "1234 (qtraced) S 1 1234 1234 0 -1 4194304 100 0 0 0 250 75 0 0 20 0 1 0 100 0 0";
		let (utime, stime) = parse_stat(line).unwrap();
		assert_eq!(utime, 250);
		assert_eq!(stime, 75);
	}

	#[test]
	fn test_parse_stat_comm_with_spaces_and_parens() {
		let line = "99 (a (weird) name) R 1 99 99 0 -1 0 0 0 0 0 42 7 0 0 20 0 1 0 100 0 0";
		let (utime, stime) = parse_stat(line).unwrap();
		assert_eq!(utime, 42);
		assert_eq!(stime, 7);
	}

	#[test]
	fn test_parse_stat_truncated_line() {
		assert!(parse_stat("1234 (comm) S 1 2").is_none());
		assert!(parse_stat("garbage").is_none());
	}

	#[test]
	fn test_parse_io_all_fields() {
		let content = "rchar: 100\nwchar: 200\nsyscr: 3\nsyscw: 4\nread_bytes: 8192\nwrite_bytes: 4096\ncancelled_write_bytes: 0\n";
		let mut usage = OsUsage::default();
		parse_io(content, &mut usage);
		assert_eq!(usage.rchar, 100);
		assert_eq!(usage.wchar, 200);
		assert_eq!(usage.syscr, 3);
		assert_eq!(usage.syscw, 4);
		assert_eq!(usage.read_bytes, 8192);
		assert_eq!(usage.write_bytes, 4096);
	}

	#[test]
	fn test_parse_status_memory_lines() {
		let content = "Name:\tqtraced\nVmPeak:\t  123456 kB\nVmRSS:\t   65432 kB\nThreads:\t1\n";
		let mut usage = OsUsage::default();
		parse_status(content, &mut usage);
		assert_eq!(usage.vm_peak_kb, 123456);
		assert_eq!(usage.vm_rss_kb, 65432);
	}

	#[cfg(target_os = "linux")]
	#[test]
	fn test_read_self() {
		let usage = ProcReader::current().read().unwrap();
		assert!(usage.utime_secs >= 0.0);
		assert!(usage.vm_rss_kb > 0);
	}
}
