// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use qtrace_core::{Error, Result, diagnostic::invalid_parameter_value};
use serde::{Deserialize, Serialize};

pub const TRACE_LEVEL_OFF: u8 = 0;
pub const TRACE_LEVEL_BASIC: u8 = 1;
/// Bind values are traced from this level up.
pub const TRACE_LEVEL_BIND: u8 = 4;
/// Wait events and tiered I/O detail are traced from this level up.
pub const TRACE_LEVEL_WAIT: u8 = 8;
/// The full execution plan is traced from this level up.
pub const TRACE_LEVEL_PLAN: u8 = 12;
pub const TRACE_LEVEL_MAX: u8 = 16;

/// Session tracing configuration. The level gates which optional record
/// families a statement emits; the boolean switches narrow them further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
	#[serde(rename = "trace_level")]
	pub level: u8,
	#[serde(rename = "trace_waits")]
	pub waits: bool,
	#[serde(rename = "trace_bind_variables")]
	pub bind_variables: bool,
	#[serde(rename = "trace_buffer_stats")]
	pub buffer_stats: bool,
	/// Block reads faster than this are attributed to the OS page cache
	/// rather than the disk.
	pub os_cache_threshold_us: u64,
	#[serde(rename = "trace_file_max_size_kb")]
	pub file_max_size_kb: u64,
	#[serde(rename = "trace_file_directory")]
	pub output_directory: PathBuf,
}

impl Default for TraceConfig {
	fn default() -> Self {
		Self {
			level: TRACE_LEVEL_OFF,
			waits: true,
			bind_variables: true,
			buffer_stats: true,
			os_cache_threshold_us: 500,
			file_max_size_kb: 10 * 1024,
			output_directory: PathBuf::from("/tmp"),
		}
	}
}

impl TraceConfig {
	pub fn validate(&self) -> Result<()> {
		if self.level > TRACE_LEVEL_MAX {
			return Err(Error(invalid_parameter_value("trace_level", self.level, 0, TRACE_LEVEL_MAX)));
		}
		if self.os_cache_threshold_us < 10 || self.os_cache_threshold_us > 10_000 {
			return Err(Error(invalid_parameter_value(
				"os_cache_threshold_us",
				self.os_cache_threshold_us,
				10,
				10_000,
			)));
		}
		if self.file_max_size_kb < 1024 || self.file_max_size_kb > 1024 * 1024 {
			return Err(Error(invalid_parameter_value(
				"trace_file_max_size_kb",
				self.file_max_size_kb,
				1024,
				1024 * 1024,
			)));
		}
		Ok(())
	}
}
