// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::{Duration, Instant};

use qtrace_core::{
	Fingerprint, LatencySample, OsUsage, ResourceUsage,
	interface::{BindParam, PlanNode, SnapshotSource, ValueRenderer},
};
use tracing::debug;

use crate::{
	config::{TRACE_LEVEL_PLAN, TRACE_LEVEL_WAIT, TraceConfig},
	plan,
	tier::{TierAccumulator, classify},
	waits,
};

pub(crate) const FRAME: &str = "=====================================================================";
pub(crate) const SEPARATOR: &str = "---------------------------------------------------------------------";

/// Cap on retained per-access samples for one statement; further events
/// still feed the tier accumulator but are not kept individually.
pub(crate) const MAX_IO_SAMPLES: usize = 500;

pub(crate) fn format_elapsed(duration: Duration) -> String {
	format!("{}.{:06}", duration.as_secs(), duration.subsec_micros())
}

/// Everything accumulated for one in-flight statement. Created at plan
/// start, fed through the execute window, drained once at execution end.
pub(crate) struct StatementTrace {
	pub(crate) statement_id: u64,
	pub(crate) fingerprint: Fingerprint,
	pub(crate) sql: String,
	pub(crate) parse_start: Instant,
	pub(crate) parse_end: Option<Instant>,
	pub(crate) exec_start: Option<Instant>,
	pub(crate) exec_end: Option<Instant>,
	pub(crate) rows: u64,
	pub(crate) resource_start: ResourceUsage,
	pub(crate) resource_end: Option<ResourceUsage>,
	pub(crate) os_start: Option<OsUsage>,
	pub(crate) os_end: Option<OsUsage>,
	pub(crate) samples: Vec<LatencySample>,
	pub(crate) samples_dropped: u64,
	pub(crate) tiers: TierAccumulator,
}

impl StatementTrace {
	pub(crate) fn open(statement_id: u64, sql: &str, source: &dyn SnapshotSource, pid: u32) -> Self {
		Self {
			statement_id,
			fingerprint: Fingerprint::of(sql),
			sql: sql.to_string(),
			parse_start: Instant::now(),
			parse_end: None,
			exec_start: None,
			exec_end: None,
			rows: 0,
			resource_start: source.resource_usage(),
			resource_end: None,
			os_start: source.os_usage(pid),
			os_end: None,
			samples: Vec::new(),
			samples_dropped: 0,
			tiers: TierAccumulator::default(),
		}
	}

	pub(crate) fn parse_done(&mut self) {
		self.parse_end = Some(Instant::now());
	}

	pub(crate) fn parse_lines(&self) -> Vec<String> {
		let elapsed = self
			.parse_end
			.map(|end| end.saturating_duration_since(self.parse_start))
			.unwrap_or_default();
		vec![
			FRAME.to_string(),
			format!("PARSE #{}", self.statement_id),
			format!("SQL: {}", self.sql),
			format!("SQL_ID: {}", self.fingerprint),
			format!("PARSE TIME: {}", format_elapsed(elapsed)),
		]
	}

	pub(crate) fn bind_lines<R: ValueRenderer>(&self, params: &[BindParam<R::Value>], renderer: &R) -> Vec<String> {
		if params.is_empty() {
			return Vec::new();
		}

		let mut lines = vec![SEPARATOR.to_string(), format!("BINDS #{}", self.statement_id)];
		for (index, param) in params.iter().enumerate() {
			let line = match &param.value {
				None => format!("Bind#{} type={} value=NULL", index, param.type_oid),
				Some(value) => match renderer.to_text(param.type_oid, value) {
					Ok(text) => {
						format!("Bind#{} type={} value=\"{}\"", index, param.type_oid, text)
					}
					Err(err) => {
						debug!("bind value render failed: {}", err);
						format!("Bind#{} type={} value=<unrenderable>", index, param.type_oid)
					}
				},
			};
			lines.push(line);
		}
		lines
	}

	/// Entering the execute window refreshes the OS snapshot so the CPU
	/// and I/O deltas cover execution rather than planning.
	pub(crate) fn execute_started(&mut self, source: &dyn SnapshotSource, pid: u32) {
		self.exec_start = Some(Instant::now());
		if let Some(usage) = source.os_usage(pid) {
			self.os_start = Some(usage);
		}
	}

	pub(crate) fn exec_header_lines(&self) -> Vec<String> {
		vec![SEPARATOR.to_string(), format!("EXEC #{}", self.statement_id)]
	}

	pub(crate) fn record_io(&mut self, sample: LatencySample, threshold_us: u64) {
		let tier = classify(&sample, threshold_us);
		self.tiers.record(tier, if sample.hit {
			0
		} else {
			sample.latency_us
		});
		if self.samples.len() < MAX_IO_SAMPLES {
			self.samples.push(sample);
		} else {
			self.samples_dropped += 1;
		}
	}

	pub(crate) fn execute_finished(&mut self, rows: u64) {
		self.exec_end = Some(Instant::now());
		self.rows = rows;
	}

	pub(crate) fn exec_time_lines(&self) -> Vec<String> {
		let elapsed = match (self.exec_start, self.exec_end) {
			(Some(start), Some(end)) => end.saturating_duration_since(start),
			_ => Duration::ZERO,
		};
		vec![format!("EXEC TIME: ela={} rows={}", format_elapsed(elapsed), self.rows)]
	}

	pub(crate) fn finalize(&mut self, source: &dyn SnapshotSource, pid: u32) {
		self.resource_end = Some(source.resource_usage());
		self.os_end = source.os_usage(pid);
	}

	/// The statistics, wait-event, and plan sections emitted at execution
	/// end, ending with the closing frame.
	pub(crate) fn final_lines(&self, config: &TraceConfig, root: Option<&dyn PlanNode>) -> Vec<String> {
		let resource_end = self.resource_end.unwrap_or(self.resource_start);
		let delta = ResourceUsage::diff(&self.resource_start, &resource_end);
		let os_delta = match (&self.os_start, &self.os_end) {
			(Some(start), Some(end)) => Some(OsUsage::diff(start, end)),
			_ => None,
		};

		let mut lines = vec![SEPARATOR.to_string()];

		if config.buffer_stats && (delta.has_shared() || delta.has_local() || delta.has_temp()) {
			let mut line = format!(
				"BUFFER STATS: cr={} pr={} pw={} dirtied={}",
				delta.shared_hit, delta.shared_read, delta.shared_written, delta.shared_dirtied
			);
			if delta.shared_reset() {
				line.push_str(" (counter reset detected)");
			}
			lines.push(line);

			if delta.has_local() {
				let mut line = format!(
					"  local blocks: hit={} read={} dirtied={} written={}",
					delta.local_hit, delta.local_read, delta.local_dirtied, delta.local_written
				);
				if delta.local_reset() {
					line.push_str(" (counter reset detected)");
				}
				lines.push(line);
			}
			if delta.has_temp() {
				let mut line =
					format!("  temp blocks: read={} written={}", delta.temp_read, delta.temp_written);
				if delta.temp_reset() {
					line.push_str(" (counter reset detected)");
				}
				lines.push(line);
			}
		}

		if delta.has_wal() {
			let mut line = format!(
				"WAL STATS: records={} fpi={} bytes={}",
				delta.wal_records, delta.wal_fpi, delta.wal_bytes
			);
			if delta.wal_reset() {
				line.push_str(" (counter reset detected)");
			}
			lines.push(line);
		}

		if let Some(os) = &os_delta {
			let total_secs = os.total_cpu_secs();
			let mut line = format!(
				"CPU: user={:.3} sec system={:.3} sec total={:.3} sec",
				os.utime_secs, os.stime_secs, total_secs
			);
			if total_secs < 0.01 {
				line.push_str(" (clock tick granularity; very fast statements may show 0.000)");
			}
			if os.reset_detected() {
				line.push_str(" (counter reset detected)");
			}
			lines.push(line);

			if os.has_io() {
				lines.push(format!(
					"IO: read_bytes={} write_bytes={} syscalls_r={} syscalls_w={}",
					os.read_bytes, os.write_bytes, os.syscr, os.syscw
				));
			}
		}

		if let Some(end) = &self.os_end {
			if end.vm_rss_kb > 0 {
				lines.push(format!("MEM: rss={} KB peak={} KB", end.vm_rss_kb, end.vm_peak_kb));
			}
		}

		if config.level >= TRACE_LEVEL_WAIT && config.waits {
			waits::write_wait_events(&mut lines, self);
			waits::write_io_summary(&mut lines, self, &delta, os_delta.as_ref(), config.os_cache_threshold_us);
		}

		if config.level >= TRACE_LEVEL_PLAN {
			if let Some(root) = root {
				lines.push(SEPARATOR.to_string());
				lines.push(format!("EXECUTION PLAN #{}:", self.statement_id));
				plan::write_plan(&mut lines, root, config.os_cache_threshold_us);
			}
		}

		lines.push(FRAME.to_string());
		lines.push(String::new());
		lines
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_elapsed_pads_microseconds() {
		assert_eq!(format_elapsed(Duration::new(3, 42_000)), "3.000042");
		assert_eq!(format_elapsed(Duration::ZERO), "0.000000");
		assert_eq!(format_elapsed(Duration::from_micros(1_500_000)), "1.500000");
	}
}
