// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	path::{Path, PathBuf},
	sync::Arc,
	time::{Instant, SystemTime, UNIX_EPOCH},
};

use qtrace_core::{
	Error, LatencySample, Result,
	diagnostic::{invalid_parameter_value, sink_unavailable},
	interface::{BindParam, PlanNode, SnapshotSource, TraceSink, ValueRenderer},
};
use tracing::{debug, instrument, warn};

use crate::{
	attribution::AttributionTable,
	config::{TRACE_LEVEL_BASIC, TRACE_LEVEL_BIND, TRACE_LEVEL_MAX, TRACE_LEVEL_WAIT, TraceConfig},
	sink::FileSink,
	statement::{StatementTrace, format_elapsed},
};

const BANNER: &str = "***********************************************************************";

/// Per-session trace controller.
///
/// Two states, Enabled and Disabled, switched only by [`enable`] /
/// [`disable`]. While enabled it owns the sink and at most one in-flight
/// [`StatementTrace`] at a time; the statement hooks are called by the
/// host in lifecycle order and every one of them is a no-op when there is
/// nothing to do. Nothing here can fail the traced statement.
///
/// [`enable`]: SessionTracer::enable
/// [`disable`]: SessionTracer::disable
pub struct SessionTracer {
	config: TraceConfig,
	pid: u32,
	enabled: bool,
	sink: Option<Box<dyn TraceSink>>,
	trace_path: Option<PathBuf>,
	sequence: u64,
	session_start: Instant,
	session_start_wall: SystemTime,
	current: Option<StatementTrace>,
	attribution: Option<Arc<AttributionTable>>,
}

impl std::fmt::Debug for SessionTracer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionTracer")
			.field("config", &self.config)
			.field("pid", &self.pid)
			.field("enabled", &self.enabled)
			.field("sink", &self.sink.as_ref().map(|_| "<sink>"))
			.field("trace_path", &self.trace_path)
			.field("sequence", &self.sequence)
			.field("attribution", &self.attribution.as_ref().map(|_| "<attribution>"))
			.finish()
	}
}

impl SessionTracer {
	pub fn new(config: TraceConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			pid: std::process::id(),
			enabled: false,
			sink: None,
			trace_path: None,
			sequence: 0,
			session_start: Instant::now(),
			session_start_wall: SystemTime::now(),
			current: None,
			attribution: None,
		})
	}

	/// Share an attribution table with storage-layer tracers; the current
	/// statement id is registered under this process id while it runs.
	pub fn with_attribution(mut self, table: Arc<AttributionTable>) -> Self {
		self.attribution = Some(table);
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn level(&self) -> u8 {
		self.config.level
	}

	pub fn sequence(&self) -> u64 {
		self.sequence
	}

	pub fn trace_path(&self) -> Option<&Path> {
		self.trace_path.as_deref()
	}

	pub fn has_open_statement(&self) -> bool {
		self.current.is_some()
	}

	/// Open the file sink and start tracing. Already enabled is a no-op:
	/// the sink and the statement sequence stay untouched. A sink that
	/// cannot be opened leaves the session enabled with every record
	/// silently discarded.
	pub fn enable(&mut self) {
		if self.enabled {
			return;
		}
		match FileSink::open(&self.config.output_directory, self.pid, self.config.file_max_size_kb) {
			Ok(sink) => {
				self.trace_path = Some(sink.path().to_path_buf());
				self.sink = Some(Box::new(sink));
			}
			Err(err) => {
				let diagnostic = sink_unavailable(
					&self.config.output_directory.display().to_string(),
					&err.to_string(),
				);
				warn!("{}", Error(diagnostic));
			}
		}
		self.enabled = true;
		self.write_header();
	}

	/// Start tracing into a caller-supplied sink.
	pub fn enable_with(&mut self, sink: Box<dyn TraceSink>) {
		if self.enabled {
			return;
		}
		self.sink = Some(sink);
		self.enabled = true;
		self.write_header();
	}

	/// Stop tracing: footer, flush, close. An in-flight statement is
	/// abandoned without being flushed.
	pub fn disable(&mut self) {
		if !self.enabled {
			return;
		}
		if let Some(statement) = self.current.take() {
			debug!("abandoning in-flight statement #{}", statement.statement_id);
			self.unregister_attribution();
		}
		self.write_footer();
		if let Some(mut sink) = self.sink.take() {
			sink.flush();
		}
		self.trace_path = None;
		self.enabled = false;
	}

	/// Change the trace level. Out-of-range values are rejected and the
	/// previous level is retained.
	pub fn set_level(&mut self, level: u8) -> Result<()> {
		if level > TRACE_LEVEL_MAX {
			return Err(Error(invalid_parameter_value("trace_level", level, 0, TRACE_LEVEL_MAX)));
		}
		self.config.level = level;
		if self.sink.is_some() {
			self.write(&format!("*** Trace level changed to {}", level));
		}
		Ok(())
	}

	/// Statement entered planning. Opens the trace context and takes the
	/// start snapshots. A nested statement while one is already in flight
	/// is ignored; the outer context survives.
	#[instrument(name = "trace::plan_begin", level = "trace", skip_all)]
	pub fn plan_begin(&mut self, sql: &str, source: &dyn SnapshotSource) {
		if !self.enabled || self.config.level < TRACE_LEVEL_BASIC {
			return;
		}
		if self.current.is_some() {
			debug!("nested statement while a trace context is open; outer context retained");
			return;
		}
		self.sequence += 1;
		let statement = StatementTrace::open(self.sequence, sql, source, self.pid);
		if let Some(table) = &self.attribution {
			if !table.register(self.pid, self.sequence) {
				debug!("attribution table full; statement #{} runs unattributed", self.sequence);
			}
		}
		self.current = Some(statement);
	}

	/// Planning finished; emits the PARSE record.
	#[instrument(name = "trace::plan_end", level = "trace", skip_all)]
	pub fn plan_end(&mut self) {
		let lines = match self.current.as_mut() {
			Some(statement) => {
				statement.parse_done();
				statement.parse_lines()
			}
			None => return,
		};
		self.write_lines(lines);
	}

	/// Emit the bind values, when the level and configuration ask for
	/// them. A value the renderer cannot convert becomes a placeholder.
	#[instrument(name = "trace::binds", level = "trace", skip_all)]
	pub fn binds<R: ValueRenderer>(&mut self, params: &[BindParam<R::Value>], renderer: &R) {
		if self.config.level < TRACE_LEVEL_BIND || !self.config.bind_variables {
			return;
		}
		let lines = match self.current.as_ref() {
			Some(statement) => statement.bind_lines(params, renderer),
			None => return,
		};
		self.write_lines(lines);
	}

	/// Execute window opens.
	#[instrument(name = "trace::execute_begin", level = "trace", skip_all)]
	pub fn execute_begin(&mut self, source: &dyn SnapshotSource) {
		let pid = self.pid;
		let lines = match self.current.as_mut() {
			Some(statement) => {
				statement.execute_started(source, pid);
				statement.exec_header_lines()
			}
			None => return,
		};
		self.write_lines(lines);
	}

	/// One block access observed inside the execute window.
	pub fn io_event(&mut self, sample: LatencySample) {
		if self.config.level < TRACE_LEVEL_WAIT || !self.config.waits {
			return;
		}
		let threshold = self.config.os_cache_threshold_us;
		if let Some(statement) = self.current.as_mut() {
			statement.record_io(sample, threshold);
		}
	}

	/// Execute window closes with the processed row count.
	#[instrument(name = "trace::execute_end", level = "trace", skip_all)]
	pub fn execute_end(&mut self, rows: u64) {
		let lines = match self.current.as_mut() {
			Some(statement) => {
				statement.execute_finished(rows);
				statement.exec_time_lines()
			}
			None => return,
		};
		self.write_lines(lines);
	}

	/// Statement is done: take the end snapshots, emit the statistics,
	/// wait-event and plan sections, and tear the context down.
	#[instrument(name = "trace::statement_end", level = "trace", skip_all)]
	pub fn statement_end(&mut self, root: Option<&dyn PlanNode>, source: &dyn SnapshotSource) {
		let Some(mut statement) = self.current.take() else {
			return;
		};
		self.unregister_attribution();
		statement.finalize(source, self.pid);
		let lines = statement.final_lines(&self.config, root);
		self.write_lines(lines);
	}

	fn unregister_attribution(&self) {
		if let Some(table) = &self.attribution {
			table.unregister(self.pid);
		}
	}

	fn write(&mut self, record: &str) {
		if let Some(sink) = self.sink.as_mut() {
			sink.write(record);
		}
	}

	fn write_lines(&mut self, lines: Vec<String>) {
		if self.sink.is_none() {
			return;
		}
		for line in lines {
			self.write(&line);
		}
	}

	fn write_header(&mut self) {
		let start = self
			.session_start_wall
			.duration_since(UNIX_EPOCH)
			.unwrap_or_default();
		let mut lines = vec![BANNER.to_string(), "*** Query Session Trace (10046-style)".to_string()];
		if let Some(path) = &self.trace_path {
			lines.push(format!("*** Trace File: {}", path.display()));
		}
		lines.push(format!("*** Session Start: {}", format_elapsed(start)));
		lines.push(format!("*** Process ID: {}", self.pid));
		lines.push(format!("*** Trace Level: {}", self.config.level));
		lines.push(format!(
			"*** Options: waits={} binds={} buffers={}",
			self.config.waits, self.config.bind_variables, self.config.buffer_stats
		));
		lines.push(BANNER.to_string());
		lines.push(String::new());
		self.write_lines(lines);
	}

	fn write_footer(&mut self) {
		let elapsed = self.session_start.elapsed();
		let lines = vec![
			String::new(),
			"*** SESSION END".to_string(),
			format!("*** Total session duration: {} seconds", format_elapsed(elapsed)),
			format!("*** Total statements traced: {}", self.sequence),
			"*** Trace file closed".to_string(),
		];
		self.write_lines(lines);
	}
}
