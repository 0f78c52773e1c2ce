// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use qtrace_core::interface::TraceSink;

/// Sink that collects records in memory. The buffer handle stays readable
/// after the sink itself has been moved into a tracer.
pub struct MemorySink {
	buffer: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self {
			buffer: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn handle(&self) -> MemoryBuffer {
		MemoryBuffer {
			buffer: Arc::clone(&self.buffer),
		}
	}
}

impl Default for MemorySink {
	fn default() -> Self {
		Self::new()
	}
}

impl TraceSink for MemorySink {
	fn write(&mut self, record: &str) {
		self.buffer.lock().push(record.to_string());
	}
}

#[derive(Clone)]
pub struct MemoryBuffer {
	buffer: Arc<Mutex<Vec<String>>>,
}

impl MemoryBuffer {
	pub fn records(&self) -> Vec<String> {
		self.buffer.lock().clone()
	}

	/// All records joined into one string, one record per line.
	pub fn text(&self) -> String {
		let records = self.buffer.lock();
		let mut text = String::new();
		for record in records.iter() {
			text.push_str(record);
			if !record.ends_with('\n') {
				text.push('\n');
			}
		}
		text
	}

	pub fn contains(&self, needle: &str) -> bool {
		self.text().contains(needle)
	}

	pub fn is_empty(&self) -> bool {
		self.buffer.lock().is_empty()
	}

	pub fn clear(&self) {
		self.buffer.lock().clear();
	}
}
