// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
	time::{SystemTime, UNIX_EPOCH},
};

use qtrace_core::interface::TraceSink;

/// Trace sink backed by one file per session, named
/// `qtrace_<pid>_<unix-secs>.trc` under the configured directory.
///
/// Writes are flushed per record so the trace can be followed live. Once
/// the configured size limit is reached the sink writes a single
/// truncation marker and discards everything after it; it never errors.
pub struct FileSink {
	file: File,
	path: PathBuf,
	max_bytes: u64,
	written: u64,
	truncated: bool,
}

impl FileSink {
	pub fn open(directory: &Path, pid: u32, max_size_kb: u64) -> io::Result<Self> {
		fs::create_dir_all(directory)?;
		let stamp = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
		let path = directory.join(format!("qtrace_{}_{}.trc", pid, stamp));
		let file = File::create(&path)?;
		Ok(Self {
			file,
			path,
			max_bytes: max_size_kb * 1024,
			written: 0,
			truncated: false,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl TraceSink for FileSink {
	fn write(&mut self, record: &str) {
		if self.truncated {
			return;
		}
		let record_bytes = record.len() as u64 + 1;
		if self.written + record_bytes > self.max_bytes {
			self.truncated = true;
			let _ = writeln!(self.file, "*** trace file size limit reached, output truncated");
			let _ = self.file.flush();
			return;
		}
		if writeln!(self.file, "{}", record).is_ok() {
			self.written += record_bytes;
		}
		let _ = self.file.flush();
	}

	fn flush(&mut self) {
		let _ = self.file.flush();
	}
}
