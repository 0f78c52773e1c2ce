// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fs;

use qtrace_core::interface::TraceSink;
use qtrace_engine::{FileSink, SessionTracer, TraceConfig};
use qtrace_testing::{StubSource, temp_dir};

#[test]
fn test_session_writes_trace_file() {
	temp_dir(|dir| {
		let config = TraceConfig {
			level: 1,
			output_directory: dir.to_path_buf(),
			..Default::default()
		};
		let mut tracer = SessionTracer::new(config).unwrap();
		tracer.enable();
		let path = tracer.trace_path().unwrap().to_path_buf();
		let name = path.file_name().unwrap().to_str().unwrap();
		assert!(name.starts_with(&format!("qtrace_{}_", std::process::id())));
		assert!(name.ends_with(".trc"));

		let source = StubSource::new();
		tracer.plan_begin("SELECT 1", &source);
		tracer.plan_end();
		source.add_shared(3, 1);
		tracer.statement_end(None, &source);
		tracer.disable();
		assert!(tracer.trace_path().is_none());

		let text = fs::read_to_string(&path)?;
		assert!(text.contains("*** Query Session Trace (10046-style)"));
		assert!(text.contains(&format!("*** Trace File: {}", path.display())));
		assert!(text.contains("PARSE #1"));
		assert!(text.contains("BUFFER STATS: cr=3 pr=1 pw=0 dirtied=0"));
		assert!(text.contains("*** SESSION END"));
		assert!(text.contains("*** Total statements traced: 1"));
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_missing_directory_is_created() {
	temp_dir(|dir| {
		let nested = dir.join("a").join("b");
		let sink = FileSink::open(&nested, 1, 1024).unwrap();
		assert!(sink.path().starts_with(&nested));
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_size_limit_truncates_with_marker() {
	temp_dir(|dir| {
		// 1 KB cap fills quickly
		let mut sink = FileSink::open(dir, 7, 1).unwrap();
		let path = sink.path().to_path_buf();
		let line = "x".repeat(100);
		for _ in 0..20 {
			sink.write(&line);
		}
		sink.flush();

		let text = fs::read_to_string(&path)?;
		let marker_count =
			text.lines().filter(|l| l.contains("trace file size limit reached")).count();
		assert_eq!(marker_count, 1);
		assert!(text.len() <= 1024 + 100);
		// records after the marker are discarded
		assert!(text.ends_with("output truncated\n"));
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_unwritable_directory_degrades_to_discard() {
	temp_dir(|dir| {
		let blocked = dir.join("blocked");
		// a plain file where the directory should be
		fs::write(&blocked, b"not a directory")?;

		let config = TraceConfig {
			level: 1,
			output_directory: blocked.join("sub"),
			..Default::default()
		};
		let mut tracer = SessionTracer::new(config).unwrap();
		tracer.enable();
		assert!(tracer.is_enabled());
		assert!(tracer.trace_path().is_none());

		// the statement still runs and trace calls are silent no-ops
		let source = StubSource::new();
		tracer.plan_begin("SELECT 1", &source);
		tracer.plan_end();
		tracer.statement_end(None, &source);
		assert_eq!(tracer.sequence(), 1);
		tracer.disable();
		Ok(())
	})
	.unwrap();
}
