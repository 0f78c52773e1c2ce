// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Execution plan rendering: a deterministic pre-order walk over the
//! host's finished plan tree, one record block per node.

use qtrace_core::{ResourceUsage, interface::PlanNode};

use crate::tier::estimate_split;

/// Indentation stops deepening past this level; traversal itself is
/// unbounded.
const MAX_RENDER_DEPTH: usize = 64;

/// Pre-order traversal: the node itself, then every child in the order the
/// node enumerates them. Borrows only; the tree is never touched.
pub fn walk<'a>(root: &'a dyn PlanNode, visit: &mut dyn FnMut(usize, &'a dyn PlanNode)) {
	walk_node(root, 0, visit);
}

fn walk_node<'a>(node: &'a dyn PlanNode, depth: usize, visit: &mut dyn FnMut(usize, &'a dyn PlanNode)) {
	visit(depth, node);
	for child in node.children() {
		walk_node(child, depth + 1, visit);
	}
}

/// Render the whole plan into `lines`, one statistics block per node.
pub fn write_plan(lines: &mut Vec<String>, root: &dyn PlanNode, threshold_us: u64) {
	walk(root, &mut |depth, node| write_node(lines, node, depth, threshold_us));
}

fn indent(depth: usize) -> String {
	"  ".repeat(depth.min(MAX_RENDER_DEPTH))
}

fn write_node(lines: &mut Vec<String>, node: &dyn PlanNode, depth: usize, threshold_us: u64) {
	let pad = indent(depth);
	lines.push(format!("{}-> {}", pad, node.tag()));

	let Some(instrumentation) = node.instrumentation() else {
		return;
	};
	// never executed, e.g. a pruned branch
	if instrumentation.loops == 0 {
		return;
	}

	let total_ms = instrumentation.total.as_secs_f64() * 1000.0;
	let startup_ms = instrumentation.startup.as_secs_f64() * 1000.0;

	lines.push(format!(
		"{}   Rows: actual={} loops={}",
		pad,
		instrumentation.rows_per_loop(),
		instrumentation.loops
	));
	let mut timing = format!("{}   Time: startup={:.3} total={:.3} (ms)", pad, startup_ms, total_ms);
	if instrumentation.loops > 1 {
		timing.push_str(&format!(", avg={:.3} ms/loop", total_ms / instrumentation.loops as f64));
	}
	lines.push(timing);

	if let Some(usage) = &instrumentation.resource_usage {
		write_node_buffers(lines, &pad, usage);
		write_node_io(lines, &pad, usage, total_ms, threshold_us);
		if usage.wal_records > 0 || usage.wal_fpi > 0 || usage.wal_bytes > 0 {
			lines.push(format!(
				"{}   WAL: records={} fpi={} bytes={}",
				pad, usage.wal_records, usage.wal_fpi, usage.wal_bytes
			));
		}
	}
}

fn write_node_buffers(lines: &mut Vec<String>, pad: &str, usage: &ResourceUsage) {
	if usage.shared_hit > 0 || usage.shared_read > 0 || usage.shared_dirtied > 0 || usage.shared_written > 0 {
		let mut line =
			format!("{}   Buffers: shared hit={} read={}", pad, usage.shared_hit, usage.shared_read);
		if usage.shared_dirtied > 0 {
			line.push_str(&format!(" dirtied={}", usage.shared_dirtied));
		}
		if usage.shared_written > 0 {
			line.push_str(&format!(" written={}", usage.shared_written));
		}
		let total = usage.shared_hit + usage.shared_read;
		if total > 0 {
			line.push_str(&format!(" ({:.1}% cache hit)", usage.shared_hit as f64 / total as f64 * 100.0));
		}
		lines.push(line);
	}

	if usage.local_hit > 0 || usage.local_read > 0 || usage.local_dirtied > 0 || usage.local_written > 0 {
		let mut line = format!("{}            local hit={} read={}", pad, usage.local_hit, usage.local_read);
		if usage.local_dirtied > 0 {
			line.push_str(&format!(" dirtied={}", usage.local_dirtied));
		}
		if usage.local_written > 0 {
			line.push_str(&format!(" written={}", usage.local_written));
		}
		lines.push(line);
	}

	if usage.temp_read > 0 || usage.temp_written > 0 {
		lines.push(format!("{}            temp read={} written={}", pad, usage.temp_read, usage.temp_written));
	}
}

fn write_node_io(lines: &mut Vec<String>, pad: &str, usage: &ResourceUsage, total_ms: f64, threshold_us: u64) {
	if usage.shared_read == 0 || usage.read_time_us == 0 {
		return;
	}

	let estimate = estimate_split(usage.shared_read, usage.read_time_us, threshold_us);
	let io_ms = usage.read_time_us as f64 / 1000.0;

	let mut line = format!("{}   I/O: total={:.3} ms, avg={:.1} us/block", pad, io_ms, estimate.avg_us);
	if estimate.os_cache > 0 {
		line.push_str(&format!(", ~{} from OS cache", estimate.os_cache));
	}
	if estimate.disk > 0 {
		line.push_str(&format!(", ~{} from disk", estimate.disk));
	}
	line.push_str(" (estimated)");
	lines.push(line);

	let cpu_ms = total_ms - io_ms;
	if cpu_ms > 0.0 && total_ms > 0.0 {
		lines.push(format!(
			"{}   Time breakdown: CPU ~{:.3} ms ({:.1}%), I/O ~{:.3} ms ({:.1}%)",
			pad,
			cpu_ms,
			cpu_ms / total_ms * 100.0,
			io_ms,
			io_ms / total_ms * 100.0
		));
	}
}
