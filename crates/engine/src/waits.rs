// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Wait-event emission and the per-statement block I/O summary.

use qtrace_core::{OsDelta, ResourceDelta};

use crate::{
	statement::{SEPARATOR, StatementTrace},
	tier::{BLOCK_SIZE_BYTES, estimate_split, verification_note},
};

/// At most this many individual wait events are printed per statement; the
/// rest collapse into an overflow note.
const WAIT_PRINT_CAP: usize = 100;

pub(crate) fn write_wait_events(lines: &mut Vec<String>, statement: &StatementTrace) {
	if statement.samples.is_empty() {
		return;
	}

	lines.push(SEPARATOR.to_string());
	lines.push("WAIT EVENTS:".to_string());

	let mut printed = 0usize;
	for sample in &statement.samples {
		if sample.hit || sample.latency_us == 0 {
			continue;
		}
		if printed >= WAIT_PRINT_CAP {
			let total = statement.samples.len() as u64 + statement.samples_dropped;
			lines.push(format!(
				"  ... (showing first {} wait events only, total: {})",
				WAIT_PRINT_CAP, total
			));
			break;
		}
		lines.push(format!(
			"WAIT #{}: nam='db file {}' ela={} file#={}/{}/{} block={}",
			statement.statement_id,
			sample.op.as_str(),
			sample.latency_us,
			sample.block.space,
			sample.block.db,
			sample.block.rel,
			sample.block.block
		));
		printed += 1;
	}

	if printed == 0 {
		lines.push("  (no physical I/O - all blocks from cache)".to_string());
	}
}

pub(crate) fn write_io_summary(
	lines: &mut Vec<String>,
	statement: &StatementTrace,
	delta: &ResourceDelta,
	os_delta: Option<&OsDelta>,
	threshold_us: u64,
) {
	let tiers = &statement.tiers;
	let mut disk_reads = tiers.disk_reads;

	if tiers.total_blocks() > 0 {
		lines.push(SEPARATOR.to_string());
		lines.push("BLOCK I/O SUMMARY:".to_string());
		lines.push(format!("Total blocks accessed: {}", tiers.total_blocks()));
		lines.push(format!("  Buffer hits (cr): {} blocks - no I/O", tiers.engine_hits));
		if let Some(avg) = tiers.avg_os_cache_us() {
			lines.push(format!("  OS cache reads: {} blocks, avg={:.1} us", tiers.os_cache_hits, avg));
		}
		if let Some(avg) = tiers.avg_disk_us() {
			lines.push(format!("  Physical reads (pr): {} blocks, avg={:.1} us", tiers.disk_reads, avg));
			lines.push(format!("  Total disk I/O time: {:.2} ms", tiers.disk_time_us as f64 / 1000.0));
		}
	} else if delta.shared_read > 0 && delta.read_time_us > 0 {
		// no per-access samples; fall back to the aggregate counters
		let estimate = estimate_split(delta.shared_read as u64, delta.read_time_us as u64, threshold_us);
		disk_reads = estimate.disk;
		lines.push(SEPARATOR.to_string());
		lines.push("BLOCK I/O SUMMARY (estimated from aggregate timing, heuristic):".to_string());
		lines.push(format!("Total reads: {}, avg={:.1} us/block", delta.shared_read, estimate.avg_us));
		if estimate.os_cache > 0 {
			lines.push(format!("  ~{} from OS cache", estimate.os_cache));
		}
		if estimate.disk > 0 {
			lines.push(format!("  ~{} from disk", estimate.disk));
		}
	} else {
		return;
	}

	let Some(os) = os_delta else {
		return;
	};
	if os.read_bytes < 0 {
		return;
	}
	let read_bytes = os.read_bytes as u64;
	lines.push("Verification from OS counters:".to_string());
	lines.push(format!("  Physical read bytes: {} ({} blocks)", read_bytes, read_bytes / BLOCK_SIZE_BYTES));
	if let Some(note) = verification_note(disk_reads, read_bytes) {
		lines.push(format!("  Note: {}", note));
	}
}
