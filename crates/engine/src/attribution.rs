// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::Mutex;

/// Maps an OS process id to the statement it is currently executing, so a
/// block I/O event observed at the storage layer can be attributed to the
/// statement that caused it.
///
/// Fixed capacity, one lock, linear scan. The lock is never held across
/// I/O or any blocking call. Attribution is best-effort: when the table is
/// full, registration fails silently and the I/O event is simply recorded
/// without a statement id.
pub struct AttributionTable {
	slots: Mutex<Box<[Slot]>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
	pid: u32,
	statement_id: u64,
	active: bool,
}

impl AttributionTable {
	pub fn new(capacity: usize) -> Self {
		Self {
			slots: Mutex::new(vec![Slot::default(); capacity].into_boxed_slice()),
		}
	}

	/// Claim a slot for `pid`. A process re-registering updates its own
	/// slot. Returns false when every slot is taken by another process.
	pub fn register(&self, pid: u32, statement_id: u64) -> bool {
		let mut slots = self.slots.lock();
		let mut free = None;
		for (index, slot) in slots.iter().enumerate() {
			if slot.active && slot.pid == pid {
				free = Some(index);
				break;
			}
			if !slot.active && free.is_none() {
				free = Some(index);
			}
		}
		match free {
			Some(index) => {
				slots[index] = Slot {
					pid,
					statement_id,
					active: true,
				};
				true
			}
			None => false,
		}
	}

	pub fn unregister(&self, pid: u32) {
		let mut slots = self.slots.lock();
		for slot in slots.iter_mut() {
			if slot.active && slot.pid == pid {
				*slot = Slot::default();
				return;
			}
		}
	}

	pub fn lookup(&self, pid: u32) -> Option<u64> {
		let slots = self.slots.lock();
		slots.iter().find(|slot| slot.active && slot.pid == pid).map(|slot| slot.statement_id)
	}

	pub fn active_count(&self) -> usize {
		self.slots.lock().iter().filter(|slot| slot.active).count()
	}
}
