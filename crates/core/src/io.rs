// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifies one block in the host's storage namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
	pub space: u32,
	pub db: u32,
	pub rel: u32,
	pub block: u32,
}

impl Display for BlockId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}/{} block={}", self.space, self.db, self.rel, self.block)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoOp {
	Read,
	Write,
	Extend,
	Prefetch,
	Writeback,
	Sync,
}

impl IoOp {
	pub fn as_str(&self) -> &'static str {
		match self {
			IoOp::Read => "read",
			IoOp::Write => "write",
			IoOp::Extend => "extend",
			IoOp::Prefetch => "prefetch",
			IoOp::Writeback => "writeback",
			IoOp::Sync => "sync",
		}
	}
}

/// Which cache tier served a block access. Derived by the classifier from
/// latency and the hit flag; never supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoTier {
	EngineCacheHit,
	OsCacheHit,
	DiskRead,
}

/// One block access observed during an execute window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySample {
	pub block: BlockId,
	pub op: IoOp,
	pub latency_us: u64,
	/// True when the access was served from the engine's own cache with no
	/// system call.
	pub hit: bool,
}
