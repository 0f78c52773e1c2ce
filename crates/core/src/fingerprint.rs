// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Stable identifier for a statement text. The same text always yields the
/// same fingerprint across sessions and processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
	pub fn of(text: &str) -> Self {
		Self(xxh3_64(text.as_bytes()))
	}
}

impl Display for Fingerprint {
	/// Rendered as the leading 13 lowercase hex digits, Oracle SQL_ID
	/// width.
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let hex = format!("{:016x}", self.0);
		f.write_str(&hex[..13])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_same_text_same_fingerprint() {
		let a = Fingerprint::of("SELECT * FROM orders WHERE id = $1");
		let b = Fingerprint::of("SELECT * FROM orders WHERE id = $1");
		assert_eq!(a, b);
	}

	#[test]
	fn test_distinct_text_distinct_fingerprint() {
		let a = Fingerprint::of("SELECT * FROM orders WHERE id = $1");
		let b = Fingerprint::of("SELECT * FROM orders WHERE id = $2");
		assert_ne!(a, b);
	}

	#[test]
	fn test_rendered_width_is_thirteen() {
		let rendered = Fingerprint::of("SELECT 1").to_string();
		assert_eq!(rendered.len(), 13);
		assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn test_empty_text_has_fingerprint() {
		let rendered = Fingerprint::of("").to_string();
		assert_eq!(rendered.len(), 13);
	}
}
