// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_fmt(format_args!("{}", self.code))
	}
}

/// A tunable was set outside its permitted range. The previous setting is
/// always retained.
pub fn invalid_parameter_value(param: &str, value: impl Display, min: impl Display, max: impl Display) -> Diagnostic {
	Diagnostic {
		code: "TRACE_001".to_string(),
		message: format!("{} must be between {} and {}", param, min, max),
		label: Some(format!("got {}", value)),
		help: Some(format!("choose a value in the range [{}, {}]", min, max)),
		notes: vec![],
	}
}

/// The trace sink could not be opened. Tracing degrades to discarding
/// records; the traced statement itself is never affected.
pub fn sink_unavailable(target: &str, reason: &str) -> Diagnostic {
	Diagnostic {
		code: "TRACE_002".to_string(),
		message: format!("could not open trace sink \"{}\"", target),
		label: Some(reason.to_string()),
		help: Some("check that the output directory exists and is writable".to_string()),
		notes: vec!["records are discarded until the session is re-enabled".to_string()],
	}
}
