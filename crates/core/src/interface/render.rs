// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// One bound parameter of a statement, in the host's own value
/// representation. `None` is an SQL NULL and is always traced explicitly.
#[derive(Debug, Clone)]
pub struct BindParam<V> {
	pub type_oid: u32,
	pub value: Option<V>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("no output conversion for type {0}")]
	UnknownType(u32),
	#[error("{0}")]
	Conversion(String),
}

/// Converts a host value to its textual form for the trace. A failure never
/// aborts the trace; the engine substitutes a placeholder.
pub trait ValueRenderer {
	type Value;

	fn to_text(&self, type_oid: u32, value: &Self::Value) -> Result<String, RenderError>;
}
