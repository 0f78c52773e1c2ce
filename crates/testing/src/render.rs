// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use qtrace_core::interface::{RenderError, ValueRenderer};

/// Renderer over plain strings; always succeeds.
pub struct TextRenderer;

impl ValueRenderer for TextRenderer {
	type Value = String;

	fn to_text(&self, _type_oid: u32, value: &String) -> Result<String, RenderError> {
		Ok(value.clone())
	}
}

/// Renderer that fails for every value, for exercising the placeholder
/// path.
pub struct FailingRenderer;

impl ValueRenderer for FailingRenderer {
	type Value = String;

	fn to_text(&self, type_oid: u32, _value: &String) -> Result<String, RenderError> {
		Err(RenderError::UnknownType(type_oid))
	}
}
