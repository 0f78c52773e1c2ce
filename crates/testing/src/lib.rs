// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared fixtures for qtrace tests: an in-memory sink, a scripted snapshot
//! source, canned plan trees, value renderers, and a temp directory helper.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use plan::TestNode;
pub use render::{FailingRenderer, TextRenderer};
pub use sink::{MemoryBuffer, MemorySink};
pub use source::StubSource;
pub use tempdir::temp_dir;

mod plan;
mod render;
mod sink;
mod source;
mod tempdir;
