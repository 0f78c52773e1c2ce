// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Data model and collaborator interfaces for the statement trace engine.
//!
//! This crate carries everything the engine and the host share: resource and
//! OS usage snapshots with their signed deltas, block I/O samples and cache
//! tiers, the statement fingerprint, the diagnostic error type, and the
//! narrow traits the host implements (snapshot source, sink, plan node,
//! value renderer).

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use diagnostic::Diagnostic;
pub use error::Error;
pub use fingerprint::Fingerprint;
pub use io::{BlockId, IoOp, IoTier, LatencySample};
pub use os::{OsDelta, OsUsage};
pub use resource::{ResourceDelta, ResourceUsage};

pub mod diagnostic;
mod error;
mod fingerprint;
pub mod interface;
mod io;
mod os;
mod resource;

pub type Result<T> = std::result::Result<T, Error>;
