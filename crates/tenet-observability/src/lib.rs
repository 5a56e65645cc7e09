// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # tenet-observability
//!
//! Logging infrastructure for tenet tools.
//!
//! Provides consistent console tracing across all tenet crates with
//! per-crate debug flag support.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use init::*;

/// Known tenet crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &["tenet-reconstruction", "tenet-structures", "tenet-config"];
