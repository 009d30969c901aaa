//! Shared test utilities for assetsync integration tests.
//!
//! This module provides:
//! - `SyncHarness` for isolated runs inside a temp theme directory
//! - `TargetBuilder` for declaring targets with theme-relative paths

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::SyncHarness;
