//! Integration test suite for short-modules
//!
//! End-to-end tests that evaluate module files on disk, both through the
//! library API and through the `short` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `short eval` and `short imports` as a user runs them
//! - **config**: user-level configuration picked up by the binary
//! - **eval**: library evaluation over real files (caching, cycles, depth)
//! - **golden**: before/after fixtures under `tests/fixtures/imports`

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;
#[path = "../fixtures/mod.rs"]
mod fixtures;

mod cli;
mod config;
mod eval;
mod golden;
