// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for prefab crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`builders`] - Snapshot builders for nodes and components
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`ids`] - Deterministic file identifier generator
//! - [`logging`] - Tracing subscriber for tests

pub mod builders;
pub mod config;
pub mod ids;
pub mod logging;

// Re-export commonly used items at crate root for convenience
pub use builders::{ComponentBuilder, NodeBuilder};
pub use config::InMemoryConfigStore;
pub use ids::SequentialIdGenerator;
pub use logging::init_tracing;
