// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for serialization passes.

use prefab_port::SourceError;
use thiserror::Error;

/// Fatal serialization failure.
///
/// Soft issues never surface here; they go to the pass's diagnostics.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// A node is its own ancestor.
    #[error("cycle detected at node {id}")]
    Cycle {
        /// Stable identifier of the node that closed the cycle.
        id: String,
    },
    /// The host source failed while assembling a snapshot.
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    /// The serializer broke one of its own invariants.
    #[error("internal error: {0}")]
    Internal(String),
    /// Rendering the output failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected identifier registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The identifier is already bound; the first binding is kept.
    #[error("identifier {id} already registered at position {existing}")]
    Duplicate {
        /// Identifier that was registered twice.
        id: String,
        /// Position of the binding that was kept.
        existing: usize,
    },
    /// Empty identifiers are never registered.
    #[error("empty identifier")]
    Empty,
}
