// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host snapshot contract for the prefab serializer.
//!
//! This crate defines the domain contract between the authoring host and the
//! prefab codec. It contains NO serialization logic for the prefab format;
//! that lives in prefab-codec.
//!
//! # Design Principles
//!
//! - **The host is slow and partial**: every snapshot field is optional on
//!   the wire and defaulted at this boundary.
//! - **One canonical property shape**: raw vs tagged described properties are
//!   resolved once, here, into [`DescribedProperty`].
//! - **Identity is injected**: file identifiers come from an [`IdGenerator`],
//!   never from ambient randomness inside the codec.

use thiserror::Error;

/// Error type for host snapshot queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The host has no node with the requested stable identifier.
    #[error("node not found: {0}")]
    NotFound(String),
    /// The host answered with data that could not be decoded.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    /// The host call itself failed.
    #[error("host error: {0}")]
    Host(String),
}

mod math;
mod port;
mod property;
mod types;

pub use math::{Quat, Vec3};
pub use port::{IdGenerator, NodeSource};
pub use property::{reference_id_of, DescribedProperty};
pub use types::{ComponentSnapshot, NodeQuery, NodeSnapshot, StableId, TransformSnapshot};
