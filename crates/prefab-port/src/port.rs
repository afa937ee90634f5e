// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capabilities the serializer consumes from its environment.

use crate::types::NodeQuery;
use crate::SourceError;

/// Host snapshot port.
///
/// Implementors answer one node query at a time. Queries may be slow and the
/// answers partial; the caller tolerates missing optional fields.
///
/// # Ordering
///
/// Callers issue queries sequentially, parent before children. Implementations
/// need not be re-entrant.
pub trait NodeSource {
    /// Fetch one node by stable identifier.
    fn fetch_node(&self, id: &str) -> Result<NodeQuery, SourceError>;
}

impl<T: NodeSource + ?Sized> NodeSource for &T {
    fn fetch_node(&self, id: &str) -> Result<NodeQuery, SourceError> {
        (**self).fetch_node(id)
    }
}

/// Identifier generation capability.
///
/// The serializer asks for a fresh file identifier whenever a snapshot does
/// not carry one. Tests supply deterministic sequences.
pub trait IdGenerator {
    /// Produce a new persistent file identifier.
    fn file_id(&mut self) -> String;
}

impl<T: IdGenerator + ?Sized> IdGenerator for &mut T {
    fn file_id(&mut self) -> String {
        (**self).file_id()
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Box<T> {
    fn file_id(&mut self) -> String {
        (**self).file_id()
    }
}
