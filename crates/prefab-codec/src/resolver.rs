// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stable identifier → position tables and reference resolution.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::warn;

use crate::error::RegisterError;
use crate::ident;
use crate::kind::PropertyKind;
use crate::record::Reference;

/// What a registered identifier points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A node record.
    Node,
    /// A component record.
    Component,
}

/// Outcome of resolving one reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Target lives in this sequence.
    Internal(usize),
    /// Asset stored outside the sequence.
    Persistent {
        /// Identifier as written (compacted unless the kind forbids it).
        uuid: String,
        /// Expected kind tag.
        expected_type: &'static str,
    },
    /// The reference was empty.
    Empty,
    /// A node or component reference whose target is not in this sequence.
    OutOfGraph,
}

impl Resolution {
    /// Wire form of the outcome; empty and out-of-graph both become null.
    pub fn into_reference(self) -> Reference {
        match self {
            Self::Internal(i) => Reference::Index(i),
            Self::Persistent {
                uuid,
                expected_type,
            } => Reference::Persistent {
                uuid,
                expected_type: expected_type.to_string(),
            },
            Self::Empty | Self::OutOfGraph => Reference::Null,
        }
    }
}

/// Snapshot of the identifier tables, ordered for stable comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolverTables {
    /// Node identifier → position.
    pub nodes: BTreeMap<String, usize>,
    /// Component identifier → position.
    pub components: BTreeMap<String, usize>,
}

/// Identifier tables for one serialization pass.
///
/// Owned exclusively by the pass; never shared.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    targets: HashMap<String, (TargetKind, usize)>,
    compact_asset_ids: bool,
}

impl ReferenceResolver {
    /// Empty resolver. `compact_asset_ids` controls asset identifier compaction.
    pub fn new(compact_asset_ids: bool) -> Self {
        Self {
            targets: HashMap::new(),
            compact_asset_ids,
        }
    }

    /// Bind `id` to `position`. The first binding of an identifier wins.
    pub fn register(
        &mut self,
        id: &str,
        kind: TargetKind,
        position: usize,
    ) -> Result<(), RegisterError> {
        if id.is_empty() {
            return Err(RegisterError::Empty);
        }
        if let Some((_, existing)) = self.targets.get(id) {
            warn!(id, existing, rejected = position, "duplicate identifier");
            return Err(RegisterError::Duplicate {
                id: id.to_string(),
                existing: *existing,
            });
        }
        self.targets.insert(id.to_string(), (kind, position));
        Ok(())
    }

    /// Binding for `id`, if any.
    pub fn lookup(&self, id: &str) -> Option<(TargetKind, usize)> {
        self.targets.get(id).copied()
    }

    /// Resolve a reference to `id` declared with `kind`.
    pub fn resolve(&self, id: &str, kind: &PropertyKind) -> Resolution {
        if id.is_empty() {
            return Resolution::Empty;
        }
        match kind {
            PropertyKind::Node => self.internal(id, TargetKind::Node),
            PropertyKind::Component => self.internal(id, TargetKind::Component),
            PropertyKind::Asset(asset) => {
                let uuid = if self.compact_asset_ids && asset.compacts() {
                    ident::compact(id)
                } else {
                    id.to_string()
                };
                Resolution::Persistent {
                    uuid,
                    expected_type: asset.expected_type(),
                }
            }
            _ => Resolution::OutOfGraph,
        }
    }

    fn internal(&self, id: &str, want: TargetKind) -> Resolution {
        match self.targets.get(id) {
            Some((kind, position)) if *kind == want => Resolution::Internal(*position),
            _ => Resolution::OutOfGraph,
        }
    }

    /// Number of bound identifiers.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Ordered copy of the tables.
    pub fn tables(&self) -> ResolverTables {
        let mut tables = ResolverTables::default();
        for (id, (kind, position)) in &self.targets {
            let table = match kind {
                TargetKind::Node => &mut tables.nodes,
                TargetKind::Component => &mut tables.components,
            };
            table.insert(id.clone(), *position);
        }
        tables
    }
}
