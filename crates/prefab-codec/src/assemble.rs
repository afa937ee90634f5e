// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot assembly: build a snapshot tree by querying a [`NodeSource`].
//!
//! Queries are strictly sequential. A parent is fetched before any of its
//! children are requested, and children are requested in order.

use prefab_app_core::diagnostics::{DiagnosticKind, DiagnosticLog};
use prefab_port::{NodeSnapshot, NodeSource, SourceError};
use tracing::{debug, instrument};

use crate::error::SerializeError;

/// A fetched tree plus the soft issues met while fetching it.
#[derive(Debug)]
pub struct Assembled {
    /// The snapshot tree.
    pub root: NodeSnapshot,
    /// Skipped children and similar issues.
    pub diagnostics: DiagnosticLog,
}

/// Drives a [`NodeSource`] to build a complete snapshot.
pub struct SnapshotAssembler<S> {
    source: S,
}

impl<S: NodeSource> SnapshotAssembler<S> {
    /// Assembler over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the assembler and return the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Fetch the tree rooted at `root_id`.
    ///
    /// A missing root or a failing host is an error. A child that cannot be
    /// found is skipped with a warning. A node reachable from itself aborts
    /// with [`SerializeError::Cycle`].
    #[instrument(skip(self))]
    pub fn assemble(&self, root_id: &str) -> Result<Assembled, SerializeError> {
        let mut diagnostics = DiagnosticLog::new();
        let root = self.fetch_tree(root_id, &mut Vec::new(), &mut diagnostics)?;
        debug!(nodes = root.node_count(), "assembled snapshot");
        Ok(Assembled { root, diagnostics })
    }

    fn fetch_tree(
        &self,
        id: &str,
        path: &mut Vec<String>,
        diagnostics: &mut DiagnosticLog,
    ) -> Result<NodeSnapshot, SerializeError> {
        if path.iter().any(|p| p == id) {
            return Err(SerializeError::Cycle { id: id.to_string() });
        }
        let mut query = self.source.fetch_node(id)?;
        query.id.get_or_insert_with(|| id.to_string());
        let child_ids = std::mem::take(&mut query.children);

        path.push(id.to_string());
        let mut children = Vec::with_capacity(child_ids.len());
        for child_id in &child_ids {
            match self.fetch_tree(child_id, path, diagnostics) {
                Ok(child) => children.push(child),
                Err(SerializeError::Source(SourceError::NotFound(_))) => {
                    diagnostics.warn(
                        DiagnosticKind::UnresolvedReference,
                        Some(child_id.as_str()),
                        format!("child of {id} not found; skipped"),
                    );
                }
                Err(err) => return Err(err),
            }
        }
        path.pop();

        Ok(query.into_snapshot(children))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::mock_source::MockSource;
    use prefab_port::NodeQuery;

    fn query(name: &str, children: &[&str]) -> NodeQuery {
        NodeQuery {
            name: Some(name.into()),
            children: children.iter().map(|c| (*c).to_string()).collect(),
            ..NodeQuery::default()
        }
    }

    #[test]
    fn fetches_parent_before_children_in_order() {
        let mut source = MockSource::new();
        source
            .insert("r", query("Root", &["a", "b"]))
            .insert("a", query("A", &["a1"]))
            .insert("a1", query("A1", &[]))
            .insert("b", query("B", &[]));
        let asm = SnapshotAssembler::new(&source);
        let out = asm.assemble("r").unwrap();
        assert_eq!(out.root.node_count(), 4);
        assert_eq!(source.fetch_log(), vec!["r", "a", "a1", "b"]);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn missing_child_is_skipped() {
        let mut source = MockSource::new();
        source
            .insert("r", query("Root", &["gone", "b"]))
            .insert("b", query("B", &[]));
        let out = SnapshotAssembler::new(&source).assemble("r").unwrap();
        assert_eq!(out.root.children.len(), 1);
        assert_eq!(out.diagnostics.count(DiagnosticKind::UnresolvedReference), 1);
    }

    #[test]
    fn missing_root_is_an_error() {
        let source = MockSource::new();
        let err = SnapshotAssembler::new(source).assemble("r").unwrap_err();
        assert!(matches!(err, SerializeError::Source(SourceError::NotFound(_))));
    }

    #[test]
    fn host_failure_propagates() {
        let mut source = MockSource::new();
        source.insert("r", query("Root", &["bad"]));
        source.failing.push("bad".into());
        let err = SnapshotAssembler::new(source).assemble("r").unwrap_err();
        assert!(matches!(err, SerializeError::Source(SourceError::Host(_))));
    }

    #[test]
    fn cycle_is_detected() {
        let mut source = MockSource::new();
        source
            .insert("r", query("Root", &["a"]))
            .insert("a", query("A", &["r"]));
        let err = SnapshotAssembler::new(&source).assemble("r").unwrap_err();
        assert!(matches!(err, SerializeError::Cycle { id } if id == "r"));
    }

    #[test]
    fn shared_child_is_not_a_cycle() {
        let mut source = MockSource::new();
        source
            .insert("r", query("Root", &["a", "b"]))
            .insert("a", query("A", &["s"]))
            .insert("b", query("B", &["s"]))
            .insert("s", query("Shared", &[]));
        let out = SnapshotAssembler::new(&source).assemble("r").unwrap();
        assert_eq!(out.root.node_count(), 5);
    }
}
