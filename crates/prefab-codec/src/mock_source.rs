// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock node source for headless testing of the assembler.
//!
//! MockSource answers queries from a HashMap and records every fetch so tests
//! can check query order.

use std::cell::RefCell;
use std::collections::HashMap;

use prefab_port::{NodeQuery, NodeSnapshot, NodeSource, SourceError, StableId};

/// In-memory [`NodeSource`].
#[derive(Debug, Default)]
pub struct MockSource {
    /// Queries keyed by node identifier.
    pub nodes: HashMap<StableId, NodeQuery>,
    /// Identifiers that fail with a host error when fetched.
    pub failing: Vec<StableId>,
    fetches: RefCell<Vec<StableId>>,
}

impl MockSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the query answered for `id`.
    pub fn insert(&mut self, id: impl Into<StableId>, mut query: NodeQuery) -> &mut Self {
        let id = id.into();
        query.id.get_or_insert_with(|| id.clone());
        self.nodes.insert(id, query);
        self
    }

    /// Source that answers for every node of `root`'s tree.
    ///
    /// Nodes without an identifier are skipped along with their subtrees.
    pub fn from_snapshot(root: &NodeSnapshot) -> Self {
        let mut source = Self::new();
        source.add_tree(root);
        source
    }

    fn add_tree(&mut self, node: &NodeSnapshot) {
        let Some(id) = node.id.clone() else {
            return;
        };
        let query = NodeQuery {
            id: Some(id.clone()),
            name: node.name.clone(),
            active: node.active,
            transform: node.transform,
            layer: node.layer,
            file_id: node.file_id.clone(),
            children: node.children.iter().filter_map(|c| c.id.clone()).collect(),
            components: node.components.clone(),
        };
        self.nodes.insert(id, query);
        for child in &node.children {
            self.add_tree(child);
        }
    }

    /// Identifiers fetched so far, in order.
    pub fn fetch_log(&self) -> Vec<StableId> {
        self.fetches.borrow().clone()
    }

    /// Number of fetches so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.borrow().len()
    }
}

impl NodeSource for MockSource {
    fn fetch_node(&self, id: &str) -> Result<NodeQuery, SourceError> {
        self.fetches.borrow_mut().push(id.to_string());
        if self.failing.iter().any(|f| f == id) {
            return Err(SourceError::Host(format!("simulated failure for {id}")));
        }
        self.nodes
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}
