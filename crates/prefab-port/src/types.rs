// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot types for the host contract.
//!
//! These types mirror what a host query returns. Every field is optional on
//! the wire; absent fields decode to the defaults documented per field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::{Quat, Vec3};
use crate::property::DescribedProperty;

/// Stable identifier (conventionally 32 hex characters, optionally hyphenated).
pub type StableId = String;

/// Local transform of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSnapshot {
    /// Local position. Defaults to the origin.
    pub position: Vec3,
    /// Local rotation. Defaults to identity.
    pub rotation: Quat,
    /// Local scale. Defaults to `(1, 1, 1)`.
    pub scale: Vec3,
    /// Euler angles in degrees, when the host reports them.
    pub euler: Option<Vec3>,
}

impl Default for TransformSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            euler: None,
        }
    }
}

/// One component attached to a node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSnapshot {
    /// Namespaced kind tag (e.g. `cc.Sprite`). Required; a missing kind is
    /// reported as a malformed snapshot.
    #[serde(alias = "type", alias = "__type__")]
    pub kind: Option<String>,
    /// Stable identifier of the component instance.
    #[serde(alias = "uuid")]
    pub id: Option<StableId>,
    /// Enabled flag. Defaults to `true` when serialized.
    pub enabled: Option<bool>,
    /// Persistent file identifier carried over from an earlier serialization.
    #[serde(alias = "fileId")]
    pub file_id: Option<String>,
    /// Described properties keyed by property name.
    pub properties: BTreeMap<String, DescribedProperty>,
}

impl ComponentSnapshot {
    /// Create a component snapshot of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }
}

/// A node subtree, fully assembled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSnapshot {
    /// Stable identifier of the node, if the host has one.
    #[serde(alias = "uuid")]
    pub id: Option<StableId>,
    /// Display name. A missing name is reported as a malformed snapshot.
    pub name: Option<String>,
    /// Active flag. Defaults to `true` when serialized.
    pub active: Option<bool>,
    /// Local transform.
    pub transform: TransformSnapshot,
    /// Layer bitmask, when the host reports one.
    pub layer: Option<u32>,
    /// Persistent file identifier carried over from an earlier serialization.
    #[serde(alias = "fileId")]
    pub file_id: Option<String>,
    /// Child subtrees, in host order.
    pub children: Vec<NodeSnapshot>,
    /// Attached components, in host order.
    pub components: Vec<ComponentSnapshot>,
}

impl NodeSnapshot {
    /// Create a node snapshot with a display name and no identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Total number of components in this subtree.
    pub fn component_count(&self) -> usize {
        self.components.len()
            + self
                .children
                .iter()
                .map(Self::component_count)
                .sum::<usize>()
    }
}

/// The answer to a single host query: one node with its children by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeQuery {
    /// Stable identifier as reported by the host.
    #[serde(alias = "uuid")]
    pub id: Option<StableId>,
    /// Display name.
    pub name: Option<String>,
    /// Active flag.
    pub active: Option<bool>,
    /// Local transform.
    pub transform: TransformSnapshot,
    /// Layer bitmask.
    pub layer: Option<u32>,
    /// Persistent file identifier.
    #[serde(alias = "fileId")]
    pub file_id: Option<String>,
    /// Stable identifiers of the children, in host order.
    pub children: Vec<StableId>,
    /// Attached components, in host order.
    pub components: Vec<ComponentSnapshot>,
}

impl NodeQuery {
    /// Attach already-assembled children, producing a subtree snapshot.
    pub fn into_snapshot(self, children: Vec<NodeSnapshot>) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            name: self.name,
            active: self.active,
            transform: self.transform,
            layer: self.layer,
            file_id: self.file_id,
            children,
            components: self.components,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_node_decodes_with_defaults() {
        let node: NodeSnapshot = serde_json::from_value(json!({})).unwrap();
        assert!(node.name.is_none());
        assert_eq!(node.transform.scale, Vec3::ONE);
        assert_eq!(node.transform.rotation, Quat::IDENTITY);
        assert!(node.children.is_empty());
    }

    #[test]
    fn host_aliases_are_accepted() {
        let node: NodeSnapshot = serde_json::from_value(json!({
            "uuid": "abc",
            "name": "Root",
            "components": [
                {"type": "cc.Sprite", "uuid": "s1", "properties": {"color": {"type": "cc.Color", "value": {"r": 1}}}}
            ]
        }))
        .unwrap();
        assert_eq!(node.id.as_deref(), Some("abc"));
        let comp = &node.components[0];
        assert_eq!(comp.kind.as_deref(), Some("cc.Sprite"));
        assert_eq!(comp.id.as_deref(), Some("s1"));
        assert_eq!(comp.properties["color"].kind(), Some("cc.Color"));
    }

    #[test]
    fn counts_cover_the_subtree() {
        let mut root = NodeSnapshot::new("Root");
        let mut child = NodeSnapshot::new("Child");
        child.components.push(ComponentSnapshot::new("cc.Label"));
        child.children.push(NodeSnapshot::new("Leaf"));
        root.children.push(child);
        root.components.push(ComponentSnapshot::new("cc.UITransform"));
        assert_eq!(root.node_count(), 3);
        assert_eq!(root.component_count(), 2);
    }

    #[test]
    fn query_children_are_ids() {
        let q: NodeQuery =
            serde_json::from_value(json!({"name": "A", "children": ["b", "c"]})).unwrap();
        assert_eq!(q.children, vec!["b".to_string(), "c".to_string()]);
        let snap = q.into_snapshot(Vec::new());
        assert_eq!(snap.name.as_deref(), Some("A"));
    }
}
