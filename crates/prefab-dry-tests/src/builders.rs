// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot builders.
//!
//! # Example
//!
//! ```
//! use prefab_dry_tests::{ComponentBuilder, NodeBuilder};
//!
//! let root = NodeBuilder::new("r", "Root")
//!     .child(NodeBuilder::new("c1", "Child"))
//!     .component(ComponentBuilder::new("s1", "cc.Sprite").tagged("color", "cc.Color", serde_json::json!({"r": 10})))
//!     .build();
//! assert_eq!(root.node_count(), 2);
//! assert_eq!(root.component_count(), 1);
//! ```

use prefab_port::{
    ComponentSnapshot, DescribedProperty, NodeSnapshot, Quat, TransformSnapshot, Vec3,
};
use serde_json::{json, Value};

/// Builder for [`NodeSnapshot`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: NodeSnapshot,
}

impl NodeBuilder {
    /// Node with identifier `id` and display name `name`.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            node: NodeSnapshot {
                id: Some(id.to_string()),
                ..NodeSnapshot::new(name)
            },
        }
    }

    /// Node with neither identifier nor name.
    pub fn anonymous() -> Self {
        Self {
            node: NodeSnapshot::default(),
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: &str) -> Self {
        self.node.name = Some(name.to_string());
        self
    }

    /// Set the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.node.active = Some(active);
        self
    }

    /// Set the layer bitmask.
    pub fn layer(mut self, layer: u32) -> Self {
        self.node.layer = Some(layer);
        self
    }

    /// Set the persistent file identifier.
    pub fn file_id(mut self, file_id: &str) -> Self {
        self.node.file_id = Some(file_id.to_string());
        self
    }

    /// Set the local position.
    pub fn position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    /// Set the local rotation.
    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.node.transform.rotation = rotation;
        self
    }

    /// Set the local scale.
    pub fn scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.node.transform.scale = Vec3::new(x, y, z);
        self
    }

    /// Replace the whole transform.
    pub fn transform(mut self, transform: TransformSnapshot) -> Self {
        self.node.transform = transform;
        self
    }

    /// Append a child.
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.node.children.push(child.build());
        self
    }

    /// Append a component.
    pub fn component(mut self, component: ComponentBuilder) -> Self {
        self.node.components.push(component.build());
        self
    }

    /// Finish.
    pub fn build(self) -> NodeSnapshot {
        self.node
    }
}

/// Builder for [`ComponentSnapshot`].
#[derive(Debug, Clone)]
pub struct ComponentBuilder {
    component: ComponentSnapshot,
}

impl ComponentBuilder {
    /// Component with identifier `id` of kind `kind`.
    pub fn new(id: &str, kind: &str) -> Self {
        Self {
            component: ComponentSnapshot {
                id: Some(id.to_string()),
                ..ComponentSnapshot::new(kind)
            },
        }
    }

    /// Component with no kind tag.
    pub fn untyped(id: &str) -> Self {
        Self {
            component: ComponentSnapshot {
                id: Some(id.to_string()),
                ..ComponentSnapshot::default()
            },
        }
    }

    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.component.enabled = Some(enabled);
        self
    }

    /// Set the persistent file identifier.
    pub fn file_id(mut self, file_id: &str) -> Self {
        self.component.file_id = Some(file_id.to_string());
        self
    }

    /// Add a raw property.
    pub fn raw(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.component
            .properties
            .insert(key.to_string(), DescribedProperty::raw(value));
        self
    }

    /// Add a tagged property.
    pub fn tagged(mut self, key: &str, kind: &str, value: impl Into<Value>) -> Self {
        self.component
            .properties
            .insert(key.to_string(), DescribedProperty::tagged(kind, value));
        self
    }

    /// Add a node reference property pointing at `target`.
    pub fn node_ref(self, key: &str, target: &str) -> Self {
        self.tagged(key, "node", json!({ "uuid": target }))
    }

    /// Finish.
    pub fn build(self) -> ComponentSnapshot {
        self.component
    }
}
