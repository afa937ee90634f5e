// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record and reference types of the index-addressed prefab format.
//!
//! A prefab is a flat JSON array. Every element is a record tagged with
//! `__type__`; records point at each other by array position.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Kind tag of the asset header record.
pub const ASSET_HEADER_TYPE: &str = "cc.Prefab";
/// Kind tag of node records.
pub const NODE_TYPE: &str = "cc.Node";
/// Kind tag of per-node metadata records.
pub const NODE_INFO_TYPE: &str = "cc.PrefabInfo";
/// Kind tag of per-component metadata records.
pub const COMPONENT_INFO_TYPE: &str = "cc.CompPrefabInfo";
/// Kind tag used for components whose snapshot carried no kind.
pub const FALLBACK_COMPONENT_TYPE: &str = "cc.Component";

/// Position of the asset header in every sequence.
pub const HEADER_POSITION: usize = 0;
/// Position of the root node in every sequence that has one.
pub const ROOT_POSITION: usize = 1;

/// A cross-reference inside a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reference {
    /// Position within the same sequence (`{"__id__": n}`).
    Index(usize),
    /// Persistent identifier of something stored outside this sequence
    /// (`{"__uuid__": id, "__expectedType__": kind}`).
    Persistent {
        /// Identifier, compacted or not depending on the asset kind.
        uuid: String,
        /// Kind tag the consumer should expect.
        expected_type: String,
    },
    /// No reference, or a reference that left the graph (`null`).
    Null,
}

impl Reference {
    /// The referenced position, for internal references.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// True for [`Reference::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// JSON form of this reference.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Index(i) => json!({ "__id__": i }),
            Self::Persistent {
                uuid,
                expected_type,
            } => json!({ "__uuid__": uuid, "__expectedType__": expected_type }),
            Self::Null => Value::Null,
        }
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Index(i) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("__id__", i)?;
                map.end()
            }
            Self::Persistent {
                uuid,
                expected_type,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("__uuid__", uuid)?;
                map.serialize_entry("__expectedType__", expected_type)?;
                map.end()
            }
            Self::Null => serializer.serialize_unit(),
        }
    }
}

/// Asset header: always position 0.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetHeader {
    #[serde(rename = "__type__")]
    type_tag: &'static str,
    /// Declared asset name.
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(rename = "_objFlags")]
    obj_flags: u32,
    #[serde(rename = "__editorExtras__")]
    editor_extras: Map<String, Value>,
    #[serde(rename = "_native")]
    native: String,
    /// Root node reference (`{"__id__": 1}` when a root exists).
    pub data: Reference,
    #[serde(rename = "optimizationPolicy")]
    optimization_policy: u32,
    persistent: bool,
}

impl AssetHeader {
    /// Header for an asset named `name` whose root lives at `root`.
    pub fn new(name: impl Into<String>, root: Reference) -> Self {
        Self {
            type_tag: ASSET_HEADER_TYPE,
            name: name.into(),
            obj_flags: 0,
            editor_extras: Map::new(),
            native: String::new(),
            data: root,
            optimization_policy: 0,
            persistent: false,
        }
    }
}

/// One scene node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
    #[serde(rename = "__type__")]
    type_tag: &'static str,
    /// Display name.
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(rename = "_objFlags")]
    obj_flags: u32,
    #[serde(rename = "__editorExtras__")]
    editor_extras: Map<String, Value>,
    /// Parent node; null only for the root.
    #[serde(rename = "_parent")]
    pub parent: Reference,
    /// Child nodes, in snapshot order.
    #[serde(rename = "_children")]
    pub children: Vec<Reference>,
    /// Active flag.
    #[serde(rename = "_active")]
    pub active: bool,
    /// Attached components, in snapshot order.
    #[serde(rename = "_components")]
    pub components: Vec<Reference>,
    /// Per-node metadata record.
    #[serde(rename = "_prefab")]
    pub prefab: Reference,
    /// Local position (`cc.Vec3`).
    #[serde(rename = "_lpos")]
    pub position: Value,
    /// Local rotation (`cc.Quat`).
    #[serde(rename = "_lrot")]
    pub rotation: Value,
    /// Local scale (`cc.Vec3`).
    #[serde(rename = "_lscale")]
    pub scale: Value,
    #[serde(rename = "_mobility")]
    mobility: u32,
    /// Layer bitmask.
    #[serde(rename = "_layer")]
    pub layer: u32,
    /// Euler angles in degrees (`cc.Vec3`).
    #[serde(rename = "_euler")]
    pub euler: Value,
    #[serde(rename = "_id")]
    id: String,
}

impl NodeRecord {
    /// Node with the given fixed fields and empty reference lists.
    pub fn new(name: impl Into<String>, parent: Reference, active: bool, layer: u32) -> Self {
        Self {
            type_tag: NODE_TYPE,
            name: name.into(),
            obj_flags: 0,
            editor_extras: Map::new(),
            parent,
            children: Vec::new(),
            active,
            components: Vec::new(),
            prefab: Reference::Null,
            position: values::vec3(0.0, 0.0, 0.0),
            rotation: values::quat(0.0, 0.0, 0.0, 1.0),
            scale: values::vec3(1.0, 1.0, 1.0),
            mobility: 0,
            layer,
            euler: values::vec3(0.0, 0.0, 0.0),
            id: String::new(),
        }
    }
}

/// One attached component.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentRecord {
    /// Namespaced kind tag.
    #[serde(rename = "__type__")]
    pub kind: String,
    #[serde(rename = "_name")]
    name: String,
    #[serde(rename = "_objFlags")]
    obj_flags: u32,
    #[serde(rename = "__editorExtras__")]
    editor_extras: Map<String, Value>,
    /// Owning node, fixed at creation.
    pub node: Reference,
    /// Enabled flag.
    #[serde(rename = "_enabled")]
    pub enabled: bool,
    /// Per-component metadata record.
    #[serde(rename = "__prefab")]
    pub prefab: Reference,
    #[serde(rename = "_id")]
    id: String,
    /// Kind-dependent properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ComponentRecord {
    /// Component of `kind` owned by the node at `owner`, with no properties.
    pub fn new(kind: impl Into<String>, enabled: bool, owner: usize) -> Self {
        Self {
            kind: kind.into(),
            name: String::new(),
            obj_flags: 0,
            editor_extras: Map::new(),
            node: Reference::Index(owner),
            enabled,
            prefab: Reference::Null,
            id: String::new(),
            properties: Map::new(),
        }
    }

    /// Look up a kind-dependent property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Per-node metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfoRecord {
    /// Top-level node of the asset.
    pub root: Reference,
    /// The serialized asset itself.
    pub asset: Reference,
    /// Persistent file identifier.
    pub file_id: String,
    /// True only for the root node's metadata.
    pub is_root: bool,
}

impl Serialize for NodeInfoRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.is_root { 7 } else { 5 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("__type__", NODE_INFO_TYPE)?;
        map.serialize_entry("root", &self.root)?;
        map.serialize_entry("asset", &self.asset)?;
        map.serialize_entry("fileId", &self.file_id)?;
        map.serialize_entry("instance", &Value::Null)?;
        if self.is_root {
            map.serialize_entry("targetOverrides", &Value::Null)?;
            map.serialize_entry("nestedPrefabInstanceRoots", &Value::Null)?;
        }
        map.end()
    }
}

/// Per-component metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentInfoRecord {
    #[serde(rename = "__type__")]
    type_tag: &'static str,
    /// Persistent file identifier.
    #[serde(rename = "fileId")]
    pub file_id: String,
}

impl ComponentInfoRecord {
    /// Metadata carrying `file_id`.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            type_tag: COMPONENT_INFO_TYPE,
            file_id: file_id.into(),
        }
    }
}

/// Any record of the sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// Asset header (position 0).
    Header(AssetHeader),
    /// Scene node.
    Node(NodeRecord),
    /// Attached component.
    Component(ComponentRecord),
    /// Per-node metadata.
    NodeInfo(NodeInfoRecord),
    /// Per-component metadata.
    ComponentInfo(ComponentInfoRecord),
}

impl Record {
    /// The record's `__type__` tag.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Header(_) => ASSET_HEADER_TYPE,
            Self::Node(_) => NODE_TYPE,
            Self::Component(c) => &c.kind,
            Self::NodeInfo(_) => NODE_INFO_TYPE,
            Self::ComponentInfo(_) => COMPONENT_INFO_TYPE,
        }
    }

    /// The node record, if this is one.
    pub fn as_node(&self) -> Option<&NodeRecord> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }

    /// The component record, if this is one.
    pub fn as_component(&self) -> Option<&ComponentRecord> {
        match self {
            Self::Component(c) => Some(c),
            _ => None,
        }
    }

    /// The per-node metadata, if this is one.
    pub fn as_node_info(&self) -> Option<&NodeInfoRecord> {
        match self {
            Self::NodeInfo(i) => Some(i),
            _ => None,
        }
    }

    /// The per-component metadata, if this is one.
    pub fn as_component_info(&self) -> Option<&ComponentInfoRecord> {
        match self {
            Self::ComponentInfo(i) => Some(i),
            _ => None,
        }
    }
}

/// Constructors for the host's typed value objects.
pub mod values {
    use serde_json::{json, Value};

    /// JSON number for `f`, integral when `f` has no fractional part.
    #[allow(clippy::cast_possible_truncation)]
    pub fn number(f: f64) -> Value {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
            Value::from(f as i64)
        } else {
            Value::from(f)
        }
    }

    /// `cc.Vec2`.
    pub fn vec2(x: f64, y: f64) -> Value {
        json!({ "__type__": "cc.Vec2", "x": number(x), "y": number(y) })
    }

    /// `cc.Vec3`.
    pub fn vec3(x: f64, y: f64, z: f64) -> Value {
        json!({ "__type__": "cc.Vec3", "x": number(x), "y": number(y), "z": number(z) })
    }

    /// `cc.Quat`.
    pub fn quat(x: f64, y: f64, z: f64, w: f64) -> Value {
        json!({
            "__type__": "cc.Quat",
            "x": number(x),
            "y": number(y),
            "z": number(z),
            "w": number(w)
        })
    }

    /// `cc.Color` with 8-bit channels.
    pub fn color(r: u8, g: u8, b: u8, a: u8) -> Value {
        json!({ "__type__": "cc.Color", "r": r, "g": g, "b": b, "a": a })
    }

    /// `cc.Size`.
    pub fn size(width: f64, height: f64) -> Value {
        json!({ "__type__": "cc.Size", "width": number(width), "height": number(height) })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn reference_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Reference::Index(3)).unwrap(),
            json!({"__id__": 3})
        );
        assert_eq!(serde_json::to_value(Reference::Null).unwrap(), Value::Null);
        let p = Reference::Persistent {
            uuid: "abc".into(),
            expected_type: "cc.SpriteFrame".into(),
        };
        assert_eq!(serde_json::to_value(&p).unwrap(), p.to_value());
    }

    #[test]
    fn component_properties_are_flattened() {
        let mut c = ComponentRecord::new("cc.Custom", true, 1);
        c.properties.insert("speed".into(), json!(2.5));
        c.prefab = Reference::Index(4);
        let v = serde_json::to_value(Record::Component(c)).unwrap();
        assert_eq!(v["__type__"], "cc.Custom");
        assert_eq!(v["speed"], 2.5);
        assert_eq!(v["node"], json!({"__id__": 1}));
        assert_eq!(v["__prefab"], json!({"__id__": 4}));
    }

    #[test]
    fn integral_numbers_stay_integral() {
        let v = values::vec3(0.0, 1.5, -2.0);
        assert_eq!(v["x"], 0);
        assert_eq!(v["y"], 1.5);
        assert_eq!(v["z"], -2);
        assert_eq!(values::number(f64::NAN), Value::Null);
    }

    #[test]
    fn root_node_info_has_override_slots() {
        let info = NodeInfoRecord {
            root: Reference::Index(1),
            asset: Reference::Index(0),
            file_id: "f".into(),
            is_root: true,
        };
        let v = serde_json::to_value(&info).unwrap();
        assert!(v.get("targetOverrides").is_some());
        let child = NodeInfoRecord {
            is_root: false,
            ..info
        };
        let v = serde_json::to_value(&child).unwrap();
        assert!(v.get("targetOverrides").is_none());
        assert_eq!(v["instance"], Value::Null);
    }
}
