// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Described properties: the loosely typed values a host query attaches to a component.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One component property as reported by the host.
///
/// Hosts report either a bare value (`42`, `"text"`, `{"x": 1}`) or a
/// tagged wrapper carrying a semantic type (`{"kind": "cc.Vec3", "value": {...}}`).
/// The wrapper key `type` is accepted as an alias of `kind`, and extra keys on
/// the wrapper are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescribedProperty {
    /// Value carrying an explicit semantic type tag.
    Tagged {
        /// Semantic type tag (e.g. `cc.Color`, `node`, `cc.SpriteFrame`).
        #[serde(alias = "type")]
        kind: String,
        /// The wrapped value.
        value: Value,
    },
    /// Bare value with no type information.
    Raw(Value),
}

impl DescribedProperty {
    /// Wrap a bare value.
    pub fn raw(value: impl Into<Value>) -> Self {
        Self::Raw(value.into())
    }

    /// Wrap a value with a semantic type tag.
    pub fn tagged(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Tagged {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Semantic type tag, if the host supplied one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Tagged { kind, .. } => Some(kind.as_str()),
            Self::Raw(_) => None,
        }
    }

    /// The underlying value, with any wrapper removed.
    pub fn value(&self) -> &Value {
        match self {
            Self::Tagged { value, .. } | Self::Raw(value) => value,
        }
    }

    /// Stable identifier carried by a reference-shaped value.
    ///
    /// Recognizes `{"uuid": ..}`, `{"__uuid__": ..}` and `{"id": ..}` objects as
    /// well as bare strings. Returns `None` for anything else, including
    /// `null`.
    pub fn reference_id(&self) -> Option<&str> {
        reference_id_of(self.value())
    }
}

/// Extract a stable identifier from a reference-shaped JSON value.
pub fn reference_id_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["uuid", "__uuid__", "id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }
}
