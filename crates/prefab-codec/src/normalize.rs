// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property normalization: described property → serialized shape.

use prefab_app_core::diagnostics::{DiagnosticKind, DiagnosticLog};
use prefab_port::{reference_id_of, DescribedProperty};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::kind::PropertyKind;
use crate::record::{values, Reference};
use crate::resolver::{ReferenceResolver, Resolution};

/// Turns described properties into their canonical serialized form.
///
/// Borrows the pass's resolver read-only and its diagnostics mutably.
pub struct PropertyNormalizer<'a> {
    resolver: &'a ReferenceResolver,
    diagnostics: &'a mut DiagnosticLog,
}

impl<'a> PropertyNormalizer<'a> {
    /// Normalizer over `resolver`, reporting into `diagnostics`.
    pub fn new(resolver: &'a ReferenceResolver, diagnostics: &'a mut DiagnosticLog) -> Self {
        Self {
            resolver,
            diagnostics,
        }
    }

    /// Normalize one described property. `path` names it in diagnostics.
    pub fn normalize(&mut self, path: &str, property: &DescribedProperty) -> Value {
        match property {
            DescribedProperty::Raw(value) => self.raw(path, value),
            DescribedProperty::Tagged { kind, value } => {
                self.normalize_as(path, &PropertyKind::classify(kind), value)
            }
        }
    }

    /// Normalize `value` as a property of `kind`.
    pub fn normalize_as(&mut self, path: &str, kind: &PropertyKind, value: &Value) -> Value {
        match kind {
            PropertyKind::Vec2 => typed("cc.Vec2", &[("x", 0.0), ("y", 0.0)], value),
            PropertyKind::Vec3 => typed("cc.Vec3", &[("x", 0.0), ("y", 0.0), ("z", 0.0)], value),
            PropertyKind::Vec4 => typed(
                "cc.Vec4",
                &[("x", 0.0), ("y", 0.0), ("z", 0.0), ("w", 0.0)],
                value,
            ),
            PropertyKind::Quat => typed(
                "cc.Quat",
                &[("x", 0.0), ("y", 0.0), ("z", 0.0), ("w", 1.0)],
                value,
            ),
            PropertyKind::Size => typed("cc.Size", &[("width", 0.0), ("height", 0.0)], value),
            PropertyKind::Rect => typed(
                "cc.Rect",
                &[("x", 0.0), ("y", 0.0), ("width", 0.0), ("height", 0.0)],
                value,
            ),
            PropertyKind::Color => self.color_or(path, value, values::color(0, 0, 0, 255)),
            PropertyKind::Primitive => value.clone(),
            PropertyKind::Array => match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            let element = DescribedProperty::deserialize(item)
                                .unwrap_or_else(|_| DescribedProperty::Raw(item.clone()));
                            self.normalize(&format!("{path}[{i}]"), &element)
                        })
                        .collect(),
                ),
                other => other.clone(),
            },
            PropertyKind::Node | PropertyKind::Component | PropertyKind::Asset(_) => {
                self.reference(path, kind, value).to_value()
            }
            PropertyKind::Unknown(_) => {
                if is_reference_shaped(value) {
                    self.reference(path, &PropertyKind::Component, value)
                        .to_value()
                } else {
                    value.clone()
                }
            }
        }
    }

    /// Normalize a colour, using `fallback` when a hex string does not parse.
    pub fn color_or(&mut self, path: &str, value: &Value, fallback: Value) -> Value {
        let Value::String(hex) = value else {
            return color(value);
        };
        hex_color(hex).unwrap_or_else(|| {
            self.diagnostics.warn(
                DiagnosticKind::MalformedSnapshot,
                Some(path),
                format!("unreadable colour {hex:?}; default kept"),
            );
            fallback
        })
    }

    /// Sanitize an untyped value.
    ///
    /// Reference-shaped objects resolve against the pass's tables. Host-side
    /// `__id__` indices become null. Other containers are walked and copied.
    pub fn raw(&mut self, path: &str, value: &Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.raw(&format!("{path}[{i}]"), item))
                    .collect(),
            ),
            Value::Object(map) => {
                if let Some(index) = map.get("__id__").filter(|v| !v.is_string()) {
                    self.diagnostics.warn(
                        DiagnosticKind::UnresolvedReference,
                        Some(path),
                        format!("host index {index} has no meaning in this sequence; written as null"),
                    );
                    return Value::Null;
                }
                if let Some(expected) = map.get("__expectedType__").and_then(Value::as_str) {
                    let kind = PropertyKind::classify(expected);
                    if kind.is_reference() {
                        return self.reference(path, &kind, value).to_value();
                    }
                }
                if is_reference_shaped(value) || is_bare_id(map) {
                    return self.untyped_reference(path, value).to_value();
                }
                if let Some(tag) = map.get("__type__").and_then(Value::as_str) {
                    let kind = PropertyKind::classify(tag);
                    if kind.is_value_type() {
                        return self.normalize_as(path, &kind, value);
                    }
                }
                Value::Object(
                    map.iter()
                        .map(|(key, item)| (key.clone(), self.raw(&format!("{path}.{key}"), item)))
                        .collect(),
                )
            }
            other => other.clone(),
        }
    }

    /// Resolve a reference whose target kind is unknown against every bound identifier.
    fn untyped_reference(&mut self, path: &str, value: &Value) -> Reference {
        let Some(id) = reference_target(value) else {
            return Reference::Null;
        };
        match self.resolver.lookup(id) {
            Some((_, position)) => Reference::Index(position),
            None => {
                self.diagnostics.warn(
                    DiagnosticKind::UnresolvedReference,
                    Some(path),
                    format!("reference to {id} is outside the serialized graph; written as null"),
                );
                Reference::Null
            }
        }
    }

    /// Resolve a reference-valued property.
    ///
    /// A null or id-less value is an empty reference. A node or component
    /// target outside this pass's tables degrades to null with a warning.
    pub fn reference(&mut self, path: &str, kind: &PropertyKind, value: &Value) -> Reference {
        let Some(id) = reference_target(value) else {
            return Reference::Null;
        };
        match self.resolver.resolve(id, kind) {
            Resolution::OutOfGraph => {
                self.diagnostics.warn(
                    DiagnosticKind::UnresolvedReference,
                    Some(path),
                    format!("reference to {id} is outside the serialized graph; written as null"),
                );
                Reference::Null
            }
            other => other.into_reference(),
        }
    }
}

/// Identifier carried by a reference-valued property.
fn reference_target(value: &Value) -> Option<&str> {
    reference_id_of(value).or_else(|| value.get("__id__").and_then(Value::as_str))
}

/// True for objects carrying a `uuid`, `__uuid__` or string `__id__` key.
fn is_reference_shaped(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    ["uuid", "__uuid__", "__id__"]
        .iter()
        .any(|key| map.get(*key).is_some_and(Value::is_string))
}

/// `{"id": "..."}` with nothing else.
fn is_bare_id(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.get("id").is_some_and(Value::is_string)
}

/// Typed value object with numeric `fields`, missing ones filled with defaults.
fn typed(tag: &str, fields: &[(&str, f64)], value: &Value) -> Value {
    let mut out = Map::new();
    out.insert("__type__".to_string(), Value::from(tag));
    for (key, default) in fields {
        let field = value
            .get(*key)
            .filter(|v| v.is_number())
            .cloned()
            .unwrap_or_else(|| values::number(*default));
        out.insert((*key).to_string(), field);
    }
    Value::Object(out)
}

/// Round and clamp a channel into 0..=255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: Option<&Value>, default: u8) -> u8 {
    match value.and_then(Value::as_f64) {
        Some(f) if f.is_finite() => f.round().clamp(0.0, 255.0) as u8,
        _ => default,
    }
}

/// Colour from an `[r, g, b, a]` array or an `{r, g, b, a}` object.
fn color(value: &Value) -> Value {
    match value {
        Value::Array(items) => values::color(
            channel(items.first(), 0),
            channel(items.get(1), 0),
            channel(items.get(2), 0),
            channel(items.get(3), 255),
        ),
        other => values::color(
            channel(other.get("r"), 0),
            channel(other.get("g"), 0),
            channel(other.get("b"), 0),
            channel(other.get("a"), 255),
        ),
    }
}

/// `#RRGGBB` or `#RRGGBBAA`, leading `#` optional.
fn hex_color(s: &str) -> Option<Value> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(values::color(byte(0)?, byte(2)?, byte(4)?, alpha))
}
