// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Component synthesis: complete component records from described properties.
//!
//! The four well-known kinds get a full default table; every table field can
//! be overridden by a described property under its public name (`color`) or
//! its serialized name (`_color`). Other kinds copy their properties through
//! the normalizer, minus a fixed deny-list of engine-internal keys.

use std::collections::BTreeMap;

use prefab_port::DescribedProperty;
use serde_json::{Map, Value};

use crate::kind::{AssetKind, ComponentKind, PropertyKind};
use crate::normalize::PropertyNormalizer;
use crate::record::{values, ComponentRecord};

/// Keys never copied into generic component records.
pub const DENY_LIST: &[&str] = &[
    "node",
    "uuid",
    "name",
    "enabled",
    "enabledInHierarchy",
    "__scriptAsset",
    "__type__",
    "_name",
    "_objFlags",
    "_enabled",
    "__prefab",
    "_id",
    "__editorExtras__",
    "hideFlags",
];

#[derive(Clone, Copy, Debug)]
enum FieldKind {
    Plain,
    Color,
    Vec2,
    Size,
    Asset(AssetKind),
    Node,
}

#[derive(Clone, Copy, Debug)]
enum Fallback {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
    EmptyArray,
    Color(u8, u8, u8, u8),
    Vec2(f64, f64),
    Size(f64, f64),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::from(i),
            Self::Float(f) => Value::from(f),
            Self::Str(s) => Value::from(s),
            Self::EmptyArray => Value::Array(Vec::new()),
            Self::Color(r, g, b, a) => values::color(r, g, b, a),
            Self::Vec2(x, y) => values::vec2(x, y),
            Self::Size(w, h) => values::size(w, h),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FieldSpec {
    key: &'static str,
    kind: FieldKind,
    fallback: Fallback,
}

impl FieldSpec {
    const fn new(key: &'static str, kind: FieldKind, fallback: Fallback) -> Self {
        Self {
            key,
            kind,
            fallback,
        }
    }

    const fn plain(key: &'static str, fallback: Fallback) -> Self {
        Self::new(key, FieldKind::Plain, fallback)
    }

    fn public_name(&self) -> &'static str {
        self.key.strip_prefix('_').unwrap_or(self.key)
    }
}

const WHITE: Fallback = Fallback::Color(255, 255, 255, 255);

static UI_TRANSFORM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("_contentSize", FieldKind::Size, Fallback::Size(100.0, 100.0)),
    FieldSpec::new("_anchorPoint", FieldKind::Vec2, Fallback::Vec2(0.5, 0.5)),
];

static SPRITE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "_customMaterial",
        FieldKind::Asset(AssetKind::Material),
        Fallback::Null,
    ),
    FieldSpec::plain("_srcBlendFactor", Fallback::Int(2)),
    FieldSpec::plain("_dstBlendFactor", Fallback::Int(4)),
    FieldSpec::new("_color", FieldKind::Color, WHITE),
    FieldSpec::new(
        "_spriteFrame",
        FieldKind::Asset(AssetKind::SpriteFrame),
        Fallback::Null,
    ),
    FieldSpec::plain("_type", Fallback::Int(0)),
    FieldSpec::plain("_fillType", Fallback::Int(0)),
    FieldSpec::plain("_sizeMode", Fallback::Int(1)),
    FieldSpec::new("_fillCenter", FieldKind::Vec2, Fallback::Vec2(0.0, 0.0)),
    FieldSpec::plain("_fillStart", Fallback::Int(0)),
    FieldSpec::plain("_fillRange", Fallback::Int(0)),
    FieldSpec::plain("_isTrimmedMode", Fallback::Bool(true)),
    FieldSpec::plain("_useGrayscale", Fallback::Bool(false)),
    FieldSpec::new(
        "_atlas",
        FieldKind::Asset(AssetKind::SpriteAtlas),
        Fallback::Null,
    ),
];

static BUTTON_FIELDS: &[FieldSpec] = &[
    FieldSpec::plain("clickEvents", Fallback::EmptyArray),
    FieldSpec::plain("_interactable", Fallback::Bool(true)),
    FieldSpec::plain("_transition", Fallback::Int(0)),
    FieldSpec::new(
        "_normalColor",
        FieldKind::Color,
        Fallback::Color(214, 214, 214, 255),
    ),
    FieldSpec::new(
        "_hoverColor",
        FieldKind::Color,
        Fallback::Color(211, 211, 211, 255),
    ),
    FieldSpec::new("_pressedColor", FieldKind::Color, WHITE),
    FieldSpec::new(
        "_disabledColor",
        FieldKind::Color,
        Fallback::Color(124, 124, 124, 255),
    ),
    FieldSpec::new(
        "_normalSprite",
        FieldKind::Asset(AssetKind::SpriteFrame),
        Fallback::Null,
    ),
    FieldSpec::new(
        "_hoverSprite",
        FieldKind::Asset(AssetKind::SpriteFrame),
        Fallback::Null,
    ),
    FieldSpec::new(
        "_pressedSprite",
        FieldKind::Asset(AssetKind::SpriteFrame),
        Fallback::Null,
    ),
    FieldSpec::new(
        "_disabledSprite",
        FieldKind::Asset(AssetKind::SpriteFrame),
        Fallback::Null,
    ),
    FieldSpec::plain("_duration", Fallback::Float(0.1)),
    FieldSpec::plain("_zoomScale", Fallback::Float(1.2)),
    FieldSpec::new("_target", FieldKind::Node, Fallback::Null),
];

static LABEL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "_customMaterial",
        FieldKind::Asset(AssetKind::Material),
        Fallback::Null,
    ),
    FieldSpec::plain("_srcBlendFactor", Fallback::Int(2)),
    FieldSpec::plain("_dstBlendFactor", Fallback::Int(4)),
    FieldSpec::new("_color", FieldKind::Color, WHITE),
    FieldSpec::plain("_string", Fallback::Str("label")),
    FieldSpec::plain("_horizontalAlign", Fallback::Int(1)),
    FieldSpec::plain("_verticalAlign", Fallback::Int(1)),
    FieldSpec::plain("_actualFontSize", Fallback::Int(20)),
    FieldSpec::plain("_fontSize", Fallback::Int(20)),
    FieldSpec::plain("_fontFamily", Fallback::Str("Arial")),
    FieldSpec::plain("_lineHeight", Fallback::Int(40)),
    FieldSpec::plain("_overflow", Fallback::Int(0)),
    FieldSpec::plain("_enableWrapText", Fallback::Bool(true)),
    FieldSpec::new("_font", FieldKind::Asset(AssetKind::Font), Fallback::Null),
    FieldSpec::plain("_isSystemFontUsed", Fallback::Bool(true)),
    FieldSpec::plain("_spacingX", Fallback::Int(0)),
    FieldSpec::plain("_isItalic", Fallback::Bool(false)),
    FieldSpec::plain("_isBold", Fallback::Bool(false)),
    FieldSpec::plain("_isUnderline", Fallback::Bool(false)),
    FieldSpec::plain("_underlineHeight", Fallback::Int(2)),
    FieldSpec::plain("_cacheMode", Fallback::Int(0)),
];

/// Build the record for one component owned by the node at `owner`.
///
/// The metadata reference is left null; the walker fills it in.
pub fn synthesize(
    normalizer: &mut PropertyNormalizer<'_>,
    kind: &ComponentKind,
    enabled: bool,
    owner: usize,
    properties: &BTreeMap<String, DescribedProperty>,
) -> ComponentRecord {
    let mut record = ComponentRecord::new(kind.as_str(), enabled, owner);
    record.properties = match kind {
        ComponentKind::UiTransform => from_table(normalizer, UI_TRANSFORM_FIELDS, properties),
        ComponentKind::Sprite => from_table(normalizer, SPRITE_FIELDS, properties),
        ComponentKind::Button => from_table(normalizer, BUTTON_FIELDS, properties),
        ComponentKind::Label => {
            let mut fields = from_table(normalizer, LABEL_FIELDS, properties);
            if override_for(properties, "_actualFontSize").is_none() {
                if let Some(size) = fields.get("_fontSize").cloned() {
                    fields.insert("_actualFontSize".to_string(), size);
                }
            }
            fields
        }
        ComponentKind::Other(_) => copy_generic(normalizer, properties),
    };
    record
}

fn override_for<'p>(
    properties: &'p BTreeMap<String, DescribedProperty>,
    key: &str,
) -> Option<&'p DescribedProperty> {
    let public = key.strip_prefix('_').unwrap_or(key);
    properties.get(public).or_else(|| properties.get(key))
}

fn from_table(
    normalizer: &mut PropertyNormalizer<'_>,
    table: &[FieldSpec],
    properties: &BTreeMap<String, DescribedProperty>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in table {
        let value = match override_for(properties, field.key) {
            Some(property) => apply(normalizer, field, property),
            None => field.fallback.to_value(),
        };
        out.insert(field.key.to_string(), value);
    }
    out
}

fn apply(
    normalizer: &mut PropertyNormalizer<'_>,
    field: &FieldSpec,
    property: &DescribedProperty,
) -> Value {
    let path = field.public_name();
    let declared = match field.kind {
        FieldKind::Plain => return normalizer.normalize(path, property),
        FieldKind::Color => {
            return normalizer.color_or(path, property.value(), field.fallback.to_value())
        }
        FieldKind::Vec2 => PropertyKind::Vec2,
        FieldKind::Size => PropertyKind::Size,
        FieldKind::Asset(asset) => reference_kind(property, PropertyKind::Asset(asset)),
        FieldKind::Node => reference_kind(property, PropertyKind::Node),
    };
    normalizer.normalize_as(path, &declared, property.value())
}

/// The property's own tag when it names a reference kind, else `fallback`.
fn reference_kind(property: &DescribedProperty, fallback: PropertyKind) -> PropertyKind {
    property
        .kind()
        .map(PropertyKind::classify)
        .filter(PropertyKind::is_reference)
        .unwrap_or(fallback)
}

fn copy_generic(
    normalizer: &mut PropertyNormalizer<'_>,
    properties: &BTreeMap<String, DescribedProperty>,
) -> Map<String, Value> {
    properties
        .iter()
        .filter(|(key, _)| !DENY_LIST.contains(&key.as_str()))
        .map(|(key, property)| (key.clone(), normalizer.normalize(key, property)))
        .collect()
}
