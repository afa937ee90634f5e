// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Closed vocabularies: component kinds and semantic property kinds.

use std::fmt;

/// Namespaced component kinds the host ships, beyond the synthesized four.
///
/// A tagged property whose kind is one of these is a component reference.
const BUILTIN_COMPONENTS: &[&str] = &[
    "cc.Animation",
    "cc.AudioSource",
    "cc.BlockInputEvents",
    "cc.Camera",
    "cc.Canvas",
    "cc.EditBox",
    "cc.Graphics",
    "cc.Layout",
    "cc.Mask",
    "cc.PageView",
    "cc.ProgressBar",
    "cc.RichText",
    "cc.ScrollView",
    "cc.Slider",
    "cc.Toggle",
    "cc.ToggleContainer",
    "cc.UIOpacity",
    "cc.Widget",
];

/// Component kinds with a synthesized default table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `cc.UITransform`.
    UiTransform,
    /// `cc.Sprite`.
    Sprite,
    /// `cc.Button`.
    Button,
    /// `cc.Label`.
    Label,
    /// Anything else; properties are copied generically.
    Other(String),
}

impl ComponentKind {
    /// Classify a component kind tag.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "cc.UITransform" => Self::UiTransform,
            "cc.Sprite" => Self::Sprite,
            "cc.Button" => Self::Button,
            "cc.Label" => Self::Label,
            other => Self::Other(other.to_string()),
        }
    }

    /// The kind tag written into the record.
    pub fn as_str(&self) -> &str {
        match self {
            Self::UiTransform => "cc.UITransform",
            Self::Sprite => "cc.Sprite",
            Self::Button => "cc.Button",
            Self::Label => "cc.Label",
            Self::Other(tag) => tag,
        }
    }

    /// True when the tag names a component the host knows about.
    pub fn is_builtin(tag: &str) -> bool {
        !matches!(Self::parse(tag), Self::Other(_)) || BUILTIN_COMPONENTS.contains(&tag)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset kinds that serialize as persistent identifier references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `cc.Texture2D`.
    Texture,
    /// `cc.SpriteFrame`.
    SpriteFrame,
    /// `cc.ImageAsset`.
    Image,
    /// `cc.AudioClip`.
    AudioClip,
    /// `cc.AnimationClip`.
    AnimationClip,
    /// `cc.TTFFont`.
    Font,
    /// `cc.BitmapFont`.
    BitmapFont,
    /// `cc.Material`.
    Material,
    /// `cc.SpriteAtlas`.
    SpriteAtlas,
    /// A sub-asset addressed as `<uuid>@<suffix>`.
    SubAsset,
    /// `cc.Prefab`; its identifier is never compacted.
    Prefab,
    /// `cc.Asset`.
    Generic,
}

impl AssetKind {
    /// The `__expectedType__` written alongside the identifier.
    pub fn expected_type(self) -> &'static str {
        match self {
            Self::Texture => "cc.Texture2D",
            Self::SpriteFrame => "cc.SpriteFrame",
            Self::Image => "cc.ImageAsset",
            Self::AudioClip => "cc.AudioClip",
            Self::AnimationClip => "cc.AnimationClip",
            Self::Font => "cc.TTFFont",
            Self::BitmapFont => "cc.BitmapFont",
            Self::Material => "cc.Material",
            Self::SpriteAtlas => "cc.SpriteAtlas",
            Self::Prefab => "cc.Prefab",
            Self::SubAsset | Self::Generic => "cc.Asset",
        }
    }

    /// Whether identifiers of this kind are compacted on output.
    pub fn compacts(self) -> bool {
        self != Self::Prefab
    }
}

/// Semantic kind of a described property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// `cc.Vec2`.
    Vec2,
    /// `cc.Vec3`.
    Vec3,
    /// `cc.Vec4`.
    Vec4,
    /// `cc.Quat`.
    Quat,
    /// `cc.Color`.
    Color,
    /// `cc.Size`.
    Size,
    /// `cc.Rect`.
    Rect,
    /// Number, integer, float, boolean, string or enum.
    Primitive,
    /// Homogeneous list of described properties.
    Array,
    /// Reference to a node.
    Node,
    /// Reference to a component.
    Component,
    /// Reference to an asset.
    Asset(AssetKind),
    /// Anything else; the value passes through.
    Unknown(String),
}

impl PropertyKind {
    /// Classify a host kind tag.
    pub fn classify(tag: &str) -> Self {
        match tag {
            "cc.Vec2" => Self::Vec2,
            "cc.Vec3" => Self::Vec3,
            "cc.Vec4" => Self::Vec4,
            "cc.Quat" => Self::Quat,
            "cc.Color" => Self::Color,
            "cc.Size" => Self::Size,
            "cc.Rect" => Self::Rect,
            "Number" | "Integer" | "Float" | "Boolean" | "String" | "Enum" | "BitMask" => {
                Self::Primitive
            }
            "Array" => Self::Array,
            "node" | "cc.Node" => Self::Node,
            "component" | "cc.Component" => Self::Component,
            "texture" | "cc.Texture2D" => Self::Asset(AssetKind::Texture),
            "sprite-frame" | "spriteFrame" | "cc.SpriteFrame" => {
                Self::Asset(AssetKind::SpriteFrame)
            }
            "image" | "cc.ImageAsset" => Self::Asset(AssetKind::Image),
            "audio-clip" | "cc.AudioClip" => Self::Asset(AssetKind::AudioClip),
            "animation-clip" | "cc.AnimationClip" => Self::Asset(AssetKind::AnimationClip),
            "font" | "cc.Font" | "cc.TTFFont" => Self::Asset(AssetKind::Font),
            "cc.BitmapFont" => Self::Asset(AssetKind::BitmapFont),
            "material" | "cc.Material" => Self::Asset(AssetKind::Material),
            "sprite-atlas" | "cc.SpriteAtlas" => Self::Asset(AssetKind::SpriteAtlas),
            "sub-asset" => Self::Asset(AssetKind::SubAsset),
            "prefab" | "cc.Prefab" => Self::Asset(AssetKind::Prefab),
            "asset" | "cc.Asset" => Self::Asset(AssetKind::Generic),
            other if ComponentKind::is_builtin(other) => Self::Component,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// True for the structured value types (vectors, quaternion, colour, size, rect).
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Self::Vec2 | Self::Vec3 | Self::Vec4 | Self::Quat | Self::Color | Self::Size | Self::Rect
        )
    }

    /// True for node, component and asset kinds.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Node | Self::Component | Self::Asset(_))
    }
}
