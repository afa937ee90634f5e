// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializer options, persisted through the config service.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigSection, ConfigService, ConfigStore};

/// Config key under which [`SerializerOptions`] are stored.
pub const OPTIONS_KEY: &str = "prefab-serializer";

/// How cross-references are resolved during one serialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Allocate every position first, then resolve references against the
    /// complete tables. Forward references resolve to their target.
    #[default]
    TwoPass,
    /// Resolve references while allocating. References to nodes or components
    /// not yet visited resolve to null. Matches legacy tool output.
    SinglePass,
}

/// Options for one serializer instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Reference resolution strategy.
    pub resolution: ResolutionMode,
    /// Layer bitmask written for nodes whose snapshot has none.
    pub default_layer: u32,
    /// Version tag written into the sidecar meta document.
    pub meta_version: String,
    /// Compact asset identifiers (all asset kinds except prefab).
    pub compact_asset_ids: bool,
    /// Name written for nodes whose snapshot has none.
    pub default_node_name: String,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            resolution: ResolutionMode::TwoPass,
            default_layer: 33_554_432,
            meta_version: "1.1.50".to_string(),
            compact_asset_ids: true,
            default_node_name: "Node".to_string(),
        }
    }
}

impl ConfigSection for SerializerOptions {
    const KEY: &'static str = OPTIONS_KEY;
}

impl SerializerOptions {
    /// Load options from `config`, falling back to defaults when absent or unreadable.
    pub fn load<S: ConfigStore>(config: &ConfigService<S>) -> Self {
        config.read_or_default()
    }

    /// Options with the legacy single-pass resolution.
    pub fn single_pass() -> Self {
        Self {
            resolution: ResolutionMode::SinglePass,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: SerializerOptions =
            serde_json::from_str(r#"{"resolution": "single_pass"}"#).unwrap();
        assert_eq!(opts.resolution, ResolutionMode::SinglePass);
        assert_eq!(opts.default_layer, 33_554_432);
        assert!(opts.compact_asset_ids);
    }

    #[test]
    fn default_is_two_pass() {
        assert_eq!(SerializerOptions::default().resolution, ResolutionMode::TwoPass);
    }
}
