// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structural checks on record sequences. Read-only; never fails.

use serde::Serialize;
use serde_json::Value;

use crate::record::{Record, ASSET_HEADER_TYPE, NODE_TYPE};

/// Tags of records that are neither nodes nor components.
const UNCOUNTED_TYPES: &[&str] = &[
    ASSET_HEADER_TYPE,
    "cc.PrefabInfo",
    "cc.CompPrefabInfo",
    "cc.PrefabInstance",
    "cc.TargetInfo",
    "cc.TargetOverrideInfo",
    "cc.PropertyOverrideInfo",
    "cc.MountedChildrenInfo",
    "cc.MountedComponentsInfo",
    "cc.ClickEvent",
    "cc.Vec2",
    "cc.Vec3",
    "cc.Vec4",
    "cc.Quat",
    "cc.Color",
    "cc.Size",
    "cc.Rect",
];

/// Outcome of [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True iff `issues` is empty.
    pub valid: bool,
    /// Human-readable problems, in discovery order.
    pub issues: Vec<String>,
    /// Records tagged as nodes.
    pub node_count: usize,
    /// Records counted as components.
    pub component_count: usize,
}

impl ValidationReport {
    fn finish(mut self) -> Self {
        self.valid = self.issues.is_empty();
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Counted {
    Node,
    Component,
    Neither,
}

fn classify(tag: Option<&str>) -> Counted {
    match tag {
        Some(NODE_TYPE) => Counted::Node,
        Some(tag) if !UNCOUNTED_TYPES.contains(&tag) => Counted::Component,
        _ => Counted::Neither,
    }
}

/// Check a parsed prefab document.
pub fn validate(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(records) = document.as_array() else {
        report
            .issues
            .push("prefab document must be a JSON array".to_string());
        return report.finish();
    };
    if records.is_empty() {
        report.issues.push("prefab document is empty".to_string());
        return report.finish();
    }

    let header_tag = records[0].get("__type__").and_then(Value::as_str);
    if header_tag != Some(ASSET_HEADER_TYPE) {
        report.issues.push(format!(
            "record 0 must be the asset header ({ASSET_HEADER_TYPE}), found {}",
            header_tag.unwrap_or("an untagged value")
        ));
    }

    for (i, record) in records.iter().enumerate().skip(1) {
        if !record.is_object() {
            report.issues.push(format!("record {i} is not an object"));
            continue;
        }
        match classify(record.get("__type__").and_then(Value::as_str)) {
            Counted::Node => report.node_count += 1,
            Counted::Component => report.component_count += 1,
            Counted::Neither => {}
        }
    }

    if report.node_count == 0 {
        report
            .issues
            .push("prefab document has no node records".to_string());
    }
    report.finish()
}

/// Check an in-memory record sequence without rendering it.
pub fn validate_records(records: &[Record]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(first) = records.first() else {
        report.issues.push("prefab document is empty".to_string());
        return report.finish();
    };
    if !matches!(first, Record::Header(_)) {
        report.issues.push(format!(
            "record 0 must be the asset header ({ASSET_HEADER_TYPE}), found {}",
            first.type_tag()
        ));
    }
    for record in &records[1..] {
        match classify(Some(record.type_tag())) {
            Counted::Node => report.node_count += 1,
            Counted::Component => report.component_count += 1,
            Counted::Neither => {}
        }
    }
    if report.node_count == 0 {
        report
            .issues
            .push("prefab document has no node records".to_string());
    }
    report.finish()
}

/// Every `{"__id__": n}` in `document` whose target is outside the sequence.
///
/// Each entry names the record and the JSON path of the bad reference.
pub fn dangling_references(document: &Value) -> Vec<String> {
    let Some(records) = document.as_array() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (i, record) in records.iter().enumerate() {
        collect_dangling(record, records.len(), &format!("[{i}]"), &mut out);
    }
    out
}

fn collect_dangling(value: &Value, len: usize, path: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(target) = map.get("__id__") {
                let in_range = target
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .is_some_and(|n| n < len);
                if !in_range {
                    out.push(format!("{path} -> {target}"));
                }
            }
            for (key, child) in map {
                collect_dangling(child, len, &format!("{path}.{key}"), out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                collect_dangling(child, len, &format!("{path}[{i}]"), out);
            }
        }
        _ => {}
    }
}
