// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host capture flow: options from config, assemble from a source, export.

#![allow(missing_docs, clippy::unwrap_used)]

use prefab_app_core::config::ConfigService;
use prefab_app_core::diagnostics::DiagnosticKind;
use prefab_app_core::options::{ResolutionMode, SerializerOptions};
use prefab_codec::{export, validate, MockSource, SerializeError, SerializeOutcome, Serializer};
use prefab_dry_tests::{
    init_tracing, ComponentBuilder, InMemoryConfigStore, NodeBuilder, SequentialIdGenerator,
};
use serde_json::{json, Value};

fn scene() -> MockSource {
    let root = NodeBuilder::new("root", "Menu")
        .component(ComponentBuilder::new("ui", "cc.UITransform"))
        .child(
            NodeBuilder::new("btn", "Play")
                .component(ComponentBuilder::new("b", "cc.Button").node_ref("target", "btn"))
                .child(
                    NodeBuilder::new("lbl", "Caption")
                        .component(ComponentBuilder::new("l", "cc.Label").raw("string", "Play")),
                ),
        )
        .build();
    MockSource::from_snapshot(&root)
}

#[test]
fn options_flow_from_config_into_the_pass() {
    init_tracing();
    let store = InMemoryConfigStore::with_options(&SerializerOptions {
        default_layer: 1,
        meta_version: "2.0.0".into(),
        ..SerializerOptions::single_pass()
    });
    let options = SerializerOptions::load(&ConfigService::new(store));
    assert_eq!(options.resolution, ResolutionMode::SinglePass);

    let mut serializer = Serializer::with_generator(options, SequentialIdGenerator::new());
    let doc = export(scene(), "root", &mut serializer, "asset-1").unwrap();
    assert_eq!(doc.meta.ver, "2.0.0");
    let value = doc.to_value().unwrap();
    assert_eq!(value[1]["_layer"], 1);
}

#[test]
fn export_produces_valid_document_and_meta() {
    init_tracing();
    let mut serializer =
        Serializer::with_generator(SerializerOptions::default(), SequentialIdGenerator::new());
    let source = scene();
    let doc = export(&source, "root", &mut serializer, "asset-uuid").unwrap();

    assert_eq!(source.fetch_log(), vec!["root", "btn", "lbl"]);
    let parsed: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    let report = validate(&parsed);
    assert!(report.valid, "{:?}", report.issues);
    assert_eq!(report.node_count, 3);
    assert_eq!(report.component_count, 3);

    let meta: Value = serde_json::from_str(&doc.meta_json().unwrap()).unwrap();
    assert_eq!(
        meta,
        json!({
            "ver": "1.1.50",
            "importer": "prefab",
            "imported": true,
            "uuid": "asset-uuid",
            "userData": {"syncNodeName": "Menu"}
        })
    );

    let button = doc.tables.components["b"];
    assert_eq!(parsed[button]["_target"], json!({"__id__": doc.tables.nodes["btn"]}));
    assert!(doc.diagnostics.is_empty());
    assert!(doc.outcome().success);
}

#[test]
fn missing_root_fails_with_message() {
    let mut serializer =
        Serializer::with_generator(SerializerOptions::default(), SequentialIdGenerator::new());
    let result = export(scene(), "nowhere", &mut serializer, "u");
    assert!(matches!(result, Err(SerializeError::Source(_))));
    let outcome = SerializeOutcome::from_result(&result);
    assert!(!outcome.success);
    assert!(outcome.message.contains("nowhere"));
}

#[test]
fn file_ids_come_from_the_injected_generator() {
    let mut serializer = Serializer::with_generator(
        SerializerOptions::default(),
        SequentialIdGenerator::with_prefix("gen"),
    );
    let doc = export(scene(), "root", &mut serializer, "u").unwrap();
    let value = doc.to_value().unwrap();
    let ids: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r.get("fileId").and_then(Value::as_str))
        .collect();
    assert_eq!(ids.len(), 6);
    assert!(ids.iter().all(|id| id.starts_with("gen-")));
    assert_eq!(doc.diagnostics.count(DiagnosticKind::Validation), 0);
}
