// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializer behavior on whole trees: layout, references, validation.

#![allow(missing_docs, clippy::unwrap_used)]

use prefab_app_core::diagnostics::DiagnosticKind;
use prefab_app_core::options::SerializerOptions;
use prefab_codec::{
    dangling_references, validate, Record, Reference, SerializeError, SerializedGraph, Serializer,
};
use prefab_dry_tests::{init_tracing, ComponentBuilder, NodeBuilder, SequentialIdGenerator};
use prefab_port::NodeSnapshot;
use serde_json::{json, Value};

fn run(root: &NodeSnapshot) -> SerializedGraph {
    run_with(root, SerializerOptions::default())
}

fn run_with(root: &NodeSnapshot, options: SerializerOptions) -> SerializedGraph {
    init_tracing();
    Serializer::with_generator(options, SequentialIdGenerator::new())
        .serialize(root)
        .unwrap()
}

#[test]
fn child_reference_from_unknown_component_resolves_to_child() {
    let root = NodeBuilder::new("root", "Root")
        .child(NodeBuilder::new("c1", "Child"))
        .component(ComponentBuilder::new("k1", "game.Follower").node_ref("target", "c1"))
        .build();
    let graph = run(&root);

    let child_pos = graph.tables.nodes["c1"];
    assert_eq!(child_pos, 2);
    let comp_pos = graph.tables.components["k1"];
    let comp = graph.records[comp_pos].as_component().unwrap();
    assert_eq!(comp.kind, "game.Follower");
    assert_eq!(comp.property("target"), Some(&json!({"__id__": child_pos})));
    assert!(graph.diagnostics.is_empty());
}

#[test]
fn anonymous_root_child_component_points_back_at_its_node() {
    for options in [SerializerOptions::default(), SerializerOptions::single_pass()] {
        let root = NodeBuilder::anonymous()
            .name("Root")
            .child(
                NodeBuilder::new("c1", "Child")
                    .component(ComponentBuilder::new("k", "game.Pointer").node_ref("p", "c1")),
            )
            .build();
        let graph = run_with(&root, options);

        assert_eq!(graph.len(), 7);
        assert_eq!(graph.tables.nodes["c1"], 2);
        let comp = graph.records[graph.tables.components["k"]]
            .as_component()
            .unwrap();
        assert_eq!(comp.node, Reference::Index(2));
        assert_eq!(comp.property("p"), Some(&json!({"__id__": 2})));
        assert!(graph.diagnostics.is_empty());
    }
}

#[test]
fn raw_host_indices_and_stale_ids_never_dangle() {
    let root = NodeBuilder::new("r", "Root")
        .child(NodeBuilder::new("a", "A"))
        .component(
            ComponentBuilder::new("h", "game.Holder")
                .raw("stale", json!({"__id__": 42}))
                .raw("gone", json!({"uuid": "not-in-graph"}))
                .raw("peer", json!({"uuid": "a"}))
                .raw("tint", json!({"__type__": "cc.Color", "r": 300})),
        )
        .build();
    let graph = run(&root);
    let value = graph.to_value().unwrap();
    let holder = graph.records[graph.tables.components["h"]]
        .as_component()
        .unwrap();

    assert_eq!(holder.property("stale"), Some(&Value::Null));
    assert_eq!(holder.property("gone"), Some(&Value::Null));
    assert_eq!(
        holder.property("peer"),
        Some(&json!({"__id__": graph.tables.nodes["a"]}))
    );
    assert_eq!(holder.property("tint").unwrap()["r"], 255);
    assert_eq!(holder.property("tint").unwrap()["a"], 255);
    assert_eq!(graph.diagnostics.count(DiagnosticKind::UnresolvedReference), 2);
    assert!(dangling_references(&value).is_empty());
    assert!(validate(&value).valid);
}

#[test]
fn header_and_root_positions() {
    let root = NodeBuilder::new("root", "Panel")
        .child(NodeBuilder::new("a", "A"))
        .build();
    let graph = run(&root);
    let value = graph.to_value().unwrap();

    assert_eq!(value[0]["__type__"], "cc.Prefab");
    assert_eq!(value[0]["_name"], "Panel");
    assert_eq!(value[0]["data"], json!({"__id__": 1}));
    assert_eq!(value[1]["__type__"], "cc.Node");
    assert_eq!(value[1]["_parent"], Value::Null);
    assert_eq!(value[2]["_parent"], json!({"__id__": 1}));
}

#[test]
fn child_lists_are_complete() {
    let root = NodeBuilder::new("r", "Root")
        .child(
            NodeBuilder::new("a", "A")
                .child(NodeBuilder::new("a1", "A1"))
                .child(NodeBuilder::new("a2", "A2")),
        )
        .child(NodeBuilder::new("b", "B"))
        .child(NodeBuilder::new("c", "C"))
        .build();
    let graph = run(&root);

    let root_rec = graph.root().unwrap();
    assert_eq!(root_rec.children.len(), 3);
    let a = graph.records[graph.tables.nodes["a"]].as_node().unwrap();
    assert_eq!(a.children.len(), 2);
    let expected: [(&str, &[&str]); 2] = [("r", &["a", "b", "c"]), ("a", &["a1", "a2"])];
    for (parent_id, expect) in expected {
        let parent = graph.records[graph.tables.nodes[parent_id]].as_node().unwrap();
        let got: Vec<_> = parent.children.iter().filter_map(Reference::index).collect();
        let want: Vec<_> = expect.iter().map(|id| graph.tables.nodes[*id]).collect();
        assert_eq!(got, want);
    }
}

#[test]
fn external_node_reference_degrades_to_null() {
    let root = NodeBuilder::new("r", "Root")
        .component(
            ComponentBuilder::new("k", "cc.Button").node_ref("target", "not-in-this-prefab"),
        )
        .build();
    let graph = run(&root);
    let value = graph.to_value().unwrap();

    let comp = graph.records[graph.tables.components["k"]]
        .as_component()
        .unwrap();
    assert_eq!(comp.property("_target"), Some(&Value::Null));
    assert_eq!(graph.diagnostics.count(DiagnosticKind::UnresolvedReference), 1);
    assert!(dangling_references(&value).is_empty());
}

#[test]
fn output_passes_validation() {
    let root = NodeBuilder::new("r", "Root")
        .component(ComponentBuilder::new("t", "cc.UITransform"))
        .child(
            NodeBuilder::new("l", "Title")
                .component(ComponentBuilder::new("lt", "cc.UITransform"))
                .component(ComponentBuilder::new("lb", "cc.Label").raw("string", "Hello")),
        )
        .build();
    let graph = run(&root);
    let report = validate(&graph.to_value().unwrap());
    assert!(report.valid, "{:?}", report.issues);
    assert_eq!(report.node_count, 2);
    assert_eq!(report.component_count, 3);
}

#[test]
fn every_node_and_component_has_metadata() {
    let root = NodeBuilder::new("r", "Root")
        .component(ComponentBuilder::new("s", "cc.Sprite"))
        .child(NodeBuilder::new("a", "A").component(ComponentBuilder::new("b", "cc.Button")))
        .build();
    let graph = run(&root);
    for record in &graph.records {
        match record {
            Record::Node(n) => {
                let info = n.prefab.index().unwrap();
                assert!(graph.records[info].as_node_info().is_some());
            }
            Record::Component(c) => {
                let info = c.prefab.index().unwrap();
                assert!(graph.records[info].as_component_info().is_some());
            }
            _ => {}
        }
    }
}

#[test]
fn forward_reference_two_pass_vs_single_pass() {
    let root = NodeBuilder::new("r", "Root")
        .child(
            NodeBuilder::new("a", "A")
                .component(ComponentBuilder::new("h", "game.Link").node_ref("next", "b")),
        )
        .child(NodeBuilder::new("b", "B"))
        .build();

    let two = run(&root);
    let single = run_with(&root, SerializerOptions::single_pass());
    assert_eq!(two.tables, single.tables);
    assert_eq!(two.len(), single.len());

    let h = two.tables.components["h"];
    let b = two.tables.nodes["b"];
    assert_eq!(
        two.records[h].as_component().unwrap().property("next"),
        Some(&json!({"__id__": b}))
    );
    assert_eq!(
        single.records[h].as_component().unwrap().property("next"),
        Some(&Value::Null)
    );
}

#[test]
fn component_reference_to_sibling_component() {
    let root = NodeBuilder::new("r", "Root")
        .component(ComponentBuilder::new("lbl", "cc.Label"))
        .component(
            ComponentBuilder::new("ctl", "game.Controller").tagged(
                "label",
                "cc.Label",
                json!({"uuid": "lbl"}),
            ),
        )
        .build();
    let graph = run(&root);
    let ctl = graph.records[graph.tables.components["ctl"]]
        .as_component()
        .unwrap();
    assert_eq!(
        ctl.property("label"),
        Some(&json!({"__id__": graph.tables.components["lbl"]}))
    );
}

#[test]
fn asset_references_are_compacted() {
    let root = NodeBuilder::new("r", "Root")
        .component(ComponentBuilder::new("s", "cc.Sprite").tagged(
            "spriteFrame",
            "cc.SpriteFrame",
            json!({"uuid": "12345678-9abc-def0-1234-56789abcdef0"}),
        ))
        .build();
    let value = run(&root).to_value().unwrap();
    assert_eq!(
        value[2]["_spriteFrame"],
        json!({"__uuid__": "12345Z4mrze8BI0VniavN7w", "__expectedType__": "cc.SpriteFrame"})
    );
}

#[test]
fn transform_and_flags_are_written() {
    let root = NodeBuilder::new("r", "Root")
        .position(1.0, 2.5, 0.0)
        .scale(2.0, 2.0, 1.0)
        .active(false)
        .layer(1)
        .build();
    let value = run(&root).to_value().unwrap();
    assert_eq!(value[1]["_lpos"], json!({"__type__": "cc.Vec3", "x": 1, "y": 2.5, "z": 0}));
    assert_eq!(value[1]["_lscale"]["x"], 2);
    assert_eq!(value[1]["_lrot"]["w"], 1);
    assert_eq!(value[1]["_euler"], json!({"__type__": "cc.Vec3", "x": 0, "y": 0, "z": 0}));
    assert_eq!(value[1]["_active"], false);
    assert_eq!(value[1]["_layer"], 1);
}

#[test]
fn cycle_aborts() {
    let root = NodeBuilder::new("r", "Root")
        .child(NodeBuilder::new("a", "A").child(NodeBuilder::new("r", "Back")))
        .build();
    let err = Serializer::with_generator(SerializerOptions::default(), SequentialIdGenerator::new())
        .serialize(&root)
        .unwrap_err();
    assert!(matches!(err, SerializeError::Cycle { ref id } if id == "r"));
}

#[test]
fn disabled_component_and_explicit_file_ids() {
    let root = NodeBuilder::new("r", "Root")
        .file_id("root-fid")
        .component(
            ComponentBuilder::new("s", "cc.Sprite")
                .enabled(false)
                .file_id("sprite-fid"),
        )
        .build();
    let value = run(&root).to_value().unwrap();
    assert_eq!(value[2]["_enabled"], false);
    assert_eq!(value[3]["fileId"], "sprite-fid");
    assert_eq!(value[4]["fileId"], "root-fid");
    assert_eq!(value[4]["root"], json!({"__id__": 1}));
    assert_eq!(value[4]["asset"], json!({"__id__": 0}));
}
