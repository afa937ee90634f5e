// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Layout invariants over randomly shaped trees.

#![allow(missing_docs, clippy::unwrap_used)]
use proptest::prelude::*;

use prefab_app_core::options::SerializerOptions;
use prefab_codec::{dangling_references, validate, Record, Reference, Serializer};
use prefab_dry_tests::{ComponentBuilder, NodeBuilder, SequentialIdGenerator};
use prefab_port::NodeSnapshot;
use serde_json::Value;

const KINDS: &[&str] = &["cc.UITransform", "cc.Sprite", "cc.Button", "cc.Label", "game.Custom"];

/// `parents[i]` picks the parent of node `i + 1` among nodes `0..=i`.
fn build_tree(parents: &[usize], components: &[Vec<usize>]) -> NodeSnapshot {
    let count = parents.len() + 1;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (i, p) in parents.iter().enumerate() {
        children[p % (i + 1)].push(i + 1);
    }
    build_node(0, &children, components)
}

fn build_node(i: usize, children: &[Vec<usize>], components: &[Vec<usize>]) -> NodeSnapshot {
    let mut node = NodeBuilder::new(&format!("n{i}"), &format!("Node{i}"));
    for (j, kind) in components.get(i).into_iter().flatten().enumerate() {
        let mut comp = ComponentBuilder::new(&format!("n{i}c{j}"), KINDS[kind % KINDS.len()]);
        if i > 0 {
            comp = comp.node_ref("link", &format!("n{}", i - 1));
        }
        node = node.component(comp);
    }
    let mut snapshot = node.build();
    for &c in &children[i] {
        snapshot.children.push(build_node(c, children, components));
    }
    snapshot
}

fn tree_strategy() -> impl Strategy<Value = NodeSnapshot> {
    (1usize..24).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<usize>(), n - 1),
            prop::collection::vec(prop::collection::vec(0usize..16, 0..3), n),
        )
            .prop_map(|(parents, comps)| build_tree(&parents, &comps))
    })
}

fn serialize(root: &NodeSnapshot, options: SerializerOptions) -> Value {
    Serializer::with_generator(options, SequentialIdGenerator::new())
        .serialize(root)
        .unwrap()
        .to_value()
        .unwrap()
}

proptest! {
    #[test]
    fn fresh_passes_agree(root in tree_strategy()) {
        let a = serialize(&root, SerializerOptions::default());
        let b = serialize(&root, SerializerOptions::default());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn output_is_structurally_sound(root in tree_strategy()) {
        let graph = Serializer::with_generator(SerializerOptions::default(), SequentialIdGenerator::new())
            .serialize(&root)
            .unwrap();
        let value = graph.to_value().unwrap();

        let report = validate(&value);
        prop_assert!(report.valid);
        prop_assert_eq!(report.node_count, root.node_count());
        prop_assert_eq!(report.component_count, root.component_count());
        prop_assert!(dangling_references(&value).is_empty());
        prop_assert_eq!(graph.len(), 1 + 2 * root.node_count() + 2 * root.component_count());

        // Every child points back at the node that lists it.
        for (pos, record) in graph.records.iter().enumerate() {
            if let Record::Node(node) = record {
                for child in node.children.iter().filter_map(Reference::index) {
                    let child_rec = graph.records[child].as_node().unwrap();
                    prop_assert_eq!(&child_rec.parent, &Reference::Index(pos));
                }
                for comp in node.components.iter().filter_map(Reference::index) {
                    let comp_rec = graph.records[comp].as_component().unwrap();
                    prop_assert_eq!(&comp_rec.node, &Reference::Index(pos));
                }
            }
        }
    }

    #[test]
    fn resolution_modes_share_positions(root in tree_strategy()) {
        let two = Serializer::with_generator(SerializerOptions::default(), SequentialIdGenerator::new())
            .serialize(&root)
            .unwrap();
        let single = Serializer::with_generator(SerializerOptions::single_pass(), SequentialIdGenerator::new())
            .serialize(&root)
            .unwrap();
        prop_assert_eq!(two.tables, single.tables);
        prop_assert!(two.diagnostics.len() <= single.diagnostics.len());
    }
}
