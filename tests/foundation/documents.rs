//! Integration tests for document nodes
//!
//! Tests loading from JSON, path navigation, and in-place edits.

use trove_foundation::{Node, NodeKind, NodePath};

fn load(json: &str) -> Node {
    serde_json::from_str(json).unwrap()
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn json_kinds_map_to_nodes() {
    let node = load(r#"{"a": null, "b": true, "c": 3, "d": 1.5, "e": "x", "f": [], "g": {}}"#);
    let kind = |key: &str| node.as_map().and_then(|m| m.get(key)).map(Node::kind);

    assert_eq!(kind("a"), Some(NodeKind::Null));
    assert_eq!(kind("b"), Some(NodeKind::Bool));
    assert_eq!(kind("c"), Some(NodeKind::Int));
    assert_eq!(kind("d"), Some(NodeKind::Float));
    assert_eq!(kind("e"), Some(NodeKind::String));
    assert_eq!(kind("f"), Some(NodeKind::List));
    assert_eq!(kind("g"), Some(NodeKind::Map));
}

#[test]
fn json_roundtrip_is_stable() {
    let text = r#"{"pools":[{"rolls":{"max":3,"min":1,"type":"minecraft:uniform"}}]}"#;
    let node = load(text);
    assert_eq!(serde_json::to_string(&node).unwrap(), text);
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn absent_versus_present() {
    let node = load(r#"{"type": 4, "gone": null, "list": [1]}"#);

    // present but the wrong shape is still present
    assert_eq!(node.get(&NodePath::key("type")), Some(&Node::Int(4)));
    assert!(node.get(&NodePath::key("gone")).is_none());
    assert!(node.get(&NodePath::key("missing")).is_none());
    assert!(node.get(&NodePath::key("list").at(3)).is_none());
    assert!(node.get(&NodePath::parse("type.inner")).is_none());
}

#[test]
fn nested_paths() {
    let node = load(r#"{"pools": [{"conditions": [{"condition": "minecraft:killed_by_player"}]}]}"#);
    let path = NodePath::key("pools").at(0).child("conditions").at(0).child("condition");
    assert_eq!(path.to_string(), "pools[0].conditions[0].condition");
    assert_eq!(node.require_str(&path).unwrap(), "minecraft:killed_by_player");
}

// =============================================================================
// Editing
// =============================================================================

#[test]
fn set_builds_intermediate_maps() {
    let mut node = Node::Null;
    node.set("meta.kind", "minecraft:uniform").unwrap();
    assert_eq!(node.to_string(), r#"{meta: {kind: "minecraft:uniform"}}"#);
}

#[test]
fn set_refuses_to_overwrite_scalars_as_maps() {
    let mut node = load(r#"{"meta": 5}"#);
    let err = node.set("meta.kind", "x").unwrap_err();
    assert!(err.to_string().contains("meta"));
    assert_eq!(node, load(r#"{"meta": 5}"#));
}

#[test]
fn edits_do_not_leak_into_clones() {
    let original = load(r#"{"terms": [{"condition": "a"}, {"condition": "b"}]}"#);
    let mut edited = original.clone();
    edited.set(NodePath::key("terms").at(1).child("condition"), "c").unwrap();

    assert_eq!(
        original.require_str(NodePath::key("terms").at(1).child("condition")).unwrap(),
        "b"
    );
    assert_eq!(
        edited.require_str(NodePath::key("terms").at(1).child("condition")).unwrap(),
        "c"
    );
}
