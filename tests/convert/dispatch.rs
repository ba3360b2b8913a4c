//! Integration tests for registry dispatch
//!
//! Tests keyed and conditional resolution in both directions.

use std::sync::Arc;

use trove_foundation::{ErrorKind, Node, NodeKind};

use crate::shapes::{Circle, Rect, Shape, Triangle, context, dump, keyed_shapes, load, shorthand_shapes};

// =============================================================================
// Keyed Resolution
// =============================================================================

#[test]
fn serialize_writes_discriminator() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());
    let mut node = Node::Null;
    shapes.serialize(&Rect { width: 2.0, height: 3.0 }, &mut node, &ctx).unwrap();
    assert_eq!(dump(&node), r#"{"height":3,"kind":"rect","width":2}"#);
}

#[test]
fn deserialize_reads_discriminator() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());
    let shape = shapes.deserialize(&load(r#"{"kind": "circle", "radius": 1.5}"#), &ctx).unwrap();
    assert_eq!((*shape).as_any().downcast_ref::<Circle>(), Some(&Circle { radius: 1.5 }));
}

#[test]
fn documents_roundtrip() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());
    for text in [
        r#"{"kind":"circle","radius":0.5}"#,
        r#"{"height":1,"kind":"rect","width":4}"#,
    ] {
        let shape = shapes.deserialize(&load(text), &ctx).unwrap();
        let mut node = Node::Null;
        shapes.serialize(shape.as_ref(), &mut node, &ctx).unwrap();
        assert_eq!(dump(&node), text);
    }
}

#[test]
fn unregistered_variant_is_rejected() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());
    let mut node = Node::Null;
    let err = shapes.serialize(&Triangle, &mut node, &ctx).unwrap_err();
    match err.kind {
        ErrorKind::NoConverterForType { actual, base } => {
            assert!(actual.is::<Triangle>());
            assert!(base.is::<dyn Shape>());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(node.is_null());
}

#[test]
fn discriminator_problems() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());

    let err = shapes.deserialize(&load("{}"), &ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingDiscriminator { .. }));

    let err = shapes.deserialize(&load(r#"{"kind": null}"#), &ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingDiscriminator { .. }));

    let err = shapes.deserialize(&load(r#"{"kind": 3}"#), &ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDiscriminator { found: NodeKind::Int, .. }));

    let err = shapes.deserialize(&load(r#"{"kind": "hexagon"}"#), &ctx).unwrap_err();
    match err.kind {
        ErrorKind::UnknownDiscriminatorValue { path, value, .. } => {
            assert_eq!(path.to_string(), "kind");
            assert_eq!(value, "hexagon");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scalar_document_without_shorthand() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());
    let err = shapes.deserialize(&load("4"), &ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingDiscriminator { .. }));
}

#[test]
fn field_errors_pass_through() {
    let (shapes, ctx) = context(keyed_shapes().build().unwrap());
    let err = shapes.deserialize(&load(r#"{"kind": "rect", "width": 1}"#), &ctx).unwrap_err();
    match err.kind {
        ErrorKind::MissingField { path } => assert_eq!(path.to_string(), "height"),
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Conditional Resolution
// =============================================================================

#[test]
fn shorthand_claims_bare_numbers() {
    let (shapes, ctx) = context(shorthand_shapes().build().unwrap());

    let shape = shapes.deserialize(&load("7"), &ctx).unwrap();
    assert_eq!((*shape).as_any().downcast_ref::<Circle>(), Some(&Circle { radius: 7.0 }));

    let mut node = Node::Null;
    shapes.serialize(&Circle { radius: 7.0 }, &mut node, &ctx).unwrap();
    assert_eq!(node, Node::Int(7));
}

#[test]
fn shorthand_leaves_other_documents_keyed() {
    let (shapes, ctx) = context(shorthand_shapes().build().unwrap());

    // the long form still reads, and rects still write their key
    let shape = shapes.deserialize(&load(r#"{"kind": "circle", "radius": 2}"#), &ctx).unwrap();
    assert_eq!((*shape).as_any().downcast_ref::<Circle>(), Some(&Circle { radius: 2.0 }));

    let mut node = Node::Null;
    shapes.serialize(&Rect { width: 1.0, height: 1.0 }, &mut node, &ctx).unwrap();
    assert_eq!(node.require_str("kind").unwrap(), "rect");
}

#[test]
fn registries_are_shared_across_threads() {
    let (shapes, ctx) = context(shorthand_shapes().build().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shapes = Arc::clone(&shapes);
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                let node = load(&format!(r#"{{"kind": "rect", "width": {i}, "height": 2}}"#));
                shapes.deserialize(&node, &ctx).unwrap().area()
            })
        })
        .collect();

    let areas: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(areas, vec![0.0, 2.0, 4.0, 6.0]);
}
