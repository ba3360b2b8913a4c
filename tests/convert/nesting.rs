//! Integration tests for nested polymorphic fields
//!
//! Tests groups whose members are dispatched through the same registry.

use std::sync::Arc;

use trove_foundation::{Context, ErrorKind, Node};

use crate::shapes::{Circle, Group, Rect, Shape, Triangle, context, dump, load, shorthand_shapes};

fn nested() -> Group {
    Group {
        members: vec![
            Arc::new(Circle { radius: 1.0 }),
            Arc::new(Group {
                members: vec![Arc::new(Rect { width: 2.0, height: 5.0 })],
            }),
        ],
    }
}

#[test]
fn groups_roundtrip() {
    let (shapes, ctx) = context(shorthand_shapes().build().unwrap());
    let mut node = Node::Null;
    shapes.serialize(&nested(), &mut node, &ctx).unwrap();
    assert_eq!(
        dump(&node),
        r#"{"kind":"group","members":[1,{"kind":"group","members":[{"height":5,"kind":"rect","width":2}]}]}"#
    );

    let back = shapes.deserialize(&node, &ctx).unwrap();
    assert_eq!(format!("{back:?}"), format!("{:?}", nested()));
    assert!((back.area() - nested().area()).abs() < f64::EPSILON);
}

#[test]
fn failing_member_is_located() {
    let (shapes, ctx) = context(shorthand_shapes().build().unwrap());
    let node = load(r#"{"kind": "group", "members": [2, {"kind": "group", "members": [{"kind": "star"}]}]}"#);

    let err = shapes.deserialize(&node, &ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownDiscriminatorValue { .. }));
    assert_eq!(
        err.context.unwrap().stack,
        vec!["members[0]".to_string(), "members[1]".to_string()]
    );
}

#[test]
fn failing_member_writes_nothing() {
    let (shapes, ctx) = context(shorthand_shapes().build().unwrap());
    let group = Group {
        members: vec![Arc::new(Circle { radius: 1.0 }), Arc::new(Triangle)],
    };

    let mut node = Node::Null;
    let err = shapes.serialize(&group, &mut node, &ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoConverterForType { .. }));
    assert_eq!(err.context.unwrap().stack, vec!["members[1]".to_string()]);
    // the tag is already written when the group converter fails
    assert_eq!(dump(&node), r#"{"kind":"group"}"#);
}

#[test]
fn nested_fields_need_the_registry_in_context() {
    let (shapes, _) = context(shorthand_shapes().build().unwrap());
    let err = shapes
        .deserialize(&load(r#"{"kind": "group", "members": []}"#), &Context::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingContext("shapes")));
}
