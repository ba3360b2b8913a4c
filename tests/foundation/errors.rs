//! Integration tests for Error types
//!
//! Tests error construction, display, context, and classification.

use trove_foundation::{Context, ContextKey, Error, ErrorContext, ErrorKind, Node, NodeKind, NodePath, TypeToken};

struct Condition;

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_discriminator() {
    let err = Error::unknown_discriminator(
        NodePath::key("condition"),
        "minecraft:weather_check",
        TypeToken::of::<Condition>(),
    );
    assert!(matches!(err.kind, ErrorKind::UnknownDiscriminatorValue { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("minecraft:weather_check"));
    assert!(msg.contains("condition"));
    assert!(msg.contains("Condition"));
}

#[test]
fn error_missing_configuration() {
    let err = Error::missing_configuration("key location");
    assert!(matches!(err.kind, ErrorKind::MissingConfiguration(_)));
    assert_eq!(format!("{err}"), "missing registry configuration: key location");
}

#[test]
fn error_from_node_access() {
    let node = Node::Int(3);
    let err = node.require_str(NodePath::root()).unwrap_err();
    match err.kind {
        ErrorKind::InvalidNode { expected, actual, .. } => {
            assert_eq!(expected, "string");
            assert_eq!(actual, NodeKind::Int);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn error_from_context() {
    const SEED: ContextKey<u64> = ContextKey::new("seed");
    let err = Context::new().require(SEED).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingContext("seed")));
}

// =============================================================================
// Classification and Context
// =============================================================================

#[test]
fn error_kinds_classify() {
    let base = TypeToken::of::<Condition>();
    let build = [
        Error::duplicate_key("a", base.clone()),
        Error::duplicate_configuration("base type"),
        Error::base_type_violation("a", TypeToken::of::<u8>(), base.clone()),
    ];
    let resolution = [
        Error::no_converter_for_type(TypeToken::of::<u8>(), base.clone()),
        Error::missing_discriminator(NodePath::key("type"), base.clone()),
        Error::invalid_discriminator(NodePath::key("type"), NodeKind::List, base),
    ];

    assert!(build.iter().all(|e| e.kind.is_build_error() && !e.kind.is_resolution_error()));
    assert!(resolution.iter().all(|e| e.kind.is_resolution_error() && !e.kind.is_build_error()));
}

#[test]
fn error_with_context() {
    let err = Error::missing_field(NodePath::key("chance")).with_context(
        ErrorContext::new()
            .with_source("chests/simple_dungeon.json")
            .with_path(NodePath::key("pools").at(0)),
    );

    let ctx = err.context.unwrap();
    assert_eq!(ctx.source.as_deref(), Some("chests/simple_dungeon.json"));
    assert_eq!(ctx.path, Some(NodePath::key("pools").at(0)));
    assert!(ctx.stack.is_empty());
}
