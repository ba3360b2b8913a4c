//! Integration tests for loot documents
//!
//! Tests reading and writing numbers and conditions in their JSON forms.

use std::sync::Arc;

use trove_foundation::{ErrorKind, Node, NodePath};
use trove_loot::{
    AllOf, AnyOf, Binomial, Constant, Inverted, KilledByPlayer, LootCondition, LootNumber, RandomChance,
    SurvivesExplosion, Uniform,
};

use crate::{dump, load, standard};

// =============================================================================
// Numbers
// =============================================================================

#[test]
fn bare_and_tagged_constants_read_alike() {
    let loader = standard();
    let bare = loader.read_number(&load("5")).unwrap();
    let tagged = loader.read_number(&load(r#"{"type": "minecraft:constant", "value": 5}"#)).unwrap();
    let expected: Arc<dyn LootNumber> = Arc::new(Constant::new(5.0));
    assert!(*bare == *expected);
    assert!(*tagged == *expected);
}

#[test]
fn constants_write_bare() {
    let loader = standard();
    assert_eq!(loader.write_number(&Constant::new(5.0)).unwrap(), Node::Int(5));
    assert_eq!(loader.write_number(&Constant::new(0.5)).unwrap(), Node::Float(0.5));
}

#[test]
fn uniform_document() {
    let loader = standard();
    let node = load(r#"{"type": "minecraft:uniform", "min": 1, "max": 3}"#);
    let number = loader.read_number(&node).unwrap();
    let expected: Arc<dyn LootNumber> = Arc::new(Uniform::between(1.0, 3.0));
    assert!(*number == *expected);
    assert_eq!(dump(&loader.write_number(number.as_ref()).unwrap()), r#"{"max":3,"min":1,"type":"minecraft:uniform"}"#);
}

#[test]
fn nested_numbers() {
    let loader = standard();
    let text = r#"{"n":{"max":8,"min":2,"type":"minecraft:uniform"},"p":0.25,"type":"minecraft:binomial"}"#;
    let number = loader.read_number(&load(text)).unwrap();

    let expected: Arc<dyn LootNumber> = Arc::new(Binomial {
        n: Arc::new(Uniform::between(2.0, 8.0)),
        p: Arc::new(Constant::new(0.25)),
    });
    assert!(*number == *expected, "{number:?} != {expected:?}");
    assert_eq!(dump(&loader.write_number(number.as_ref()).unwrap()), text);
}

#[test]
fn number_field_errors_are_located() {
    let loader = standard();
    let node = load(r#"{"type": "minecraft:binomial", "n": 4, "p": {"type": "minecraft:normal"}}"#);
    let err = loader.read_number(&node).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownDiscriminatorValue { .. }));
    assert_eq!(err.context.unwrap().stack, vec!["p".to_string()]);

    let node = load(r#"{"type": "minecraft:uniform", "min": 1}"#);
    let err = loader.read_number(&node).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField { .. }));
    assert_eq!(err.context.unwrap().stack, vec!["max".to_string()]);
}

#[test]
fn strings_are_not_numbers() {
    let loader = standard();
    let err = loader.read_number(&load(r#""five""#)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingDiscriminator { .. }));
}

// =============================================================================
// Conditions
// =============================================================================

const DUNGEON_POOL: &str = r#"{
    "condition": "minecraft:all_of",
    "terms": [
        {"condition": "minecraft:killed_by_player"},
        {"condition": "minecraft:inverted", "term": {"condition": "minecraft:survives_explosion"}},
        {"condition": "minecraft:any_of", "terms": [
            {"condition": "minecraft:random_chance", "chance": 0.025},
            {"condition": "minecraft:random_chance", "chance": {"type": "minecraft:uniform", "min": 0, "max": 0.5}}
        ]}
    ]
}"#;

fn dungeon_pool() -> Arc<dyn LootCondition> {
    Arc::new(AllOf {
        terms: vec![
            Arc::new(KilledByPlayer),
            Arc::new(Inverted {
                term: Arc::new(SurvivesExplosion),
            }),
            Arc::new(AnyOf {
                terms: vec![
                    Arc::new(RandomChance {
                        chance: Arc::new(Constant::new(0.025)),
                    }),
                    Arc::new(RandomChance {
                        chance: Arc::new(Uniform::between(0.0, 0.5)),
                    }),
                ],
            }),
        ],
    })
}

#[test]
fn condition_document() {
    let loader = standard();
    let condition = loader.read_condition(&load(DUNGEON_POOL)).unwrap();
    assert!(*condition == *dungeon_pool(), "{condition:?}");
}

#[test]
fn condition_roundtrip_preserves_document() {
    let loader = standard();
    let node = loader.write_condition(dungeon_pool().as_ref()).unwrap();
    assert_eq!(node, load(DUNGEON_POOL));
}

#[test]
fn deep_errors_carry_every_frame() {
    let loader = standard();
    let mut node = load(DUNGEON_POOL);
    node.set(
        NodePath::key("terms").at(2).child("terms").at(1).child("chance").child("type"),
        "minecraft:normal",
    )
    .unwrap();

    let err = loader.read_condition(&node).unwrap_err();
    match &err.kind {
        ErrorKind::UnknownDiscriminatorValue { value, base, .. } => {
            assert_eq!(value, "minecraft:normal");
            assert!(base.is::<dyn LootNumber>());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.context.unwrap().stack,
        vec!["chance".to_string(), "terms[1]".to_string(), "terms[2]".to_string()]
    );
}

#[test]
fn conditions_need_their_own_key() {
    let loader = standard();
    // a number document is not a condition
    let err = loader.read_condition(&load(r#"{"type": "minecraft:uniform"}"#)).unwrap_err();
    match err.kind {
        ErrorKind::MissingDiscriminator { path, .. } => assert_eq!(path.to_string(), "condition"),
        other => panic!("unexpected error: {other}"),
    }
}
