//! Integration tests for type tokens and families

use std::collections::HashMap;
use std::sync::Arc;

use trove_foundation::{Family, TypeToken, Variant};

trait Entry: Variant {}

struct Item;
struct Tag;
struct Group;

impl Entry for Item {}
impl Entry for Tag {}

impl<T: Entry> Family<T> for dyn Entry {
    fn upcast(value: Arc<T>) -> Arc<Self> {
        value
    }
}

#[test]
fn tokens_work_as_map_keys() {
    let mut names = HashMap::new();
    names.insert(TypeToken::of::<Item>(), "item");
    names.insert(TypeToken::of::<Tag>().extends(TypeToken::of::<dyn Entry>()), "tag");

    // declared supertypes do not affect identity
    assert_eq!(names.get(&TypeToken::of::<Tag>()), Some(&"tag"));
    assert_eq!(names.get(&TypeToken::of::<Item>()), Some(&"item"));
    assert!(names.get(&TypeToken::of::<Group>()).is_none());
}

#[test]
fn family_membership_is_declared() {
    let entry = TypeToken::of::<dyn Entry>();
    let item = TypeToken::of::<Item>().extends(entry.clone());

    assert!(item.is_subtype_of(&entry));
    assert!(!TypeToken::of::<Item>().is_subtype_of(&entry));
    assert!(!TypeToken::of::<Group>().is_subtype_of(&entry));
}

#[test]
fn variants_report_their_type() {
    let entries: Vec<Arc<dyn Entry>> = vec![
        <dyn Entry as Family<Item>>::upcast(Arc::new(Item)),
        <dyn Entry as Family<Tag>>::upcast(Arc::new(Tag)),
    ];
    let types: Vec<TypeToken> = entries.iter().map(|e| (**e).variant_type()).collect();
    assert_eq!(types, vec![TypeToken::of::<Item>(), TypeToken::of::<Tag>()]);
}
