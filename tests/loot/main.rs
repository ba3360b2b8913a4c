//! Integration tests for Layer 2: Loot
//!
//! Tests loading loot documents through the standard registries and
//! evaluating what they describe.

mod documents;

use trove_foundation::Node;
use trove_loot::Loader;

pub fn standard() -> Loader {
    Loader::standard().unwrap()
}

pub fn load(json: &str) -> Node {
    serde_json::from_str(json).unwrap()
}

pub fn dump(node: &Node) -> String {
    serde_json::to_string(node).unwrap()
}
