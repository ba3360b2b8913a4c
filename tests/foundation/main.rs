//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Node, NodePath, TypeToken, Context, and Error.

mod documents;
mod errors;
mod types;
