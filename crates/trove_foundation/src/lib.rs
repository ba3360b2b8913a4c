//! Documents, paths, type tokens, and errors shared by Trove registries.
//!
//! This crate provides:
//! - [`Node`] - The persistent hierarchical document value
//! - [`NodePath`] - Locations inside a document
//! - [`TypeToken`] - Exact-type descriptors with declared supertypes
//! - [`Context`] - Typed parameters threaded through conversions
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`NodeList`], [`NodeMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod context;
pub mod error;
pub mod node;
pub mod path;
pub mod types;

pub use collections::{NodeList, NodeMap};
pub use context::{Context, ContextKey};
pub use error::{Error, ErrorContext, ErrorKind};
pub use node::{Node, NodeKind};
pub use path::{NodePath, PathSegment};
pub use types::{Family, TypeToken, Variant};

/// Result type alias using Trove's Error.
pub type Result<T> = std::result::Result<T, Error>;
