//! Polymorphic dispatch over a family of converters.
//!
//! Resolution runs in two phases and never backtracks:
//!
//! 1. Conditional converters are asked in registration order. The first one
//!    that accepts the value (or node) handles the call, and its result is
//!    final even when it fails.
//! 2. Otherwise the keyed converters are consulted: by exact runtime type
//!    when serializing, by the discriminator read from the node when
//!    deserializing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trove_foundation::{Context, Error, Node, NodeList, NodePath, Result, TypeToken, Variant};

use crate::builder::RegistryBuilder;
use crate::converter::{ConditionalConverter, KeyedConverter, TypedConverter};

/// An immutable, validated dispatcher for the family rooted at `V`.
///
/// Every keyed converter is reachable both by its key and by its exact type.
/// A registry is safe to share across threads; wrap it in an `Arc`.
pub struct ConversionRegistry<V: ?Sized> {
    base_type: TypeToken,
    key_location: NodePath,
    conditionals: Vec<Arc<dyn ConditionalConverter<V>>>,
    keyed: Vec<Arc<dyn KeyedConverter<V>>>,
    by_key: HashMap<String, usize>,
    by_type: HashMap<TypeToken, usize>,
}

impl<V: ?Sized + Variant> ConversionRegistry<V> {
    /// Creates an empty builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder<V> {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        base_type: TypeToken,
        key_location: NodePath,
        conditionals: Vec<Arc<dyn ConditionalConverter<V>>>,
        keyed: Vec<Arc<dyn KeyedConverter<V>>>,
        by_key: HashMap<String, usize>,
        by_type: HashMap<TypeToken, usize>,
    ) -> Self {
        Self {
            base_type,
            key_location,
            conditionals,
            keyed,
            by_key,
            by_type,
        }
    }

    /// Reopens this registry as an independent builder, for downstream
    /// extension. The registry itself is unaffected.
    #[must_use]
    pub fn to_builder(&self) -> RegistryBuilder<V> {
        RegistryBuilder::from_registry_parts(
            self.base_type.clone(),
            self.key_location.clone(),
            self.conditionals.clone(),
            self.keyed.clone(),
        )
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Writes `value` into `node`.
    ///
    /// When a keyed converter is chosen, its key is written at the key
    /// location before the converter runs. That write is not undone if the
    /// converter then fails.
    ///
    /// # Errors
    ///
    /// Returns `NoConverterForType` if nothing handles the value's runtime
    /// type, a `NodeShape` error if the key cannot be written, or whatever
    /// the chosen converter returns.
    pub fn serialize(&self, value: &V, node: &mut Node, ctx: &Context) -> Result<()> {
        if let Some(conditional) = self.conditionals.iter().find(|c| c.can_serialize(value, ctx)) {
            tracing::trace!(base = %self.base_type, "serializing through conditional converter");
            return conditional.serialize(value, node, ctx);
        }

        let actual = value.variant_type();
        let converter = self
            .converter_for_type(&actual)
            .ok_or_else(|| Error::no_converter_for_type(actual, self.base_type.clone()))?;

        tracing::trace!(base = %self.base_type, key = converter.key(), "serializing through keyed converter");
        node.set(&self.key_location, converter.key())?;
        converter.serialize(value, node, ctx)
    }

    /// Reads a value of the family from `node`.
    ///
    /// # Errors
    ///
    /// Returns `MissingDiscriminator` if the key location is absent or null,
    /// `InvalidDiscriminator` if it is not a string,
    /// `UnknownDiscriminatorValue` if no converter has that key, or whatever
    /// the chosen converter returns.
    pub fn deserialize(&self, node: &Node, ctx: &Context) -> Result<Arc<V>> {
        if let Some(conditional) = self.conditionals.iter().find(|c| c.can_deserialize(node, ctx)) {
            tracing::trace!(base = %self.base_type, "deserializing through conditional converter");
            return conditional.deserialize(node, ctx);
        }

        let key = self.discriminator(node)?;
        let converter = self.converter_for_key(key).ok_or_else(|| {
            Error::unknown_discriminator(self.key_location.clone(), key, self.base_type.clone())
        })?;

        tracing::trace!(base = %self.base_type, key, "deserializing through keyed converter");
        converter.deserialize(node, ctx)
    }

    fn discriminator<'a>(&self, node: &'a Node) -> Result<&'a str> {
        let found = node.get(&self.key_location).ok_or_else(|| {
            Error::missing_discriminator(self.key_location.clone(), self.base_type.clone())
        })?;
        found.as_str().ok_or_else(|| {
            Error::invalid_discriminator(self.key_location.clone(), found.kind(), self.base_type.clone())
        })
    }

    // =========================================================================
    // Nested fields
    // =========================================================================

    /// Serializes `value` into the child of `node` at `path`.
    ///
    /// # Errors
    ///
    /// As [`serialize`](Self::serialize); the error gains a frame naming
    /// `path`.
    pub fn serialize_at(
        &self,
        value: &V,
        node: &mut Node,
        path: impl Into<NodePath>,
        ctx: &Context,
    ) -> Result<()> {
        let path = path.into();
        let mut child = Node::Null;
        self.serialize(value, &mut child, ctx)
            .and_then(|()| node.set(&path, child))
            .map_err(|e| e.with_frame(path.to_string()))
    }

    /// Deserializes the child of `node` at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the child is absent, otherwise as
    /// [`deserialize`](Self::deserialize); the error gains a frame naming
    /// `path`.
    pub fn deserialize_at(&self, node: &Node, path: impl Into<NodePath>, ctx: &Context) -> Result<Arc<V>> {
        let path = path.into();
        node.require(&path)
            .and_then(|child| self.deserialize(child, ctx))
            .map_err(|e| e.with_frame(path.to_string()))
    }

    /// Serializes each value into a list stored at `path`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing element; the error gains a frame naming
    /// the element (`terms[2]`). Nothing is written at `path` on failure.
    pub fn serialize_list(
        &self,
        values: &[Arc<V>],
        node: &mut Node,
        path: impl Into<NodePath>,
        ctx: &Context,
    ) -> Result<()> {
        let path = path.into();
        let mut list = NodeList::new();
        for (index, value) in values.iter().enumerate() {
            let mut child = Node::Null;
            self.serialize(value.as_ref(), &mut child, ctx)
                .map_err(|e| e.with_frame(path.at(index).to_string()))?;
            list.push(child);
        }
        node.set(&path, list)
    }

    /// Deserializes each element of the list stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` or `InvalidNode` if there is no list at
    /// `path`, otherwise the first element failure with a frame naming the
    /// element (`terms[2]`).
    pub fn deserialize_list(
        &self,
        node: &Node,
        path: impl Into<NodePath>,
        ctx: &Context,
    ) -> Result<Vec<Arc<V>>> {
        let path = path.into();
        node.require_list(&path)?
            .iter()
            .enumerate()
            .map(|(index, child)| {
                self.deserialize(child, ctx)
                    .map_err(|e| e.with_frame(path.at(index).to_string()))
            })
            .collect()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Returns the family's base type.
    #[must_use]
    pub fn base_type(&self) -> &TypeToken {
        &self.base_type
    }

    /// Returns where the discriminator key lives inside a node.
    #[must_use]
    pub fn key_location(&self) -> &NodePath {
        &self.key_location
    }

    /// Returns the conditional converters, in registration order.
    #[must_use]
    pub fn conditionals(&self) -> &[Arc<dyn ConditionalConverter<V>>] {
        &self.conditionals
    }

    /// Returns the keyed converters, in registration order.
    #[must_use]
    pub fn keyed_converters(&self) -> &[Arc<dyn KeyedConverter<V>>] {
        &self.keyed
    }

    /// Looks up a keyed converter by discriminator key.
    #[must_use]
    pub fn converter_for_key(&self, key: &str) -> Option<&Arc<dyn KeyedConverter<V>>> {
        self.by_key.get(key).map(|&index| &self.keyed[index])
    }

    /// Looks up a keyed converter by exact type.
    #[must_use]
    pub fn converter_for_type(&self, token: &TypeToken) -> Option<&Arc<dyn KeyedConverter<V>>> {
        self.by_type.get(token).map(|&index| &self.keyed[index])
    }

    /// Returns the registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keyed.iter().map(|c| c.key())
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Returns the number of keyed converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyed.len()
    }

    /// Returns true if no keyed converters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyed.is_empty()
    }
}

/// A registry converts its whole family, so it can serve as the converter
/// for a nested field of another converter.
impl<V: ?Sized + Variant> TypedConverter<V> for ConversionRegistry<V> {
    fn converted_type(&self) -> TypeToken {
        self.base_type.clone()
    }

    fn serialize(&self, value: &V, node: &mut Node, ctx: &Context) -> Result<()> {
        ConversionRegistry::serialize(self, value, node, ctx)
    }

    fn deserialize(&self, node: &Node, ctx: &Context) -> Result<Arc<V>> {
        ConversionRegistry::deserialize(self, node, ctx)
    }
}

impl<V: ?Sized> fmt::Debug for ConversionRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRegistry")
            .field("base_type", &self.base_type)
            .field("key_location", &self.key_location)
            .field("keys", &self.keyed.iter().map(|c| c.key()).collect::<Vec<_>>())
            .field("conditionals", &self.conditionals.len())
            .finish()
    }
}
