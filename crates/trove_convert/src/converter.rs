//! Converter contracts.
//!
//! A converter moves values of a family rooted at `V` to and from document
//! nodes. Three flavors exist:
//!
//! - [`TypedConverter`]: handles one exact variant type.
//! - [`ConditionalConverter`]: decides per value or per node whether it
//!   applies; used for shorthand wire forms that a tag cannot describe.
//! - [`KeyedConverter`]: a typed converter bound to a discriminator key.
//!
//! Converters hold no mutable state. Anything a conversion needs from its
//! environment arrives through the [`Context`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use trove_foundation::{Context, Error, Family, Node, Result, TypeToken, Variant};

/// Converts one exact variant of the family `V`.
pub trait TypedConverter<V: ?Sized>: Send + Sync {
    /// Returns the exact type this converter produces and consumes.
    fn converted_type(&self) -> TypeToken;

    /// Writes `value` into `node`, in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented.
    fn serialize(&self, value: &V, node: &mut Node, ctx: &Context) -> Result<()>;

    /// Reads a value from `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not describe a valid value.
    fn deserialize(&self, node: &Node, ctx: &Context) -> Result<Arc<V>>;
}

/// Converts any member of the family `V` that its predicates accept.
pub trait ConditionalConverter<V: ?Sized>: Send + Sync {
    /// Returns true if this converter takes responsibility for `value`.
    fn can_serialize(&self, value: &V, ctx: &Context) -> bool;

    /// Writes `value` into `node`, in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented.
    fn serialize(&self, value: &V, node: &mut Node, ctx: &Context) -> Result<()>;

    /// Returns true if this converter takes responsibility for `node`.
    fn can_deserialize(&self, node: &Node, ctx: &Context) -> bool;

    /// Reads a value from `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not describe a valid value.
    fn deserialize(&self, node: &Node, ctx: &Context) -> Result<Arc<V>>;
}

/// A [`TypedConverter`] bound to the discriminator key written on the wire.
pub trait KeyedConverter<V: ?Sized>: TypedConverter<V> {
    /// Returns the discriminator key.
    fn key(&self) -> &str;
}

// =============================================================================
// Keyed
// =============================================================================

/// Pairs a discriminator key with a typed converter.
pub struct Keyed<V: ?Sized> {
    key: String,
    converter: Arc<dyn TypedConverter<V>>,
}

impl<V: ?Sized> Keyed<V> {
    /// Binds `converter` to `key`.
    pub fn new(key: impl Into<String>, converter: impl TypedConverter<V> + 'static) -> Self {
        Self::shared(key, Arc::new(converter))
    }

    /// Binds an already shared converter to `key`.
    pub fn shared(key: impl Into<String>, converter: Arc<dyn TypedConverter<V>>) -> Self {
        Self {
            key: key.into(),
            converter,
        }
    }

    /// Returns the wrapped converter.
    #[must_use]
    pub fn converter(&self) -> &Arc<dyn TypedConverter<V>> {
        &self.converter
    }
}

impl<V: ?Sized> TypedConverter<V> for Keyed<V> {
    fn converted_type(&self) -> TypeToken {
        self.converter.converted_type()
    }

    fn serialize(&self, value: &V, node: &mut Node, ctx: &Context) -> Result<()> {
        self.converter.serialize(value, node, ctx)
    }

    fn deserialize(&self, node: &Node, ctx: &Context) -> Result<Arc<V>> {
        self.converter.deserialize(node, ctx)
    }
}

impl<V: ?Sized> KeyedConverter<V> for Keyed<V> {
    fn key(&self) -> &str {
        &self.key
    }
}

impl<V: ?Sized> fmt::Debug for Keyed<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyed")
            .field("key", &self.key)
            .field("converted_type", &self.converter.converted_type())
            .finish()
    }
}

/// Extension methods for typed converters.
pub trait TypedConverterExt<V: ?Sized>: TypedConverter<V> + Sized + 'static {
    /// Binds this converter to a discriminator key.
    fn keyed(self, key: impl Into<String>) -> Keyed<V> {
        Keyed::new(key, self)
    }
}

impl<V: ?Sized, C: TypedConverter<V> + 'static> TypedConverterExt<V> for C {}

// =============================================================================
// FnConverter
// =============================================================================

/// Serialization half of a [`FnConverter`].
pub type SerializeFn<T> = fn(&T, &mut Node, &Context) -> Result<()>;

/// Deserialization half of a [`FnConverter`].
pub type DeserializeFn<T> = fn(&Node, &Context) -> Result<T>;

/// Adapts a pair of plain functions over the concrete variant `T` into a
/// converter for the family `V`.
///
/// Values are downcast to `T` before serializing and upcast to `V` after
/// deserializing. The converted type is `T`, declared as extending `V`.
pub struct FnConverter<V: ?Sized, T> {
    serialize: SerializeFn<T>,
    deserialize: DeserializeFn<T>,
    _family: PhantomData<fn() -> Arc<V>>,
}

impl<V, T> FnConverter<V, T>
where
    V: Family<T> + ?Sized,
    T: Variant,
{
    /// Creates a converter from its two halves.
    #[must_use]
    pub fn new(serialize: SerializeFn<T>, deserialize: DeserializeFn<T>) -> Self {
        Self {
            serialize,
            deserialize,
            _family: PhantomData,
        }
    }
}

/// Shorthand for [`FnConverter::new`].
#[must_use]
pub fn converter<V, T>(serialize: SerializeFn<T>, deserialize: DeserializeFn<T>) -> FnConverter<V, T>
where
    V: Family<T> + ?Sized,
    T: Variant,
{
    FnConverter::new(serialize, deserialize)
}

impl<V, T> TypedConverter<V> for FnConverter<V, T>
where
    V: Family<T> + ?Sized,
    T: Variant,
{
    fn converted_type(&self) -> TypeToken {
        TypeToken::of::<T>().extends(V::family_type())
    }

    fn serialize(&self, value: &V, node: &mut Node, ctx: &Context) -> Result<()> {
        let variant = value.as_any().downcast_ref::<T>().ok_or_else(|| {
            Error::invalid_value(format!(
                "converter for {} cannot serialize {}",
                TypeToken::of::<T>(),
                value.variant_type()
            ))
        })?;
        (self.serialize)(variant, node, ctx)
    }

    fn deserialize(&self, node: &Node, ctx: &Context) -> Result<Arc<V>> {
        let variant = (self.deserialize)(node, ctx)?;
        Ok(V::upcast(Arc::new(variant)))
    }
}

impl<V: ?Sized, T> fmt::Debug for FnConverter<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnConverter({})", std::any::type_name::<T>())
    }
}
