//! Registry construction and validation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trove_foundation::{Error, NodePath, Result, TypeToken, Variant};

use crate::converter::{ConditionalConverter, Keyed, KeyedConverter, TypedConverter};
use crate::registry::ConversionRegistry;

/// Accumulates converters for a [`ConversionRegistry`].
///
/// Nothing is validated until [`build`](Self::build), which either returns a
/// fully consistent registry or the first problem found. Registration order
/// is preserved for both conditional and keyed converters.
pub struct RegistryBuilder<V: ?Sized> {
    base_type: Option<TypeToken>,
    key_location: Option<NodePath>,
    duplicate_setting: Option<&'static str>,
    conditionals: Vec<Arc<dyn ConditionalConverter<V>>>,
    keyed: Vec<Arc<dyn KeyedConverter<V>>>,
}

impl<V: ?Sized + Variant> RegistryBuilder<V> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_type: None,
            key_location: None,
            duplicate_setting: None,
            conditionals: Vec::new(),
            keyed: Vec::new(),
        }
    }

    /// Sets the type every keyed converter must handle a subtype of.
    ///
    /// Required, and only once.
    pub fn set_base_type(&mut self, base_type: TypeToken) -> &mut Self {
        if self.base_type.is_some() {
            self.duplicate_setting.get_or_insert("base type");
        }
        self.base_type = Some(base_type);
        self
    }

    /// Sets where the discriminator key lives inside a node.
    ///
    /// Required, and only once.
    pub fn set_key_location(&mut self, location: impl Into<NodePath>) -> &mut Self {
        if self.key_location.is_some() {
            self.duplicate_setting.get_or_insert("key location");
        }
        self.key_location = Some(location.into());
        self
    }

    /// Appends a conditional converter. Earlier registrations win.
    pub fn add_conditional(&mut self, converter: impl ConditionalConverter<V> + 'static) -> &mut Self {
        self.conditionals.push(Arc::new(converter));
        self
    }

    /// Appends an already shared conditional converter.
    pub fn add_conditional_shared(&mut self, converter: Arc<dyn ConditionalConverter<V>>) -> &mut Self {
        self.conditionals.push(converter);
        self
    }

    /// Binds `converter` to `key` and appends it.
    pub fn add_keyed(
        &mut self,
        key: impl Into<String>,
        converter: impl TypedConverter<V> + 'static,
    ) -> &mut Self {
        self.add(Keyed::new(key, converter))
    }

    /// Appends a keyed converter.
    pub fn add(&mut self, converter: impl KeyedConverter<V> + 'static) -> &mut Self {
        self.keyed.push(Arc::new(converter));
        self
    }

    /// Appends an already shared keyed converter.
    pub fn add_shared(&mut self, converter: Arc<dyn KeyedConverter<V>>) -> &mut Self {
        self.keyed.push(converter);
        self
    }

    /// Returns the number of keyed converters added so far.
    #[must_use]
    pub fn keyed_len(&self) -> usize {
        self.keyed.len()
    }

    /// Returns the number of conditional converters added so far.
    #[must_use]
    pub fn conditional_len(&self) -> usize {
        self.conditionals.len()
    }

    /// Validates the accumulated configuration and produces a registry.
    ///
    /// The registry receives its own copies of the converter lists, so the
    /// builder can keep being used without affecting it.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `MissingConfiguration` if the base type or key location is unset
    /// - `DuplicateConfiguration` if either was set more than once
    /// - then, per keyed converter in registration order: `BaseTypeViolation`,
    ///   `DuplicateKey`, `DuplicateType`
    pub fn build(&self) -> Result<ConversionRegistry<V>> {
        let base_type = self
            .base_type
            .clone()
            .ok_or_else(|| Error::missing_configuration("base type"))?;
        let key_location = self
            .key_location
            .clone()
            .ok_or_else(|| Error::missing_configuration("key location"))?;
        if let Some(setting) = self.duplicate_setting {
            return Err(Error::duplicate_configuration(setting));
        }

        let mut by_key: HashMap<String, usize> = HashMap::with_capacity(self.keyed.len());
        let mut by_type: HashMap<TypeToken, usize> = HashMap::with_capacity(self.keyed.len());

        for (index, converter) in self.keyed.iter().enumerate() {
            let key = converter.key();
            let converted = converter.converted_type();

            if !converted.is_subtype_of(&base_type) {
                return Err(Error::base_type_violation(key, converted, base_type));
            }
            if by_key.contains_key(key) {
                return Err(Error::duplicate_key(key, base_type));
            }
            if let Some(&existing) = by_type.get(&converted) {
                return Err(Error::duplicate_type(key, converted, self.keyed[existing].key()));
            }

            by_key.insert(key.to_owned(), index);
            by_type.insert(converted, index);
        }

        tracing::debug!(
            base = %base_type,
            key_location = %key_location,
            keyed = self.keyed.len(),
            conditionals = self.conditionals.len(),
            "built conversion registry"
        );

        Ok(ConversionRegistry::from_parts(
            base_type,
            key_location,
            self.conditionals.clone(),
            self.keyed.clone(),
            by_key,
            by_type,
        ))
    }
}

impl<V: ?Sized + Variant> Default for RegistryBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> Clone for RegistryBuilder<V> {
    fn clone(&self) -> Self {
        Self {
            base_type: self.base_type.clone(),
            key_location: self.key_location.clone(),
            duplicate_setting: self.duplicate_setting,
            conditionals: self.conditionals.clone(),
            keyed: self.keyed.clone(),
        }
    }
}

impl<V: ?Sized> fmt::Debug for RegistryBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("base_type", &self.base_type)
            .field("key_location", &self.key_location)
            .field("keys", &self.keyed.iter().map(|c| c.key()).collect::<Vec<_>>())
            .field("conditionals", &self.conditionals.len())
            .finish()
    }
}

impl<V: ?Sized> RegistryBuilder<V> {
    pub(crate) fn from_registry_parts(
        base_type: TypeToken,
        key_location: NodePath,
        conditionals: Vec<Arc<dyn ConditionalConverter<V>>>,
        keyed: Vec<Arc<dyn KeyedConverter<V>>>,
    ) -> Self {
        Self {
            base_type: Some(base_type),
            key_location: Some(key_location),
            duplicate_setting: None,
            conditionals,
            keyed,
        }
    }
}
