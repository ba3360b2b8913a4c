//! Parameter bags threaded through conversion calls.
//!
//! A [`Context`] carries whatever a converter needs from its environment
//! (sibling registries, random sources, lookup tables). Registries pass it
//! through untouched; only converters look inside.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::Result;
use crate::error::Error;

/// Typed key for a [`Context`] entry.
///
/// Keys are identified by name; the type parameter only guides lookups.
pub struct ContextKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ContextKey<T> {
    /// Creates a key with the given name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ContextKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContextKey<T> {}

impl<T> fmt::Debug for ContextKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextKey({})", self.name)
    }
}

/// Immutable-by-convention bag of shared, typed parameters.
///
/// Cloning is cheap: values are reference counted.
#[derive(Clone, Default)]
pub struct Context {
    entries: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a parameter.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, key: ContextKey<T>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder method to add an already shared parameter.
    #[must_use]
    pub fn with_shared<T: Any + Send + Sync>(mut self, key: ContextKey<T>, value: Arc<T>) -> Self {
        self.insert_shared(key, value);
        self
    }

    /// Adds or replaces a parameter.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: ContextKey<T>, value: T) {
        self.insert_shared(key, Arc::new(value));
    }

    /// Adds or replaces an already shared parameter.
    pub fn insert_shared<T: Any + Send + Sync>(&mut self, key: ContextKey<T>, value: Arc<T>) {
        self.entries.insert(key.name, value);
    }

    /// Gets a parameter, if present with the key's type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, key: ContextKey<T>) -> Option<&T> {
        self.entries.get(key.name)?.downcast_ref::<T>()
    }

    /// Gets a shared handle to a parameter.
    #[must_use]
    pub fn get_shared<T: Any + Send + Sync>(&self, key: ContextKey<T>) -> Option<Arc<T>> {
        Arc::clone(self.entries.get(key.name)?).downcast::<T>().ok()
    }

    /// Returns true if the parameter is present with the key's type.
    #[must_use]
    pub fn has<T: Any + Send + Sync>(&self, key: ContextKey<T>) -> bool {
        self.get(key).is_some()
    }

    /// Gets a parameter that must be present.
    ///
    /// # Errors
    ///
    /// Returns `MissingContext` if the parameter is absent or has another type.
    pub fn require<T: Any + Send + Sync>(&self, key: ContextKey<T>) -> Result<&T> {
        self.get(key).ok_or_else(|| Error::missing_context(key.name))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}
