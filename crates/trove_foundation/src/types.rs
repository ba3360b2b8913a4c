//! Type descriptors for registry dispatch.
//!
//! A [`TypeToken`] names one exact Rust type. Tokens compare by that exact
//! type only, so a token for `Uniform` built in one crate is equal to a token
//! for `Uniform` built anywhere else. Supertypes are declared explicitly with
//! [`TypeToken::extends`]; nothing is inferred.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Exact-type descriptor with an explicitly declared supertype chain.
#[derive(Clone)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
    supertypes: Arc<[TypeToken]>,
}

impl TypeToken {
    /// Creates the token for `T`, with no declared supertypes.
    ///
    /// `T` may be unsized, so `TypeToken::of::<dyn LootNumber>()` names a
    /// family root.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_name(std::any::type_name::<T>()),
            supertypes: Arc::from([]),
        }
    }

    /// Declares `parent` as a direct supertype of this type.
    #[must_use]
    pub fn extends(self, parent: TypeToken) -> Self {
        let mut supertypes = self.supertypes.to_vec();
        if !supertypes.contains(&parent) {
            supertypes.push(parent);
        }
        Self {
            supertypes: supertypes.into(),
            ..self
        }
    }

    /// Returns the underlying type id.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns a readable name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the directly declared supertypes.
    #[must_use]
    pub fn supertypes(&self) -> &[TypeToken] {
        &self.supertypes
    }

    /// Returns true if this token names exactly `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Checks whether this type is `base` or declares it, transitively, as a
    /// supertype.
    #[must_use]
    pub fn is_subtype_of(&self, base: &TypeToken) -> bool {
        self == base || self.supertypes.iter().any(|parent| parent.is_subtype_of(base))
    }
}

/// Strips the module path from a plain type name (`trove_loot::number::Uniform`
/// becomes `Uniform`). Generic and `dyn` names are kept as they are.
fn short_name(full: &'static str) -> &'static str {
    if full.contains('<') || full.contains(' ') {
        full
    } else {
        full.rsplit("::").next().unwrap_or(full)
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// Variant / Family
// =============================================================================

/// A value that can report its exact runtime type.
///
/// Blanket-implemented for every `Any + Send + Sync` type. Family traits list
/// it as a supertrait (`trait LootNumber: Variant`), which makes the methods
/// callable on `dyn LootNumber` and dispatch to the concrete variant.
///
/// Smart pointers are variants as well, so call these on the pointee
/// (`(*arc).variant_type()`), not on an `Arc<dyn LootNumber>`.
pub trait Variant: Any + Send + Sync {
    /// Returns the token of the concrete type behind this value.
    fn variant_type(&self) -> TypeToken;

    /// Returns this value as `&dyn Any`, for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> Variant for T {
    fn variant_type(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Implemented by a family root for every variant `T` it admits.
///
/// ```ignore
/// impl<T: LootNumber> Family<T> for dyn LootNumber {
///     fn upcast(value: Arc<T>) -> Arc<Self> {
///         value
///     }
/// }
/// ```
pub trait Family<T: Variant>: Variant {
    /// Converts a shared variant into a shared family value.
    fn upcast(value: Arc<T>) -> Arc<Self>;

    /// Returns the token of the family root itself.
    #[must_use]
    fn family_type() -> TypeToken {
        TypeToken::of::<Self>()
    }
}
