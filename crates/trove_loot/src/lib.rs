//! Loot numbers and conditions loaded through Trove conversion registries.
//!
//! This crate provides:
//! - [`LootNumber`] - Numbers generated from a loot context
//! - [`LootCondition`] - Predicates over a loot context
//! - [`Loader`] - The registries both families are read and written with
//! - [`LootContext`] - Seeded randomness and generation parameters

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::any::Any;

pub mod condition;
pub mod context;
pub mod loader;
pub mod number;

pub use condition::{
    AllOf, AnyOf, Inverted, KilledByPlayer, LootCondition, RandomChance, SurvivesExplosion,
    standard_conditions,
};
pub use context::{EXPLOSION_RADIUS, KILLER_PLAYER, LootContext};
pub use loader::{LOADER, Loader, loader};
pub use number::{BareConstant, Binomial, Constant, LootNumber, Uniform, standard_numbers};

/// Equality across trait objects of the same family.
///
/// Blanket-implemented for every `PartialEq` type; values of different
/// concrete types are never equal.
pub trait DynEq {
    /// Compares against a value of any type.
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: PartialEq + Any> DynEq for T {
    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>() == Some(self)
    }
}
