//! Loot conditions: predicates over the loot context.
//!
//! Wire forms use a `condition` key, and compound conditions nest other
//! conditions and numbers:
//!
//! ```text
//! {condition: "minecraft:all_of", terms: [
//!     {condition: "minecraft:killed_by_player"},
//!     {condition: "minecraft:random_chance", chance: 0.25},
//! ]}
//! ```

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use trove_convert::{ConversionRegistry, FnConverter, RegistryBuilder, converter};
use trove_foundation::{Family, TypeToken, Variant};

use crate::DynEq;
use crate::context::{EXPLOSION_RADIUS, KILLER_PLAYER, LootContext};
use crate::loader::loader;
use crate::number::LootNumber;

/// A predicate over a loot context.
pub trait LootCondition: Variant + DynEq + fmt::Debug {
    /// Returns true if the context passes this condition.
    fn test(&self, ctx: &mut LootContext) -> bool;
}

impl<T: LootCondition> Family<T> for dyn LootCondition {
    fn upcast(value: Arc<T>) -> Arc<Self> {
        value
    }
}

impl PartialEq for dyn LootCondition {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

/// Where condition registries read and write their discriminator.
pub const KEY_LOCATION: &str = "condition";

// =============================================================================
// Variants
// =============================================================================

/// Passes when every term passes. No terms always pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AllOf {
    /// The terms, tested in order until one fails.
    pub terms: Vec<Arc<dyn LootCondition>>,
}

impl AllOf {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:all_of";
}

impl LootCondition for AllOf {
    fn test(&self, ctx: &mut LootContext) -> bool {
        self.terms.iter().all(|term| term.test(ctx))
    }
}

/// Passes when any term passes. No terms never pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AnyOf {
    /// The terms, tested in order until one passes.
    pub terms: Vec<Arc<dyn LootCondition>>,
}

impl AnyOf {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:any_of";
}

impl LootCondition for AnyOf {
    fn test(&self, ctx: &mut LootContext) -> bool {
        self.terms.iter().any(|term| term.test(ctx))
    }
}

/// Passes when its term fails.
#[derive(Clone, Debug)]
pub struct Inverted {
    /// The inverted term.
    pub term: Arc<dyn LootCondition>,
}

impl Inverted {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:inverted";
}

impl PartialEq for Inverted {
    fn eq(&self, other: &Self) -> bool {
        *self.term == *other.term
    }
}

impl LootCondition for Inverted {
    fn test(&self, ctx: &mut LootContext) -> bool {
        !self.term.test(ctx)
    }
}

/// Passes with the probability given by `chance`.
#[derive(Clone, Debug)]
pub struct RandomChance {
    /// Probability of passing, from 0 to 1.
    pub chance: Arc<dyn LootNumber>,
}

impl RandomChance {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:random_chance";
}

impl PartialEq for RandomChance {
    fn eq(&self, other: &Self) -> bool {
        *self.chance == *other.chance
    }
}

impl LootCondition for RandomChance {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let chance = self.chance.get_double(ctx);
        ctx.random().r#gen::<f64>() < chance
    }
}

/// Passes when a player is credited with the kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct KilledByPlayer;

impl KilledByPlayer {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:killed_by_player";
}

impl LootCondition for KilledByPlayer {
    fn test(&self, ctx: &mut LootContext) -> bool {
        ctx.has(KILLER_PLAYER)
    }
}

/// Passes unless an explosion destroys the drop, with chance `1 / radius`
/// of surviving. Always passes without an explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SurvivesExplosion;

impl SurvivesExplosion {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:survives_explosion";
}

impl LootCondition for SurvivesExplosion {
    fn test(&self, ctx: &mut LootContext) -> bool {
        match ctx.get(EXPLOSION_RADIUS).copied() {
            Some(radius) => ctx.random().r#gen::<f32>() <= 1.0 / radius,
            None => true,
        }
    }
}

// =============================================================================
// Converters
// =============================================================================

/// Converter for [`AllOf`].
#[must_use]
pub fn all_of_converter() -> FnConverter<dyn LootCondition, AllOf> {
    converter(
        |all, node, ctx| loader(ctx)?.conditions().serialize_list(&all.terms, node, "terms", ctx),
        |node, ctx| {
            Ok(AllOf {
                terms: loader(ctx)?.conditions().deserialize_list(node, "terms", ctx)?,
            })
        },
    )
}

/// Converter for [`AnyOf`].
#[must_use]
pub fn any_of_converter() -> FnConverter<dyn LootCondition, AnyOf> {
    converter(
        |any, node, ctx| loader(ctx)?.conditions().serialize_list(&any.terms, node, "terms", ctx),
        |node, ctx| {
            Ok(AnyOf {
                terms: loader(ctx)?.conditions().deserialize_list(node, "terms", ctx)?,
            })
        },
    )
}

/// Converter for [`Inverted`].
#[must_use]
pub fn inverted_converter() -> FnConverter<dyn LootCondition, Inverted> {
    converter(
        |inverted, node, ctx| {
            loader(ctx)?
                .conditions()
                .serialize_at(inverted.term.as_ref(), node, "term", ctx)
        },
        |node, ctx| {
            Ok(Inverted {
                term: loader(ctx)?.conditions().deserialize_at(node, "term", ctx)?,
            })
        },
    )
}

/// Converter for [`RandomChance`]; the chance is any loot number.
#[must_use]
pub fn random_chance_converter() -> FnConverter<dyn LootCondition, RandomChance> {
    converter(
        |random, node, ctx| {
            loader(ctx)?
                .numbers()
                .serialize_at(random.chance.as_ref(), node, "chance", ctx)
        },
        |node, ctx| {
            Ok(RandomChance {
                chance: loader(ctx)?.numbers().deserialize_at(node, "chance", ctx)?,
            })
        },
    )
}

/// Converter for [`KilledByPlayer`].
#[must_use]
pub fn killed_by_player_converter() -> FnConverter<dyn LootCondition, KilledByPlayer> {
    converter(|_, _, _| Ok(()), |_, _| Ok(KilledByPlayer))
}

/// Converter for [`SurvivesExplosion`].
#[must_use]
pub fn survives_explosion_converter() -> FnConverter<dyn LootCondition, SurvivesExplosion> {
    converter(|_, _, _| Ok(()), |_, _| Ok(SurvivesExplosion))
}

/// Returns a builder preloaded with the standard conditions.
///
/// Add more variants to it before building to extend the family.
#[must_use]
pub fn standard_conditions() -> RegistryBuilder<dyn LootCondition> {
    let mut builder = ConversionRegistry::builder();
    builder
        .set_base_type(TypeToken::of::<dyn LootCondition>())
        .set_key_location(KEY_LOCATION)
        .add_keyed(AllOf::KEY, all_of_converter())
        .add_keyed(AnyOf::KEY, any_of_converter())
        .add_keyed(Inverted::KEY, inverted_converter())
        .add_keyed(RandomChance::KEY, random_chance_converter())
        .add_keyed(KilledByPlayer::KEY, killed_by_player_converter())
        .add_keyed(SurvivesExplosion::KEY, survives_explosion_converter());
    builder
}
