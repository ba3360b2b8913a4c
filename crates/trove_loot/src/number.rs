//! Loot numbers: values that may depend on the loot context.
//!
//! Wire forms use a `type` key:
//!
//! ```text
//! {type: "minecraft:constant", value: 5}
//! {type: "minecraft:uniform", min: 1, max: {type: "minecraft:constant", value: 3}}
//! {type: "minecraft:binomial", n: 4, p: 0.5}
//! ```
//!
//! A bare number is shorthand for a constant, and constants are always
//! written that way.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use trove_convert::{ConditionalConverter, ConversionRegistry, FnConverter, RegistryBuilder, converter};
use trove_foundation::{Context, Error, Family, Node, NodePath, Result, TypeToken, Variant};

use crate::DynEq;
use crate::context::LootContext;
use crate::loader::loader;

/// A number generated from a loot context.
pub trait LootNumber: Variant + DynEq + fmt::Debug {
    /// Generates an integer.
    fn get_int(&self, ctx: &mut LootContext) -> i64;

    /// Generates a floating point number.
    fn get_double(&self, ctx: &mut LootContext) -> f64;
}

impl<T: LootNumber> Family<T> for dyn LootNumber {
    fn upcast(value: Arc<T>) -> Arc<Self> {
        value
    }
}

impl PartialEq for dyn LootNumber {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

/// Where number registries read and write their discriminator.
pub const KEY_LOCATION: &str = "type";

// =============================================================================
// Variants
// =============================================================================

/// Always the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant {
    /// The value.
    pub value: f64,
}

impl Constant {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:constant";

    /// Creates a constant.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl LootNumber for Constant {
    #[allow(clippy::cast_possible_truncation)]
    fn get_int(&self, _: &mut LootContext) -> i64 {
        self.value as i64
    }

    fn get_double(&self, _: &mut LootContext) -> f64 {
        self.value
    }
}

/// Uniformly distributed between two numbers, inclusive for integers.
///
/// An empty or unrepresentable range (`max <= min`, a NaN bound, or a span
/// too wide for `f64`) yields `min`.
#[derive(Clone, Debug)]
pub struct Uniform {
    /// Lower bound.
    pub min: Arc<dyn LootNumber>,
    /// Upper bound.
    pub max: Arc<dyn LootNumber>,
}

impl Uniform {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:uniform";

    /// Creates a uniform number between two constants.
    #[must_use]
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Arc::new(Constant::new(min)),
            max: Arc::new(Constant::new(max)),
        }
    }
}

impl PartialEq for Uniform {
    fn eq(&self, other: &Self) -> bool {
        *self.min == *other.min && *self.max == *other.max
    }
}

impl LootNumber for Uniform {
    fn get_int(&self, ctx: &mut LootContext) -> i64 {
        let min = self.min.get_int(ctx);
        let max = self.max.get_int(ctx);
        if max <= min {
            return min;
        }
        ctx.random().gen_range(min..=max)
    }

    fn get_double(&self, ctx: &mut LootContext) -> f64 {
        let min = self.min.get_double(ctx);
        let max = self.max.get_double(ctx);
        let span = max - min;
        if !span.is_finite() || span <= 0.0 {
            return min;
        }
        ctx.random().gen_range(min..max)
    }
}

/// Number of successes in `n` trials that each succeed with chance `p`.
///
/// At most [`Binomial::MAX_TRIALS`] trials are run.
#[derive(Clone, Debug)]
pub struct Binomial {
    /// Number of trials.
    pub n: Arc<dyn LootNumber>,
    /// Chance of success per trial.
    pub p: Arc<dyn LootNumber>,
}

impl Binomial {
    /// Discriminator key.
    pub const KEY: &'static str = "minecraft:binomial";

    /// Upper bound on the trials run per evaluation.
    pub const MAX_TRIALS: i64 = 1 << 16;
}

impl PartialEq for Binomial {
    fn eq(&self, other: &Self) -> bool {
        *self.n == *other.n && *self.p == *other.p
    }
}

impl LootNumber for Binomial {
    fn get_int(&self, ctx: &mut LootContext) -> i64 {
        let trials = self.n.get_int(ctx).min(Self::MAX_TRIALS);
        let chance = self.p.get_double(ctx);
        let random = ctx.random();
        (0..trials).map(|_| i64::from(random.r#gen::<f64>() < chance)).sum()
    }

    #[allow(clippy::cast_precision_loss)]
    fn get_double(&self, ctx: &mut LootContext) -> f64 {
        self.get_int(ctx) as f64
    }
}

// =============================================================================
// Converters
// =============================================================================

/// Converter for [`Constant`] in its tagged form.
#[must_use]
pub fn constant_converter() -> FnConverter<dyn LootNumber, Constant> {
    converter(
        |constant, node, _| node.set("value", Node::from_number(constant.value)),
        |node, _| Ok(Constant::new(node.require_number("value")?)),
    )
}

/// Converter for [`Uniform`]; bounds go through the number registry.
#[must_use]
pub fn uniform_converter() -> FnConverter<dyn LootNumber, Uniform> {
    converter(
        |uniform, node, ctx| {
            let numbers = loader(ctx)?.numbers();
            numbers.serialize_at(uniform.min.as_ref(), node, "min", ctx)?;
            numbers.serialize_at(uniform.max.as_ref(), node, "max", ctx)
        },
        |node, ctx| {
            let numbers = loader(ctx)?.numbers();
            Ok(Uniform {
                min: numbers.deserialize_at(node, "min", ctx)?,
                max: numbers.deserialize_at(node, "max", ctx)?,
            })
        },
    )
}

/// Converter for [`Binomial`]; both parameters go through the number
/// registry.
#[must_use]
pub fn binomial_converter() -> FnConverter<dyn LootNumber, Binomial> {
    converter(
        |binomial, node, ctx| {
            let numbers = loader(ctx)?.numbers();
            numbers.serialize_at(binomial.n.as_ref(), node, "n", ctx)?;
            numbers.serialize_at(binomial.p.as_ref(), node, "p", ctx)
        },
        |node, ctx| {
            let numbers = loader(ctx)?.numbers();
            Ok(Binomial {
                n: numbers.deserialize_at(node, "n", ctx)?,
                p: numbers.deserialize_at(node, "p", ctx)?,
            })
        },
    )
}

/// Reads bare numbers as constants and writes constants as bare numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BareConstant;

impl ConditionalConverter<dyn LootNumber> for BareConstant {
    fn can_serialize(&self, value: &dyn LootNumber, _: &Context) -> bool {
        value.as_any().is::<Constant>()
    }

    fn serialize(&self, value: &dyn LootNumber, node: &mut Node, _: &Context) -> Result<()> {
        let constant = value
            .as_any()
            .downcast_ref::<Constant>()
            .ok_or_else(|| Error::invalid_value(format!("{} is not a constant", value.variant_type())))?;
        node.set(NodePath::root(), Node::from_number(constant.value))
    }

    fn can_deserialize(&self, node: &Node, _: &Context) -> bool {
        node.as_number().is_some()
    }

    fn deserialize(&self, node: &Node, _: &Context) -> Result<Arc<dyn LootNumber>> {
        let value = node
            .as_number()
            .ok_or_else(|| Error::invalid_node(NodePath::root(), "number", node.kind()))?;
        Ok(Arc::new(Constant::new(value)))
    }
}

/// Returns a builder preloaded with the standard numbers.
///
/// Add more variants to it before building to extend the family.
#[must_use]
pub fn standard_numbers() -> RegistryBuilder<dyn LootNumber> {
    let mut builder = ConversionRegistry::builder();
    builder
        .set_base_type(TypeToken::of::<dyn LootNumber>())
        .set_key_location(KEY_LOCATION)
        .add_conditional(BareConstant)
        .add_keyed(Constant::KEY, constant_converter())
        .add_keyed(Uniform::KEY, uniform_converter())
        .add_keyed(Binomial::KEY, binomial_converter());
    builder
}
