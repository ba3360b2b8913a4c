//! The pair of registries loot documents are read with.

use std::fmt;
use std::sync::Arc;

use trove_convert::ConversionRegistry;
use trove_foundation::{Context, ContextKey, Node, Result};

use crate::condition::{LootCondition, standard_conditions};
use crate::number::{LootNumber, standard_numbers};

/// Where converters find the [`Loader`] in a conversion context.
pub const LOADER: ContextKey<Loader> = ContextKey::new("trove_loot:loader");

/// Returns the loader installed in `ctx`.
///
/// # Errors
///
/// Returns `MissingContext` if no loader is installed.
pub fn loader(ctx: &Context) -> Result<&Loader> {
    ctx.require(LOADER)
}

/// Holds the number and condition registries.
///
/// Converters for compound variants reach the sibling registries through
/// the loader installed in the conversion context, so nested fields are
/// dispatched polymorphically as well.
#[derive(Clone)]
pub struct Loader {
    numbers: Arc<ConversionRegistry<dyn LootNumber>>,
    conditions: Arc<ConversionRegistry<dyn LootCondition>>,
}

impl Loader {
    /// Creates a loader from built registries.
    #[must_use]
    pub fn new(
        numbers: ConversionRegistry<dyn LootNumber>,
        conditions: ConversionRegistry<dyn LootCondition>,
    ) -> Self {
        Self {
            numbers: Arc::new(numbers),
            conditions: Arc::new(conditions),
        }
    }

    /// Creates a loader with the standard numbers and conditions.
    ///
    /// # Errors
    ///
    /// Returns a build error if the standard registries are inconsistent.
    pub fn standard() -> Result<Self> {
        let loader = Self::new(standard_numbers().build()?, standard_conditions().build()?);
        tracing::debug!(
            numbers = loader.numbers.len(),
            conditions = loader.conditions.len(),
            "loaded standard loot registries"
        );
        Ok(loader)
    }

    /// Returns the number registry.
    #[must_use]
    pub fn numbers(&self) -> &ConversionRegistry<dyn LootNumber> {
        &self.numbers
    }

    /// Returns the condition registry.
    #[must_use]
    pub fn conditions(&self) -> &ConversionRegistry<dyn LootCondition> {
        &self.conditions
    }

    /// Returns a conversion context with this loader installed.
    #[must_use]
    pub fn context(&self) -> Context {
        Context::new().with(LOADER, self.clone())
    }

    /// Reads a loot number.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or field error.
    pub fn read_number(&self, node: &Node) -> Result<Arc<dyn LootNumber>> {
        self.numbers.deserialize(node, &self.context())
    }

    /// Writes a loot number to a fresh node.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or field error.
    pub fn write_number(&self, number: &dyn LootNumber) -> Result<Node> {
        let mut node = Node::Null;
        self.numbers.serialize(number, &mut node, &self.context())?;
        Ok(node)
    }

    /// Reads a loot condition.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or field error.
    pub fn read_condition(&self, node: &Node) -> Result<Arc<dyn LootCondition>> {
        self.conditions.deserialize(node, &self.context())
    }

    /// Writes a loot condition to a fresh node.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or field error.
    pub fn write_condition(&self, condition: &dyn LootCondition) -> Result<Node> {
        let mut node = Node::Null;
        self.conditions.serialize(condition, &mut node, &self.context())?;
        Ok(node)
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("numbers", &self.numbers.keys().collect::<Vec<_>>())
            .field("conditions", &self.conditions.keys().collect::<Vec<_>>())
            .finish()
    }
}
