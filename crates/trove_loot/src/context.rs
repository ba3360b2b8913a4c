//! Generation-time state for loot numbers and conditions.

use std::any::Any;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trove_foundation::{Context, ContextKey};

/// Name of the player credited with the kill, if any.
pub const KILLER_PLAYER: ContextKey<String> = ContextKey::new("minecraft:killer_player");

/// Radius of the explosion that destroyed the source, if any.
pub const EXPLOSION_RADIUS: ContextKey<f32> = ContextKey::new("minecraft:explosion_radius");

/// The state a loot number or condition is evaluated against.
///
/// Randomness is deterministic: two contexts created from the same seed and
/// parameters produce the same results.
#[derive(Clone, Debug)]
pub struct LootContext {
    random: ChaCha8Rng,
    parameters: Context,
}

impl LootContext {
    /// Creates a context seeded with `seed` and no parameters.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            random: ChaCha8Rng::seed_from_u64(seed),
            parameters: Context::new(),
        }
    }

    /// Builder method to add a parameter.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, key: ContextKey<T>, value: T) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Returns the random source.
    pub fn random(&mut self) -> &mut ChaCha8Rng {
        &mut self.random
    }

    /// Returns the parameters.
    #[must_use]
    pub fn parameters(&self) -> &Context {
        &self.parameters
    }

    /// Gets a parameter.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, key: ContextKey<T>) -> Option<&T> {
        self.parameters.get(key)
    }

    /// Returns true if the parameter is present.
    #[must_use]
    pub fn has<T: Any + Send + Sync>(&self, key: ContextKey<T>) -> bool {
        self.parameters.has(key)
    }
}
