//! Trove - Polymorphic conversion registries
//!
//! This crate re-exports all layers of the Trove system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: trove_loot        - Loot numbers and conditions built on registries
//! Layer 1: trove_convert     - Converter contracts, builder, registry
//! Layer 0: trove_foundation  - Core types (Node, NodePath, TypeToken, Context, Error)
//! ```

pub use trove_convert as convert;
pub use trove_foundation as foundation;
pub use trove_loot as loot;
