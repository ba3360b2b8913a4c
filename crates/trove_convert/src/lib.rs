//! Converter contracts and polymorphic conversion registries for Trove.
//!
//! This crate provides:
//! - [`TypedConverter`], [`ConditionalConverter`], [`KeyedConverter`] - The
//!   converter contracts
//! - [`RegistryBuilder`] - Validated registry construction
//! - [`ConversionRegistry`] - Two-phase dispatch over a family of variants
//! - [`FnConverter`] - Converters from plain functions over one variant

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod converter;
pub mod registry;

pub use builder::RegistryBuilder;
pub use converter::{
    ConditionalConverter, DeserializeFn, FnConverter, Keyed, KeyedConverter, SerializeFn,
    TypedConverter, TypedConverterExt, converter,
};
pub use registry::ConversionRegistry;
