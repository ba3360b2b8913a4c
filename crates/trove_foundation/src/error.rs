//! Error types for conversion registries and the converters they delegate to.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::node::NodeKind;
use crate::path::NodePath;
use crate::types::TypeToken;

/// The main error type for Trove operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Appends a frame to this error's context, creating one if needed.
    ///
    /// The kind is left untouched.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a base type violation error.
    #[must_use]
    pub fn base_type_violation(key: impl Into<String>, converted: TypeToken, base: TypeToken) -> Self {
        Self::new(ErrorKind::BaseTypeViolation {
            key: key.into(),
            converted,
            base,
        })
    }

    /// Creates a duplicate key error.
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>, base: TypeToken) -> Self {
        Self::new(ErrorKind::DuplicateKey {
            key: key.into(),
            base,
        })
    }

    /// Creates a duplicate type error.
    #[must_use]
    pub fn duplicate_type(key: impl Into<String>, converted: TypeToken, existing: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateType {
            key: key.into(),
            converted,
            existing: existing.into(),
        })
    }

    /// Creates a missing configuration error.
    #[must_use]
    pub fn missing_configuration(setting: &'static str) -> Self {
        Self::new(ErrorKind::MissingConfiguration(setting))
    }

    /// Creates a duplicate configuration error.
    #[must_use]
    pub fn duplicate_configuration(setting: &'static str) -> Self {
        Self::new(ErrorKind::DuplicateConfiguration(setting))
    }

    /// Creates a no converter for type error.
    #[must_use]
    pub fn no_converter_for_type(actual: TypeToken, base: TypeToken) -> Self {
        Self::new(ErrorKind::NoConverterForType { actual, base })
    }

    /// Creates a missing discriminator error.
    #[must_use]
    pub fn missing_discriminator(path: NodePath, base: TypeToken) -> Self {
        Self::new(ErrorKind::MissingDiscriminator { path, base })
    }

    /// Creates an invalid discriminator error.
    #[must_use]
    pub fn invalid_discriminator(path: NodePath, found: NodeKind, base: TypeToken) -> Self {
        Self::new(ErrorKind::InvalidDiscriminator { path, found, base })
    }

    /// Creates an unknown discriminator value error.
    #[must_use]
    pub fn unknown_discriminator(path: NodePath, value: impl Into<String>, base: TypeToken) -> Self {
        Self::new(ErrorKind::UnknownDiscriminatorValue {
            path,
            value: value.into(),
            base,
        })
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(path: NodePath) -> Self {
        Self::new(ErrorKind::MissingField { path })
    }

    /// Creates an invalid node error.
    #[must_use]
    pub fn invalid_node(path: NodePath, expected: &'static str, actual: NodeKind) -> Self {
        Self::new(ErrorKind::InvalidNode {
            path,
            expected,
            actual,
        })
    }

    /// Creates a node shape error.
    #[must_use]
    pub fn node_shape(path: NodePath, found: NodeKind) -> Self {
        Self::new(ErrorKind::NodeShape { path, found })
    }

    /// Creates a missing context error.
    #[must_use]
    pub fn missing_context(name: &'static str) -> Self {
        Self::new(ErrorKind::MissingContext(name))
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A keyed converter handles a type outside the registry's family.
    #[error("converter for key '{key}' handles {converted}, which is not a subtype of {base}")]
    BaseTypeViolation {
        /// The key the converter was registered under.
        key: String,
        /// The type the converter handles.
        converted: TypeToken,
        /// The registry's base type.
        base: TypeToken,
    },

    /// Two keyed converters share a key.
    #[error("duplicate key '{key}' in registry for {base}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
        /// The registry's base type.
        base: TypeToken,
    },

    /// Two keyed converters handle the same exact type.
    #[error("converter for key '{key}' handles {converted}, already handled by key '{existing}'")]
    DuplicateType {
        /// The key of the later registration.
        key: String,
        /// The repeated type.
        converted: TypeToken,
        /// The key of the earlier registration.
        existing: String,
    },

    /// A required builder setting was never supplied.
    #[error("missing registry configuration: {0}")]
    MissingConfiguration(&'static str),

    /// A builder setting was supplied more than once.
    #[error("registry configuration set more than once: {0}")]
    DuplicateConfiguration(&'static str),

    /// No keyed converter handles the value's exact type.
    #[error("no converter for {actual} in registry for {base}")]
    NoConverterForType {
        /// The value's runtime type.
        actual: TypeToken,
        /// The registry's base type.
        base: TypeToken,
    },

    /// The discriminator is absent from the node.
    #[error("missing discriminator at '{path}' for {base}")]
    MissingDiscriminator {
        /// The discriminator location.
        path: NodePath,
        /// The registry's base type.
        base: TypeToken,
    },

    /// The discriminator is present but is not a string.
    #[error("discriminator at '{path}' for {base} must be a string, found {found}")]
    InvalidDiscriminator {
        /// The discriminator location.
        path: NodePath,
        /// What was found there instead.
        found: NodeKind,
        /// The registry's base type.
        base: TypeToken,
    },

    /// The discriminator names no registered converter.
    #[error("unknown discriminator '{value}' at '{path}' for {base}")]
    UnknownDiscriminatorValue {
        /// The discriminator location.
        path: NodePath,
        /// The unrecognized key.
        value: String,
        /// The registry's base type.
        base: TypeToken,
    },

    /// A required field is absent.
    #[error("missing field '{path}'")]
    MissingField {
        /// The field location.
        path: NodePath,
    },

    /// A field has the wrong kind.
    #[error("field '{path}' must be {expected}, found {actual}")]
    InvalidNode {
        /// The field location.
        path: NodePath,
        /// Description of the expected kind.
        expected: &'static str,
        /// The kind found.
        actual: NodeKind,
    },

    /// A write went through a node that cannot hold children of that kind.
    #[error("cannot write through {found} at '{path}'")]
    NodeShape {
        /// The location of the blocking node.
        path: NodePath,
        /// The kind of the blocking node.
        found: NodeKind,
    },

    /// A converter needed a context parameter that was not supplied.
    #[error("missing context parameter: {0}")]
    MissingContext(&'static str),

    /// A value is well-formed but semantically invalid.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ErrorKind {
    /// Returns true for errors raised while building a registry.
    #[must_use]
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::BaseTypeViolation { .. }
                | Self::DuplicateKey { .. }
                | Self::DuplicateType { .. }
                | Self::MissingConfiguration(_)
                | Self::DuplicateConfiguration(_)
        )
    }

    /// Returns true for errors raised by a registry while resolving a
    /// converter.
    #[must_use]
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::NoConverterForType { .. }
                | Self::MissingDiscriminator { .. }
                | Self::InvalidDiscriminator { .. }
                | Self::UnknownDiscriminatorValue { .. }
        )
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Document or source name.
    pub source: Option<String>,
    /// Location inside the document.
    pub path: Option<NodePath>,
    /// Frames added while the error propagated, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the document path.
    #[must_use]
    pub fn with_path(mut self, path: NodePath) -> Self {
        self.path = Some(path);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if self.path.is_some() {
                write!(f, " ")?;
            }
        }
        if let Some(path) = &self.path {
            write!(f, "at {path}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
