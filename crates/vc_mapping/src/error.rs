//! Error types.
//!
//! - [`MappingError`]: configuration errors detected while building a mapping.
//!   They abort the build of one type and are never cached.
//! - [`AccessError`]: failures raised while reading, writing or constructing instances.
//! - [`ValueError`]: a [`Value`](crate::value::Value) does not fit the requested Rust type.
//! - [`ConvertError`]: a converter failed, or could not be instantiated.

use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;

use crate::value::ValueKind;

// -----------------------------------------------------------------------------
// MappingError

/// A configuration error found while building a [`ClassMapping`](crate::ClassMapping).
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum MappingError {
    #[error("virtual object declared on `{type_path}` needs a path")]
    EmptyVirtualPath { type_path: &'static str },

    #[error("converter `{converter}` of `{type_path}` ({target}) cannot be instantiated: {source}")]
    Converter {
        type_path: &'static str,
        target: Cow<'static, str>,
        converter: &'static str,
        #[source]
        source: ConvertError,
    },

    #[error(
        "constructor of `{type_path}` takes {expected} parameters, but its constructor properties name {found}"
    )]
    ConstructorArity {
        type_path: &'static str,
        expected: usize,
        found: usize,
    },
}

// -----------------------------------------------------------------------------
// AccessError

/// A failure raised by a reader, writer or constructor.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum AccessError {
    #[error("expected an instance of `{expected}`")]
    InstanceMismatch { expected: &'static str },

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("{key} is ambiguous")]
    AmbiguousVirtualKey { key: String },

    #[error("`{key}` must hold a map, found {found}")]
    NotAMap { key: String, found: ValueKind },

    #[error("constructor of `{type_path}` takes {expected} arguments, received {found}")]
    ArgumentCount {
        type_path: &'static str,
        expected: usize,
        found: usize,
    },
}

// -----------------------------------------------------------------------------
// ValueError

/// A dynamic value cannot be converted to the requested type.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("{value} is out of range for `{target}`")]
    OutOfRange { value: i64, target: &'static str },

    #[error("{value} is out of range for `{target}`")]
    FloatOutOfRange { value: f64, target: &'static str },
}

// -----------------------------------------------------------------------------
// ConvertError

/// Error reported by a [`Converter`](crate::convert::Converter) or its factory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConvertError {
    message: Cow<'static, str>,
}

impl ConvertError {
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}
