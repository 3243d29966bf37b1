//! Dynamic values exchanged between instances, converters and the JSON driver.
//!
//! ## Menu
//!
//! - [`Value`]: a dynamically typed property value.
//! - [`ValueMap`]: an ordered string keyed map, the shape of every nested document.
//! - [`TypedArray`]: a sequence materialized for a declared component type.
//! - [`ToValue`] / [`FromValue`]: conversions between Rust types and [`Value`].

// -----------------------------------------------------------------------------
// Modules

mod convert;

#[cfg(feature = "serde")]
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{FromValue, ToValue};

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use indexmap::IndexMap;

use crate::info::Type;

// -----------------------------------------------------------------------------
// ValueMap

/// Ordered map from key to [`Value`].
///
/// Insertion order is kept, so nested documents are produced in a stable shape.
pub type ValueMap = IndexMap<String, Value>;

// -----------------------------------------------------------------------------
// ValueKind

/// The kind of a [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Char,
    Int,
    Float,
    String,
    Seq,
    Array,
    Map,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Bool => f.pad("bool"),
            Self::Char => f.pad("char"),
            Self::Int => f.pad("int"),
            Self::Float => f.pad("float"),
            Self::String => f.pad("string"),
            Self::Seq => f.pad("sequence"),
            Self::Array => f.pad("array"),
            Self::Map => f.pad("map"),
            Self::Object => f.pad("object"),
        }
    }
}

// -----------------------------------------------------------------------------
// TypedArray

/// A sequence materialized for a declared array component type.
///
/// Decoders produce generic [`Value::Seq`]s. Properties declared as arrays
/// (e.g. `Box<[f64]>`) only accept a [`TypedArray`] whose component matches.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedArray {
    component: Type,
    items: Box<[Value]>,
}

impl TypedArray {
    #[inline]
    pub fn new(component: Type, items: impl Into<Box<[Value]>>) -> Self {
        Self {
            component,
            items: items.into(),
        }
    }

    /// Returns the component type.
    #[inline]
    pub const fn component(&self) -> &Type {
        &self.component
    }

    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn into_items(self) -> Box<[Value]> {
        self.items
    }
}

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value.
///
/// Integers of every width are carried as `i64`, floats as `f64`.
/// Nested domain objects that are not described by the mapper travel as
/// [`Value::Object`].
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Value>),
    Array(TypedArray),
    Map(ValueMap),
    Object(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wraps an arbitrary domain object.
    #[inline]
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Char(_) => ValueKind::Char,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Seq(_) => ValueKind::Seq,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
            Self::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the wrapped domain object, if it is a `T`.
    pub fn downcast_object<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Objects compare by identity, everything else structurally.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => fmt::Debug::fmt(v, f),
            Self::Char(v) => fmt::Debug::fmt(v, f),
            Self::Int(v) => fmt::Debug::fmt(v, f),
            Self::Float(v) => fmt::Debug::fmt(v, f),
            Self::String(v) => fmt::Debug::fmt(v, f),
            Self::Seq(v) => f.debug_list().entries(v).finish(),
            Self::Array(v) => f
                .debug_struct("Array")
                .field("component", &v.component().path())
                .field("items", &v.items())
                .finish(),
            Self::Map(v) => f.debug_map().entries(v).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl From<ValueMap> for Value {
    #[inline]
    fn from(value: ValueMap) -> Self {
        Self::Map(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::Seq(value)
    }
}

// -----------------------------------------------------------------------------
// Tests
