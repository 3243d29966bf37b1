//! Per-property read and write capabilities, and the strategies discovering them.
//!
//! ## Menu
//!
//! - [`Reader`] / [`Writer`]: read or write one property of an instance.
//! - [`AccessMode`]: enumerates the readers and writers of a struct.
//! - [`FieldAccess`], [`AccessorAccess`], [`FieldAndAccessorAccess`]: the built-in strategies.

// -----------------------------------------------------------------------------
// Modules

mod field;

// -----------------------------------------------------------------------------
// Exports

pub use field::{AccessorAccess, FieldAccess, FieldAndAccessorAccess};
pub use field::{AccessorReader, AccessorWriter, FieldReader, FieldWriter};

use alloc::sync::Arc;
use core::any::Any;

use indexmap::IndexMap;

use crate::error::AccessError;
use crate::info::{CustomAttributes, StructInfo, TypeInfo};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Capabilities

/// Reads one property out of an instance.
pub trait Reader: Send + Sync {
    fn read(&self, instance: &dyn Any) -> Result<Value, AccessError>;

    /// The declared type of the property.
    fn static_type(&self) -> &'static TypeInfo;

    /// The metadata declared on the property.
    fn attributes(&self) -> &CustomAttributes;

    /// The constituents of a composite reader.
    #[inline]
    fn delegates(&self) -> Option<&[Arc<dyn Reader>]> {
        None
    }
}

/// Writes one property into an instance.
pub trait Writer: Send + Sync {
    fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError>;

    /// The declared type of the property.
    fn static_type(&self) -> &'static TypeInfo;

    /// The metadata declared on the property.
    fn attributes(&self) -> &CustomAttributes;

    /// The constituents of a composite writer.
    #[inline]
    fn delegates(&self) -> Option<&[Arc<dyn Writer>]> {
        None
    }
}

/// Readers keyed by property name, in discovery order.
pub type ReaderMap = IndexMap<&'static str, Arc<dyn Reader>>;

/// Writers keyed by property name, in discovery order.
pub type WriterMap = IndexMap<&'static str, Arc<dyn Writer>>;

// -----------------------------------------------------------------------------
// AccessMode

/// The member discovery strategy of a registry.
///
/// An implementation must return one entry per property name.
pub trait AccessMode: Send + Sync + 'static {
    fn find_readers(&self, info: &'static StructInfo) -> ReaderMap;

    fn find_writers(&self, info: &'static StructInfo) -> WriterMap;
}
