use alloc::sync::Arc;
use core::any::Any;

use crate::access::{AccessMode, Reader, ReaderMap, Writer, WriterMap};
use crate::error::AccessError;
use crate::info::{Accessor, CustomAttributes, NamedField, StructInfo, TypeInfo};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Field capabilities

/// Reads a [`NamedField`].
#[derive(Debug, Clone, Copy)]
pub struct FieldReader(pub &'static NamedField);

impl Reader for FieldReader {
    #[inline]
    fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        self.0.read(instance)
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        self.0.type_info()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        self.0.attributes()
    }
}

/// Writes a [`NamedField`].
#[derive(Debug, Clone, Copy)]
pub struct FieldWriter(pub &'static NamedField);

impl Writer for FieldWriter {
    #[inline]
    fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        self.0.write(instance, value)
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        self.0.type_info()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        self.0.attributes()
    }
}

// -----------------------------------------------------------------------------
// Accessor capabilities

/// Calls the getter of an [`Accessor`].
#[derive(Debug, Clone, Copy)]
pub struct AccessorReader(pub &'static Accessor);

impl Reader for AccessorReader {
    #[inline]
    fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        self.0.read(instance)
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        self.0.type_info()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        self.0.attributes()
    }
}

/// Calls the setter of an [`Accessor`].
#[derive(Debug, Clone, Copy)]
pub struct AccessorWriter(pub &'static Accessor);

impl Writer for AccessorWriter {
    #[inline]
    fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        self.0.write(instance, value)
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        self.0.type_info()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        self.0.attributes()
    }
}

// -----------------------------------------------------------------------------
// Access modes

/// Discovers properties through the named fields of a struct.
///
/// Read-only fields have no writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAccess;

impl AccessMode for FieldAccess {
    fn find_readers(&self, info: &'static StructInfo) -> ReaderMap {
        info.fields()
            .iter()
            .filter(|field| field.is_readable())
            .map(|field| (field.name(), Arc::new(FieldReader(field)) as Arc<dyn Reader>))
            .collect()
    }

    fn find_writers(&self, info: &'static StructInfo) -> WriterMap {
        info.fields()
            .iter()
            .filter(|field| field.is_writable())
            .map(|field| (field.name(), Arc::new(FieldWriter(field)) as Arc<dyn Writer>))
            .collect()
    }
}

/// Discovers properties through the accessors of a struct.
///
/// When several accessors share a name, the last getter and the last setter win.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessorAccess;

impl AccessMode for AccessorAccess {
    fn find_readers(&self, info: &'static StructInfo) -> ReaderMap {
        info.accessors()
            .iter()
            .filter(|accessor| accessor.is_readable())
            .map(|accessor| {
                let reader: Arc<dyn Reader> = Arc::new(AccessorReader(accessor));
                (accessor.name(), reader)
            })
            .collect()
    }

    fn find_writers(&self, info: &'static StructInfo) -> WriterMap {
        info.accessors()
            .iter()
            .filter(|accessor| accessor.is_writable())
            .map(|accessor| {
                let writer: Arc<dyn Writer> = Arc::new(AccessorWriter(accessor));
                (accessor.name(), writer)
            })
            .collect()
    }
}

/// Fields first, then accessors, which replace fields of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAndAccessorAccess;

impl AccessMode for FieldAndAccessorAccess {
    fn find_readers(&self, info: &'static StructInfo) -> ReaderMap {
        let mut readers = FieldAccess.find_readers(info);
        readers.extend(AccessorAccess.find_readers(info));
        readers
    }

    fn find_writers(&self, info: &'static StructInfo) -> WriterMap {
        let mut writers = FieldAccess.find_writers(info);
        writers.extend(AccessorAccess.find_writers(info));
        writers
    }
}

// -----------------------------------------------------------------------------
// Tests
