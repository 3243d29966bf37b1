//! Virtual objects: flat properties presented as a nested document.
//!
//! A declaration with path `[p0, p1, .., pn]` installs one [`Getter`] and one
//! [`Setter`] under `p0`. The reader produces `{p1: {.. {pn: {members}}}}`, the
//! writer descends the same path and dispatches the leaf entries to the member
//! setters. Declarations sharing `p0` are merged through composites.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::access::{Reader, Writer};
use crate::error::AccessError;
use crate::info::{CustomAttributes, Type, TypeInfo, Typed};
use crate::mapping::{Getter, Setter};
use crate::value::{TypedArray, Value, ValueMap};

#[inline]
fn document_type() -> &'static TypeInfo {
    ValueMap::type_info()
}

fn dotted(path: &[&str]) -> String {
    path.join(".")
}

// -----------------------------------------------------------------------------
// VirtualReader

/// Builds the nested document of one declaration.
pub(crate) struct VirtualReader {
    path: &'static [&'static str],
    getters: IndexMap<&'static str, Getter>,
    version: Option<u32>,
}

impl VirtualReader {
    pub(crate) fn new(
        path: &'static [&'static str],
        getters: IndexMap<&'static str, Getter>,
        version: Option<u32>,
    ) -> Self {
        Self {
            path,
            getters,
            version,
        }
    }
}

impl Reader for VirtualReader {
    fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let mut leaf = ValueMap::with_capacity(self.getters.len());
        for (&name, getter) in &self.getters {
            if !getter.is_visible_at(self.version) {
                continue;
            }
            let value = getter.read_converted(instance)?;
            if !value.is_null() {
                leaf.insert(name.into(), value);
            }
        }

        // Intermediate levels are always present, even around an empty leaf.
        let document = self.path[1..].iter().rev().fold(leaf, |inner, &segment| {
            let mut outer = ValueMap::with_capacity(1);
            outer.insert(segment.into(), Value::Map(inner));
            outer
        });
        Ok(Value::Map(document))
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        document_type()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }
}

// -----------------------------------------------------------------------------
// VirtualWriter

struct Member {
    setter: Setter,
    /// Component of an array typed setter.
    component: Option<Type>,
}

/// Unwraps the nested document of one declaration into its member setters.
pub(crate) struct VirtualWriter {
    path: &'static [&'static str],
    members: IndexMap<&'static str, Member>,
    version: Option<u32>,
}

impl VirtualWriter {
    pub(crate) fn new(
        path: &'static [&'static str],
        setters: IndexMap<&'static str, Setter>,
        version: Option<u32>,
    ) -> Self {
        let members = setters
            .into_iter()
            .map(|(name, setter)| {
                let component = setter
                    .is_array()
                    .then(|| setter.param_type().erased().as_array())
                    .flatten()
                    .map(|array| *array.item_ty());
                (name, Member { setter, component })
            })
            .collect();
        Self {
            path,
            members,
            version,
        }
    }

    /// Descends `p1..pn`. `None` means the branch is absent.
    fn leaf(&self, value: Value) -> Result<Option<ValueMap>, AccessError> {
        let mut nested = match value {
            Value::Null => return Ok(None),
            Value::Map(map) => map,
            other => {
                return Err(AccessError::NotAMap {
                    key: dotted(&self.path[..1]),
                    found: other.kind(),
                });
            }
        };
        for (depth, &segment) in self.path.iter().enumerate().skip(1) {
            nested = match nested.swap_remove(segment) {
                None | Some(Value::Null) => return Ok(None),
                Some(Value::Map(map)) => map,
                Some(other) => {
                    return Err(AccessError::NotAMap {
                        key: dotted(&self.path[..=depth]),
                        found: other.kind(),
                    });
                }
            };
        }
        Ok(Some(nested))
    }
}

impl Writer for VirtualWriter {
    fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let Some(mut leaf) = self.leaf(value)? else {
            return Ok(());
        };

        for (&name, member) in &self.members {
            if !member.setter.is_visible_at(self.version) {
                continue;
            }
            let Some(raw) = leaf.swap_remove(name) else {
                continue;
            };
            let value = member.setter.convert(raw)?;
            let value = match (member.component, value) {
                (_, Value::Null) => continue,
                (Some(component), Value::Seq(items)) => {
                    Value::Array(TypedArray::new(component, items))
                }
                (_, value) => value,
            };
            member.setter.writer().write(instance, value)?;
        }
        Ok(())
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        document_type()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }
}

// -----------------------------------------------------------------------------
// CompositeReader

/// Merges the documents of several readers installed under one key.
pub(crate) struct CompositeReader {
    key: &'static str,
    delegates: Vec<Arc<dyn Reader>>,
}

impl CompositeReader {
    /// Nested composites are flattened.
    pub(crate) fn new(key: &'static str, readers: [Arc<dyn Reader>; 2]) -> Self {
        let mut delegates = Vec::new();
        for reader in readers {
            if let Some(nested) = reader.delegates() {
                delegates.extend(nested.iter().cloned());
                continue;
            }
            delegates.push(reader);
        }
        Self { key, delegates }
    }
}

/// Deep merges `source` into `target`.
///
/// Maps meeting maps are merged recursively, any other collision is ambiguous.
fn merge(target: &mut ValueMap, source: ValueMap, prefix: &str) -> Result<(), AccessError> {
    for (key, value) in source {
        if value.is_null() {
            continue;
        }
        match target.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                let path = format!("{prefix}.{}", entry.key());
                let existing = entry.get_mut();
                if existing.is_null() {
                    *existing = value;
                    continue;
                }
                match (existing, value) {
                    (Value::Map(existing), Value::Map(incoming)) => {
                        merge(existing, incoming, &path)?;
                    }
                    _ => return Err(AccessError::AmbiguousVirtualKey { key: path }),
                }
            }
        }
    }
    Ok(())
}

impl Reader for CompositeReader {
    fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let mut document = ValueMap::new();
        for reader in &self.delegates {
            match reader.read(instance)? {
                Value::Null => {}
                Value::Map(map) => merge(&mut document, map, self.key)?,
                other => {
                    return Err(AccessError::NotAMap {
                        key: self.key.into(),
                        found: other.kind(),
                    });
                }
            }
        }
        Ok(Value::Map(document))
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        document_type()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }

    #[inline]
    fn delegates(&self) -> Option<&[Arc<dyn Reader>]> {
        Some(&self.delegates)
    }
}

// -----------------------------------------------------------------------------
// CompositeWriter

/// Hands the same document to several writers, in declaration order.
pub(crate) struct CompositeWriter {
    delegates: Vec<Arc<dyn Writer>>,
}

impl CompositeWriter {
    /// Nested composites are flattened.
    pub(crate) fn new(writers: [Arc<dyn Writer>; 2]) -> Self {
        let mut delegates = Vec::new();
        for writer in writers {
            if let Some(nested) = writer.delegates() {
                delegates.extend(nested.iter().cloned());
                continue;
            }
            delegates.push(writer);
        }
        Self { delegates }
    }
}

impl Writer for CompositeWriter {
    fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        if let Some((last, rest)) = self.delegates.split_last() {
            for writer in rest {
                writer.write(instance, value.clone())?;
            }
            last.write(instance, value)?;
        }
        Ok(())
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        document_type()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }

    #[inline]
    fn delegates(&self) -> Option<&[Arc<dyn Writer>]> {
        Some(&self.delegates)
    }
}

// -----------------------------------------------------------------------------
// Literal adapters

/// A literal property folded under a virtual key.
///
/// Masked and converted like the top level getter it replaces.
pub(crate) struct LiteralReader {
    getter: Getter,
    version: Option<u32>,
}

impl LiteralReader {
    pub(crate) fn new(getter: Getter, version: Option<u32>) -> Self {
        Self { getter, version }
    }
}

impl Reader for LiteralReader {
    fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        if !self.getter.is_visible_at(self.version) {
            return Ok(Value::Null);
        }
        self.getter.read_converted(instance)
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        self.getter.reader().static_type()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        self.getter.reader().attributes()
    }
}

/// The write side of [`LiteralReader`].
pub(crate) struct LiteralWriter {
    setter: Setter,
    version: Option<u32>,
}

impl LiteralWriter {
    pub(crate) fn new(setter: Setter, version: Option<u32>) -> Self {
        Self { setter, version }
    }
}

impl Writer for LiteralWriter {
    fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        if !self.setter.is_visible_at(self.version) {
            return Ok(());
        }
        let value = self.setter.convert(value)?;
        self.setter.writer().write(instance, value)
    }

    #[inline]
    fn static_type(&self) -> &'static TypeInfo {
        self.setter.param_type()
    }

    #[inline]
    fn attributes(&self) -> &CustomAttributes {
        self.setter.writer().attributes()
    }
}

// -----------------------------------------------------------------------------
// Installation

/// Installs `reader` under `key`, merging with the getter already there.
pub(crate) fn install_getter(
    getters: &mut IndexMap<&'static str, Getter>,
    key: &'static str,
    reader: Arc<dyn Reader>,
) {
    let reader = match getters.get(key) {
        Some(existing) => Arc::new(CompositeReader::new(key, [existing.reader().clone(), reader])),
        None => reader,
    };
    getters.insert(key, Getter::nested(reader));
}

/// Installs `writer` under `key`, merging with the setter already there.
pub(crate) fn install_setter(
    setters: &mut IndexMap<&'static str, Setter>,
    key: &'static str,
    writer: Arc<dyn Writer>,
) {
    let writer = match setters.get(key) {
        Some(existing) => Arc::new(CompositeWriter::new([existing.writer().clone(), writer])),
        None => writer,
    };
    setters.insert(key, Setter::nested(writer));
}

// -----------------------------------------------------------------------------
// Tests
