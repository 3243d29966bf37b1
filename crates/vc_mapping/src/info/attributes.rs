use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::convert::Converter;
use crate::error::ConvertError;
use crate::utils::TypeIdMap;

// -----------------------------------------------------------------------------
// CustomAttributes

/// A collection of attributes for a type, field, accessor, constructor or parameter.
///
/// Attributes are stored by their [`TypeId`],
/// so there can only be one attribute per type.
///
/// # Example
///
/// ```
/// # use vc_mapping::info::{CustomAttributes, Ignore};
/// let attrs = CustomAttributes::new().with_attribute(Ignore::until(2));
/// assert_eq!(attrs.get::<Ignore>().unwrap().min_version, Some(2));
/// assert!(!attrs.contains::<u32>());
/// ```
#[derive(Default)]
pub struct CustomAttributes {
    attributes: TypeIdMap<Box<dyn Any + Send + Sync>>,
}

static EMPTY: CustomAttributes = CustomAttributes::new();

impl CustomAttributes {
    /// Creates an empty [`CustomAttributes`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            attributes: TypeIdMap::new(),
        }
    }

    /// A static reference to an empty table, used by synthesized capabilities.
    #[inline]
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Adds an attribute, overwriting an earlier one of the same type.
    #[inline]
    pub fn with_attribute<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.attributes.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.attributes.contains(&TypeId::of::<T>())
    }

    /// Returns the attribute of type `T`, if present.
    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.attributes
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.len() == 0
    }
}

impl fmt::Debug for CustomAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAttributes")
            .field("len", &self.attributes.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Ignore

/// Excludes a property from mapping.
///
/// Without a `min_version` the property is dropped entirely. With one, the
/// property is kept but hidden once the active schema version reaches it:
/// the property existed up to, and not including, `min_version`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ignore {
    pub min_version: Option<u32>,
}

impl Ignore {
    /// Always ignored.
    pub const ALWAYS: Self = Self { min_version: None };

    /// Visible before `version`, hidden from `version` on.
    #[inline]
    pub const fn until(version: u32) -> Self {
        Self {
            min_version: Some(version),
        }
    }
}

// -----------------------------------------------------------------------------
// WithConverter

/// Declares the [`Converter`] of a property or constructor parameter.
///
/// The factory runs once, when the owning type is first mapped. A failing
/// factory is a configuration error of the whole type.
#[derive(Clone)]
pub struct WithConverter {
    name: &'static str,
    factory: fn() -> Result<Arc<dyn Converter>, ConvertError>,
}

fn default_factory<C: Converter + Default>() -> Result<Arc<dyn Converter>, ConvertError> {
    Ok(Arc::new(C::default()))
}

impl WithConverter {
    /// Uses `C::default()` as the converter.
    #[inline]
    pub fn of<C: Converter + Default>() -> Self {
        Self {
            name: core::any::type_name::<C>(),
            factory: default_factory::<C>,
        }
    }

    /// Uses a fallible factory.
    #[inline]
    pub const fn new(
        name: &'static str,
        factory: fn() -> Result<Arc<dyn Converter>, ConvertError>,
    ) -> Self {
        Self { name, factory }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Creates the converter.
    #[inline]
    pub fn instantiate(&self) -> Result<Arc<dyn Converter>, ConvertError> {
        (self.factory)()
    }
}

impl fmt::Debug for WithConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WithConverter").field(&self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// VirtualObject

/// A member of a [`VirtualObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualField {
    pub name: &'static str,
    pub read: bool,
    pub write: bool,
}

impl VirtualField {
    /// A member taking part in both reading and writing.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            read: true,
            write: true,
        }
    }

    #[inline]
    pub const fn read_only(name: &'static str) -> Self {
        Self {
            name,
            read: true,
            write: false,
        }
    }

    #[inline]
    pub const fn write_only(name: &'static str) -> Self {
        Self {
            name,
            read: false,
            write: true,
        }
    }
}

/// Folds flat properties into a nested document.
///
/// With path `["address", "geo"]` and members `lat` and `lon`, the type is
/// presented as `{"address": {"geo": {"lat": .., "lon": ..}}}` and `lat`/`lon`
/// no longer appear at the top level.
///
/// # Example
///
/// ```
/// # use vc_mapping::info::{VirtualField, VirtualObject};
/// let geo = VirtualObject::new(&["address", "geo"])
///     .with_field(VirtualField::new("lat"))
///     .with_field(VirtualField::new("lon"));
/// assert_eq!(geo.path(), ["address", "geo"]);
/// assert_eq!(geo.fields().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VirtualObject {
    path: &'static [&'static str],
    fields: Vec<VirtualField>,
}

impl VirtualObject {
    #[inline]
    pub const fn new(path: &'static [&'static str]) -> Self {
        Self {
            path,
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn with_field(mut self, field: VirtualField) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub const fn path(&self) -> &'static [&'static str] {
        self.path
    }

    #[inline]
    pub fn fields(&self) -> &[VirtualField] {
        &self.fields
    }
}

/// Several [`VirtualObject`]s on one type, processed in order.
#[derive(Debug, Clone, Default)]
pub struct VirtualObjects(pub Vec<VirtualObject>);

// -----------------------------------------------------------------------------
// ConstructorProperties

/// Names the properties a constructor takes, in parameter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorProperties(pub &'static [&'static str]);
