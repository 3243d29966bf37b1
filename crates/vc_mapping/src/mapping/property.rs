use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::access::{Reader, Writer};
use crate::convert::Converter;
use crate::error::{AccessError, MappingError};
use crate::info::{CollectionTraits, CustomAttributes, Ignore, TypeInfo, TypeKind, WithConverter};
use crate::mapping::is_primitive;
use crate::value::Value;

/// Setter side name that is never mapped.
const META_CLASS: &str = "metaClass";

/// Returns `true` if a property tagged with `threshold` is visible at `active`.
#[inline]
pub(crate) const fn visible_at(threshold: Option<u32>, active: Option<u32>) -> bool {
    match (threshold, active) {
        (Some(threshold), Some(active)) => active < threshold,
        _ => true,
    }
}

fn find_converter(
    type_path: &'static str,
    property: &str,
    attributes: &CustomAttributes,
) -> Result<Option<Arc<dyn Converter>>, MappingError> {
    let Some(declared) = attributes.get::<WithConverter>() else {
        return Ok(None);
    };
    declared
        .instantiate()
        .map(Some)
        .map_err(|source| MappingError::Converter {
            type_path,
            target: Cow::Owned(property.into()),
            converter: declared.name(),
            source,
        })
}

/// Checks the declared type, then its nullable-erased form.
fn is_kind(info: &'static TypeInfo, kind: TypeKind) -> bool {
    info.kind() == kind || info.erased().kind() == kind
}

fn is_collection(info: &'static TypeInfo) -> bool {
    info.collection_traits().contains(CollectionTraits::COLLECTION)
        || info
            .erased()
            .collection_traits()
            .contains(CollectionTraits::COLLECTION)
}

// -----------------------------------------------------------------------------
// Getter

/// How the JSON layer reads one property.
#[derive(Clone)]
pub struct Getter {
    reader: Arc<dyn Reader>,
    is_primitive: bool,
    is_array: bool,
    is_collection: bool,
    is_map: bool,
    converter: Option<Arc<dyn Converter>>,
    visibility_version: Option<u32>,
}

impl Getter {
    /// Builds the getter of `name` declared on `type_path`.
    ///
    /// Returns `None` when the property is ignored without a version.
    pub fn build(
        type_path: &'static str,
        name: &str,
        reader: Arc<dyn Reader>,
    ) -> Result<Option<Self>, MappingError> {
        let ignore = reader.attributes().get::<Ignore>().copied();
        if matches!(ignore, Some(Ignore { min_version: None })) {
            return Ok(None);
        }

        let static_type = reader.static_type();
        let converter = find_converter(type_path, name, reader.attributes())?;
        Ok(Some(Self {
            is_primitive: is_primitive(static_type),
            is_array: is_kind(static_type, TypeKind::Array),
            is_collection: is_collection(static_type),
            is_map: converter.is_none() && is_kind(static_type, TypeKind::Map),
            converter,
            visibility_version: ignore.and_then(|ignore| ignore.min_version),
            reader,
        }))
    }

    /// A getter producing a nested document.
    pub(crate) fn nested(reader: Arc<dyn Reader>) -> Self {
        Self {
            reader,
            is_primitive: false,
            is_array: false,
            is_collection: false,
            is_map: true,
            converter: None,
            visibility_version: None,
        }
    }

    #[inline]
    pub fn reader(&self) -> &Arc<dyn Reader> {
        &self.reader
    }

    #[inline]
    pub const fn is_primitive(&self) -> bool {
        self.is_primitive
    }

    #[inline]
    pub const fn is_array(&self) -> bool {
        self.is_array
    }

    #[inline]
    pub const fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// Always `false` when a converter is attached.
    #[inline]
    pub const fn is_map(&self) -> bool {
        self.is_map
    }

    #[inline]
    pub fn converter(&self) -> Option<&Arc<dyn Converter>> {
        self.converter.as_ref()
    }

    /// The version from which the property is hidden, `None` if always visible.
    #[inline]
    pub const fn visibility_version(&self) -> Option<u32> {
        self.visibility_version
    }

    /// Returns `true` if the property is visible at the `active` schema version.
    #[inline]
    pub const fn is_visible_at(&self, active: Option<u32>) -> bool {
        visible_at(self.visibility_version, active)
    }

    /// Reads the property and applies the converter to non-null values.
    pub fn read_converted(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let value = self.reader.read(instance)?;
        match &self.converter {
            Some(converter) if !value.is_null() => Ok(converter.to_wire(value)?),
            _ => Ok(value),
        }
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("type", &self.reader.static_type().type_path())
            .field("primitive", &self.is_primitive)
            .field("array", &self.is_array)
            .field("collection", &self.is_collection)
            .field("map", &self.is_map)
            .field("converter", &self.converter.is_some())
            .field("visibility_version", &self.visibility_version)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Setter

/// How the JSON layer writes one property.
#[derive(Clone)]
pub struct Setter {
    writer: Arc<dyn Writer>,
    is_primitive: bool,
    is_array: bool,
    param_type: &'static TypeInfo,
    converter: Option<Arc<dyn Converter>>,
    visibility_version: Option<u32>,
}

impl Setter {
    /// Builds the setter of `name` declared on `type_path`.
    ///
    /// Returns `None` when the property is ignored without a version, or is `metaClass`.
    pub fn build(
        type_path: &'static str,
        name: &str,
        writer: Arc<dyn Writer>,
    ) -> Result<Option<Self>, MappingError> {
        let ignore = writer.attributes().get::<Ignore>().copied();
        if matches!(ignore, Some(Ignore { min_version: None })) || name == META_CLASS {
            return Ok(None);
        }

        let param_type = writer.static_type();
        let converter = find_converter(type_path, name, writer.attributes())?;
        Ok(Some(Self {
            is_primitive: is_primitive(param_type),
            is_array: is_kind(param_type, TypeKind::Array),
            param_type,
            converter,
            visibility_version: ignore.and_then(|ignore| ignore.min_version),
            writer,
        }))
    }

    /// A setter consuming a nested document.
    pub(crate) fn nested(writer: Arc<dyn Writer>) -> Self {
        Self {
            param_type: writer.static_type(),
            writer,
            is_primitive: false,
            is_array: false,
            converter: None,
            visibility_version: None,
        }
    }

    #[inline]
    pub fn writer(&self) -> &Arc<dyn Writer> {
        &self.writer
    }

    #[inline]
    pub const fn is_primitive(&self) -> bool {
        self.is_primitive
    }

    #[inline]
    pub const fn is_array(&self) -> bool {
        self.is_array
    }

    /// The declared type of the property.
    #[inline]
    pub const fn param_type(&self) -> &'static TypeInfo {
        self.param_type
    }

    #[inline]
    pub fn converter(&self) -> Option<&Arc<dyn Converter>> {
        self.converter.as_ref()
    }

    #[inline]
    pub const fn visibility_version(&self) -> Option<u32> {
        self.visibility_version
    }

    #[inline]
    pub const fn is_visible_at(&self, active: Option<u32>) -> bool {
        visible_at(self.visibility_version, active)
    }

    /// Applies the converter to a non-null wire value.
    pub fn convert(&self, value: Value) -> Result<Value, AccessError> {
        match &self.converter {
            Some(converter) if !value.is_null() => Ok(converter.from_wire(value)?),
            _ => Ok(value),
        }
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("type", &self.param_type.type_path())
            .field("primitive", &self.is_primitive)
            .field("array", &self.is_array)
            .field("converter", &self.converter.is_some())
            .field("visibility_version", &self.visibility_version)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Getter, Setter, visible_at};
    use crate::access::{AccessMode, FieldAccess};
    use crate::error::MappingError;
    use crate::fixtures::{BrokenConverter, Profile, struct_info};
    use crate::value::Value;

    fn getter(name: &str) -> Option<Getter> {
        let info = struct_info::<Profile>();
        let reader = FieldAccess.find_readers(info)[name].clone();
        Getter::build(info.type_path(), name, reader).unwrap()
    }

    fn setter(name: &str) -> Option<Setter> {
        let info = struct_info::<Profile>();
        let writer = FieldAccess.find_writers(info)[name].clone();
        Setter::build(info.type_path(), name, writer).unwrap()
    }

    #[test]
    fn visibility_threshold() {
        assert!(visible_at(None, Some(7)));
        assert!(visible_at(Some(2), None));
        assert!(visible_at(Some(2), Some(1)));
        assert!(!visible_at(Some(2), Some(2)));
        assert!(!visible_at(Some(2), Some(3)));
    }

    #[test]
    fn structural_flags() {
        let name = getter("name").unwrap();
        assert!(name.is_primitive() && !name.is_array() && !name.is_map());

        let scores = getter("scores").unwrap();
        assert!(scores.is_array() && !scores.is_primitive() && !scores.is_collection());

        let tags = getter("tags").unwrap();
        assert!(tags.is_collection() && !tags.is_array());

        let history = getter("history").unwrap();
        assert!(history.is_collection(), "nullable collections are collections");

        let extras = getter("extras").unwrap();
        assert!(extras.is_map() && !extras.is_collection());

        let scores = setter("scores").unwrap();
        assert!(scores.is_array());
        assert!(scores.param_type().as_array().is_some());
    }

    #[test]
    fn converter_disables_map() {
        let labels = getter("labels").unwrap();
        assert!(labels.converter().is_some());
        assert!(!labels.is_map());

        let profile = Profile::sample();
        assert_eq!(
            labels.read_converted(&profile).unwrap(),
            Value::from("en=hello")
        );
    }

    #[test]
    fn ignore_markers() {
        assert!(getter("secret").is_none());
        assert!(setter("secret").is_none());

        let legacy = getter("legacy").unwrap();
        assert_eq!(legacy.visibility_version(), Some(2));
        assert!(legacy.is_visible_at(Some(1)));
        assert!(!legacy.is_visible_at(Some(2)));
        assert_eq!(setter("legacy").unwrap().visibility_version(), Some(2));
    }

    #[test]
    fn meta_class_is_setter_only() {
        assert!(getter("metaClass").is_some());
        assert!(setter("metaClass").is_none());
    }

    #[test]
    fn broken_converter_is_fatal() {
        let info = struct_info::<BrokenConverter>();
        let reader = FieldAccess.find_readers(info)["when"].clone();
        let err = Getter::build(info.type_path(), "when", reader).unwrap_err();
        assert!(matches!(err, MappingError::Converter { .. }));
    }
}
