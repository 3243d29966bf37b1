use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::access::{Reader, ReaderMap, Writer, WriterMap};
use crate::config::MappingConfig;
use crate::convert::Converter;
use crate::error::{AccessError, MappingError};
use crate::info::{ConstructorInfo, ConstructorProperties, Instance, StructInfo, Type};
use crate::info::{TypeInfo, VirtualObject, VirtualObjects, Visibility, WithConverter};
use crate::info::impl_type_fn;
use crate::mapping::virtual_object::{LiteralReader, LiteralWriter, VirtualReader, VirtualWriter};
use crate::mapping::virtual_object::{install_getter, install_setter};
use crate::mapping::{Getter, Setter};
use crate::utils::HashSet;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Constructor

/// The constructor selected for a mapped type.
#[derive(Clone)]
pub struct Constructor {
    info: &'static ConstructorInfo,
    parameters: Box<[&'static str]>,
    converters: Box<[Option<Arc<dyn Converter>>]>,
}

impl Constructor {
    fn new(
        type_path: &'static str,
        info: &'static ConstructorInfo,
    ) -> Result<Self, MappingError> {
        if info.param_count() == 0 {
            return Ok(Self {
                info,
                parameters: Box::new([]),
                converters: Box::new([]),
            });
        }

        let names = info
            .attributes()
            .get::<ConstructorProperties>()
            .map_or(&[][..], |properties| properties.0);
        if names.len() != info.param_count() {
            return Err(MappingError::ConstructorArity {
                type_path,
                expected: info.param_count(),
                found: names.len(),
            });
        }

        let converters = info
            .params()
            .iter()
            .zip(names)
            .map(|(param, &name)| match param.attributes().get::<WithConverter>() {
                None => Ok(None),
                Some(declared) => declared.instantiate().map(Some).map_err(|source| {
                    MappingError::Converter {
                        type_path,
                        target: Cow::Borrowed(name),
                        converter: declared.name(),
                        source,
                    }
                }),
            })
            .collect::<Result<Box<[_]>, _>>()?;

        Ok(Self {
            info,
            parameters: names.into(),
            converters,
        })
    }

    /// The declared constructor.
    #[inline]
    pub const fn info(&self) -> &'static ConstructorInfo {
        self.info
    }

    #[inline]
    pub fn has_arguments(&self) -> bool {
        self.info.param_count() > 0
    }

    /// The property names bound to the parameters, in parameter order.
    #[inline]
    pub fn parameters(&self) -> &[&'static str] {
        &self.parameters
    }

    /// The parameter types, aligned with [`parameters`](Self::parameters).
    pub fn parameter_types(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> {
        self.info.params().iter().map(|param| param.type_info())
    }

    /// The parameter converters, aligned with [`parameters`](Self::parameters).
    #[inline]
    pub fn parameter_converters(&self) -> &[Option<Arc<dyn Converter>>] {
        &self.converters
    }

    /// Converts the wire arguments and invokes the constructor.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Instance, AccessError> {
        if args.len() != self.converters.len() {
            return self.info.invoke(args);
        }
        let args = args
            .into_iter()
            .zip(&self.converters)
            .map(|(arg, converter)| match converter {
                Some(converter) if !arg.is_null() => Ok(converter.from_wire(arg)?),
                _ => Ok(arg),
            })
            .collect::<Result<Vec<_>, AccessError>>()?;
        self.info.invoke(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .field("visibility", &self.info.visibility())
            .finish()
    }
}

/// Picks the constructor of `info`.
///
/// Hidden constructors are only eligible with hidden constructor support.
/// A constructor naming its properties wins when constructor support is
/// enabled. Otherwise the first public zero-argument constructor, then the
/// `Default` factory, then the first hidden zero-argument constructor.
fn select_constructor(
    info: &'static StructInfo,
    config: &MappingConfig,
) -> Option<&'static ConstructorInfo> {
    let mut nullary: Option<&'static ConstructorInfo> = None;
    for constructor in info.constructors() {
        if constructor.visibility() == Visibility::Hidden && !config.support_hidden_constructors() {
            continue;
        }
        if constructor.param_count() == 0 {
            let replace = nullary.is_none_or(|current| {
                current.visibility() == Visibility::Hidden
                    && constructor.visibility() == Visibility::Public
            });
            if replace {
                nullary = Some(constructor);
            }
        } else if constructor.attributes().contains::<ConstructorProperties>() {
            if config.support_constructors() {
                return Some(constructor);
            }
            debug!(
                "skipping a {}-parameter constructor of `{}`: constructor support is disabled",
                constructor.param_count(),
                info.type_path(),
            );
        }
    }
    match nullary {
        Some(public) if public.visibility() == Visibility::Public => Some(public),
        hidden => info.default_constructor().or(hidden),
    }
}

// -----------------------------------------------------------------------------
// ClassMapping

/// The mapping descriptor of one struct.
///
/// Immutable once built, shared through the [`Mappings`](crate::Mappings) cache.
#[derive(Clone)]
pub struct ClassMapping {
    ty: Type,
    getters: IndexMap<&'static str, Getter>,
    setters: IndexMap<&'static str, Setter>,
    constructor: Option<Constructor>,
}

impl ClassMapping {
    impl_type_fn!(ty);

    /// Builds the mapping of `info`.
    pub fn build(info: &'static StructInfo, config: &MappingConfig) -> Result<Self, MappingError> {
        let type_path = info.type_path();
        let readers = config.access_mode().find_readers(info);
        let writers = config.access_mode().find_writers(info);

        let mut getters = IndexMap::new();
        let mut setters = IndexMap::new();
        let mut skipped: HashSet<&'static str> = HashSet::default();

        let declarations = info.attributes().get::<VirtualObjects>().map(|list| &list.0[..]);
        let single = info.attributes().get::<VirtualObject>();
        for declaration in declarations.into_iter().flatten().chain(single) {
            compose(
                type_path,
                declaration,
                config,
                (&readers, &writers),
                (&mut getters, &mut setters),
                &mut skipped,
            )?;
        }

        for (&name, reader) in &readers {
            if skipped.contains(name) {
                continue;
            }
            if let Some(getter) = Getter::build(type_path, name, reader.clone())? {
                getters.insert(name, getter);
            }
        }
        for (&name, writer) in &writers {
            if skipped.contains(name) {
                continue;
            }
            if let Some(setter) = Setter::build(type_path, name, writer.clone())? {
                setters.insert(name, setter);
            }
        }

        if let Some(compare) = config.field_ordering().comparator() {
            getters.sort_by(|a, _, b, _| compare(*a, *b));
            setters.sort_by(|a, _, b, _| compare(*a, *b));
        }

        let constructor = select_constructor(info, config)
            .map(|selected| Constructor::new(type_path, selected))
            .transpose()?;

        Ok(Self {
            ty: *info.ty(),
            getters,
            setters,
            constructor,
        })
    }

    /// Getters by property name.
    #[inline]
    pub fn getters(&self) -> &IndexMap<&'static str, Getter> {
        &self.getters
    }

    #[inline]
    pub fn getter(&self, name: &str) -> Option<&Getter> {
        self.getters.get(name)
    }

    /// Setters by property name.
    #[inline]
    pub fn setters(&self) -> &IndexMap<&'static str, Setter> {
        &self.setters
    }

    #[inline]
    pub fn setter(&self, name: &str) -> Option<&Setter> {
        self.setters.get(name)
    }

    /// The selected constructor, `None` if the type cannot be instantiated by the mapper.
    #[inline]
    pub const fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    #[inline]
    pub fn constructor_has_arguments(&self) -> bool {
        self.constructor.as_ref().is_some_and(Constructor::has_arguments)
    }

    /// The property names bound to the constructor parameters, empty without arguments.
    #[inline]
    pub fn constructor_parameters(&self) -> &[&'static str] {
        self.constructor.as_ref().map_or(&[], Constructor::parameters)
    }
}

impl fmt::Debug for ClassMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMapping")
            .field("ty", &self.ty)
            .field("getters", &self.getters)
            .field("setters", &self.setters)
            .field("constructor", &self.constructor)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Virtual objects

/// Runs one virtual object declaration.
///
/// Members are excluded from the top level. A literal property named like the
/// declaration's root key is merged into the installed composite.
fn compose(
    type_path: &'static str,
    declaration: &'static VirtualObject,
    config: &MappingConfig,
    (readers, writers): (&ReaderMap, &WriterMap),
    (getters, setters): (&mut IndexMap<&'static str, Getter>, &mut IndexMap<&'static str, Setter>),
    skipped: &mut HashSet<&'static str>,
) -> Result<(), MappingError> {
    let path = declaration.path();
    let Some(&key) = path.first() else {
        return Err(MappingError::EmptyVirtualPath { type_path });
    };

    skipped.extend(declaration.fields().iter().map(|field| field.name));

    let mut member_getters = IndexMap::new();
    let mut member_setters = IndexMap::new();
    for field in declaration.fields() {
        if field.read
            && let Some(reader) = readers.get(field.name)
            && let Some(getter) = Getter::build(type_path, field.name, reader.clone())?
        {
            member_getters.insert(field.name, getter);
        }
        if field.write
            && let Some(writer) = writers.get(field.name)
            && let Some(setter) = Setter::build(type_path, field.name, writer.clone())?
        {
            member_setters.insert(field.name, setter);
        }
    }
    if let Some(compare) = config.field_ordering().comparator() {
        member_getters.sort_by(|a, _, b, _| compare(*a, *b));
        member_setters.sort_by(|a, _, b, _| compare(*a, *b));
    }

    if skipped.insert(key) {
        fold_literal(type_path, key, config.version(), (readers, writers), (getters, setters))?;
    }

    let reader: Arc<dyn Reader> = Arc::new(VirtualReader::new(path, member_getters, config.version()));
    let writer: Arc<dyn Writer> = Arc::new(VirtualWriter::new(path, member_setters, config.version()));
    install_getter(getters, key, reader);
    install_setter(setters, key, writer);
    Ok(())
}

/// Installs the literal property `key`, if any, so later virtual readers merge with it.
///
/// The literal keeps its visibility version and converter inside the composite.
fn fold_literal(
    type_path: &'static str,
    key: &'static str,
    version: Option<u32>,
    (readers, writers): (&ReaderMap, &WriterMap),
    (getters, setters): (&mut IndexMap<&'static str, Getter>, &mut IndexMap<&'static str, Setter>),
) -> Result<(), MappingError> {
    if let Some(reader) = readers.get(key)
        && let Some(getter) = Getter::build(type_path, key, reader.clone())?
    {
        let reader: Arc<dyn Reader> = Arc::new(LiteralReader::new(getter, version));
        getters.insert(key, Getter::nested(reader));
    }
    if let Some(writer) = writers.get(key)
        && let Some(setter) = Setter::build(type_path, key, writer.clone())?
    {
        let writer: Arc<dyn Writer> = Arc::new(LiteralWriter::new(setter, version));
        setters.insert(key, Setter::nested(writer));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ClassMapping;
    use crate::config::{FieldOrdering, MappingConfig};
    use crate::error::MappingError;
    use crate::fixtures::{Backdoor, BadArity, BrokenParam, Guarded, Hidden, NoPath, Place};
    use crate::fixtures::{Point, Sealed, Shy, struct_info};
    use crate::info::{Typed, Visibility};
    use crate::value::Value;

    fn build<T: Typed>(config: &MappingConfig) -> Result<ClassMapping, MappingError> {
        ClassMapping::build(struct_info::<T>(), config)
    }

    #[test]
    fn named_constructor_beats_nullary() {
        let config = MappingConfig::new().with_support_constructors(true);
        let mapping = build::<Point>(&config).unwrap();
        assert!(mapping.constructor_has_arguments());
        assert_eq!(mapping.constructor_parameters(), ["x", "y"]);

        let constructor = mapping.constructor().unwrap();
        assert_eq!(constructor.parameter_types().len(), 2);
        assert_eq!(constructor.parameter_converters().len(), 2);

        let point = constructor
            .invoke(vec![Value::Float(1.0), Value::Float(2.0)])
            .unwrap();
        assert_eq!(*point.downcast::<Point>().unwrap(), Point { x: 1.0, y: 2.0 });
    }

    #[test]
    fn named_constructor_needs_support() {
        let mapping = build::<Point>(&MappingConfig::new()).unwrap();
        let constructor = mapping.constructor().unwrap();
        assert!(!constructor.has_arguments());
        assert!(mapping.constructor_parameters().is_empty());
    }

    #[test]
    fn parameter_converters_apply() {
        let config = MappingConfig::new().with_support_constructors(true);
        let mapping = build::<Sealed>(&config).unwrap();
        let constructor = mapping.constructor().unwrap();
        assert!(constructor.parameter_converters()[0].is_some());

        let sealed = constructor.invoke(vec![Value::from("42")]).unwrap();
        assert_eq!(sealed.downcast::<Sealed>().unwrap().code(), 42);
    }

    #[test]
    fn hidden_only_state_has_no_constructor() {
        let mapping = build::<Hidden>(&MappingConfig::new()).unwrap();
        assert!(mapping.constructor().is_none());
        assert!(mapping.getter("secret").is_some());
        assert!(mapping.setter("secret").is_some());

        let config = MappingConfig::new().with_support_hidden_constructors(true);
        let mapping = build::<Hidden>(&config).unwrap();
        let instance = mapping.constructor().unwrap().invoke(vec![]).unwrap();
        assert!(instance.downcast_ref::<Hidden>().is_some());
    }

    #[test]
    fn first_public_nullary_beats_hidden() {
        for hidden in [false, true] {
            let config = MappingConfig::new().with_support_hidden_constructors(hidden);
            let mapping = build::<Shy>(&config).unwrap();
            let shy = mapping.constructor().unwrap().invoke(vec![]).unwrap();
            assert_eq!(shy.downcast::<Shy>().unwrap().origin, "first");
        }
    }

    #[test]
    fn default_factory_beats_hidden() {
        let config = MappingConfig::new().with_support_hidden_constructors(true);
        let mapping = build::<Backdoor>(&config).unwrap();
        let constructor = mapping.constructor().unwrap();
        assert_eq!(constructor.info().visibility(), Visibility::Public);

        let backdoor = constructor.invoke(vec![]).unwrap();
        assert_eq!(backdoor.downcast::<Backdoor>().unwrap().origin, "");
    }

    #[test]
    fn hidden_named_constructor_needs_hidden_support() {
        let config = MappingConfig::new().with_support_constructors(true);
        let mapping = build::<Guarded>(&config).unwrap();
        assert!(!mapping.constructor_has_arguments());

        let config = config.with_support_hidden_constructors(true);
        let mapping = build::<Guarded>(&config).unwrap();
        assert_eq!(mapping.constructor_parameters(), ["code"]);
        let guarded = mapping
            .constructor()
            .unwrap()
            .invoke(vec![Value::Int(4)])
            .unwrap();
        assert_eq!(guarded.downcast::<Guarded>().unwrap().code, 4);
    }

    #[test]
    fn broken_parameter_converter_is_fatal() {
        let mapping = build::<BrokenParam>(&MappingConfig::new()).unwrap();
        assert!(mapping.constructor().is_none());

        let config = MappingConfig::new().with_support_constructors(true);
        let err = build::<BrokenParam>(&config).unwrap_err();
        assert!(matches!(
            err,
            MappingError::Converter { ref target, converter: "Clock", .. } if target == "when"
        ));
    }

    #[test]
    fn default_factory_is_the_fallback() {
        let mapping = build::<Place>(&MappingConfig::new()).unwrap();
        let instance = mapping.constructor().unwrap().invoke(vec![]).unwrap();
        assert!(instance.downcast_ref::<Place>().is_some());
    }

    #[test]
    fn configuration_errors() {
        let err = build::<NoPath>(&MappingConfig::new()).unwrap_err();
        assert!(matches!(err, MappingError::EmptyVirtualPath { .. }));

        let config = MappingConfig::new().with_support_constructors(true);
        let err = build::<BadArity>(&config).unwrap_err();
        assert!(matches!(
            err,
            MappingError::ConstructorArity {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn field_ordering() {
        let unordered = build::<Point>(&MappingConfig::new()).unwrap();
        assert_eq!(unordered.getters().keys().copied().collect::<Vec<_>>(), ["y", "x"]);

        let config = MappingConfig::new().with_field_ordering(FieldOrdering::Lexicographic);
        let sorted = build::<Point>(&config).unwrap();
        assert_eq!(sorted.getters().keys().copied().collect::<Vec<_>>(), ["x", "y"]);

        let config = MappingConfig::new().with_field_ordering(FieldOrdering::custom(|a, b| b.cmp(a)));
        let reversed = build::<Point>(&config).unwrap();
        assert_eq!(reversed.setters().keys().copied().collect::<Vec<_>>(), ["y", "x"]);
    }
}
