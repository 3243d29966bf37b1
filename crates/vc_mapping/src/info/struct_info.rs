use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::{self, Vec};
use core::any::Any;
use core::fmt;

use crate::error::AccessError;
use crate::info::{CustomAttributes, Generics, Type, TypeInfo, Typed, impl_type_fn};
use crate::value::{FromValue, ToValue, Value};

// -----------------------------------------------------------------------------
// Capability aliases

/// A constructed, type-erased instance.
pub type Instance = Box<dyn Any + Send>;

type ReadFn = Arc<dyn Fn(&dyn Any) -> Result<Value, AccessError> + Send + Sync>;
type WriteFn = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), AccessError> + Send + Sync>;
type ConstructFn = Arc<dyn Fn(&mut ConstructorArgs) -> Result<Instance, AccessError> + Send + Sync>;

#[inline]
fn downcast<S: Any>(instance: &dyn Any) -> Result<&S, AccessError> {
    instance
        .downcast_ref::<S>()
        .ok_or(AccessError::InstanceMismatch {
            expected: core::any::type_name::<S>(),
        })
}

#[inline]
fn downcast_mut<S: Any>(instance: &mut dyn Any) -> Result<&mut S, AccessError> {
    instance
        .downcast_mut::<S>()
        .ok_or(AccessError::InstanceMismatch {
            expected: core::any::type_name::<S>(),
        })
}

// -----------------------------------------------------------------------------
// NamedField

/// A field of a struct, accessed directly.
///
/// # Example
///
/// ```
/// # use vc_mapping::info::NamedField;
/// # use vc_mapping::Value;
/// struct Point { x: f64 }
///
/// let field = NamedField::new::<Point, f64>("x", |p| &p.x, |p| &mut p.x);
/// let mut point = Point { x: 1.0 };
/// assert_eq!(field.read(&point).unwrap(), Value::Float(1.0));
/// field.write(&mut point, Value::Float(2.0)).unwrap();
/// assert_eq!(point.x, 2.0);
/// ```
#[derive(Clone)]
pub struct NamedField {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
    attributes: Arc<CustomAttributes>,
}

impl NamedField {
    /// A readable and writable field.
    pub fn new<S, F>(name: &'static str, get: fn(&S) -> &F, get_mut: fn(&mut S) -> &mut F) -> Self
    where
        S: Any,
        F: Typed + ToValue + FromValue,
    {
        Self {
            write: Some(Arc::new(move |instance: &mut dyn Any, value: Value| {
                *get_mut(downcast_mut::<S>(instance)?) = F::from_value(value)?;
                Ok(())
            })),
            ..Self::read_only(name, get)
        }
    }

    /// A field that can only be read, e.g. a `final` value.
    pub fn read_only<S, F>(name: &'static str, get: fn(&S) -> &F) -> Self
    where
        S: Any,
        F: Typed + ToValue,
    {
        Self {
            name,
            type_info: F::type_info,
            read: Some(Arc::new(move |instance: &dyn Any| {
                Ok(get(downcast::<S>(instance)?).to_value())
            })),
            write: None,
            attributes: Arc::new(CustomAttributes::new()),
        }
    }

    /// Replaces the attributes.
    #[inline]
    pub fn with_attributes(self, attributes: CustomAttributes) -> Self {
        Self {
            attributes: Arc::new(attributes),
            ..self
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Reads the field. Write-only fields yield [`Value::Null`].
    pub fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        match &self.read {
            Some(read) => read(instance),
            None => Ok(Value::Null),
        }
    }

    /// Writes the field. Writing a read-only field does nothing.
    pub fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        match &self.write {
            Some(write) => write(instance, value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for NamedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedField")
            .field("name", &self.name)
            .field("type", &self.type_info().type_path())
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Accessor

/// A property exposed through accessor methods instead of a field.
///
/// A getter and a setter with separate attributes are declared as two
/// accessors sharing one name.
#[derive(Clone)]
pub struct Accessor {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
    attributes: Arc<CustomAttributes>,
}

impl Accessor {
    /// A getter method, `fn(&S) -> F`.
    pub fn getter<S, F>(name: &'static str, get: fn(&S) -> F) -> Self
    where
        S: Any,
        F: Typed + ToValue,
    {
        Self {
            name,
            type_info: F::type_info,
            read: Some(Arc::new(move |instance: &dyn Any| {
                Ok(get(downcast::<S>(instance)?).to_value())
            })),
            write: None,
            attributes: Arc::new(CustomAttributes::new()),
        }
    }

    /// A setter method, `fn(&mut S, F)`.
    pub fn setter<S, F>(name: &'static str, set: fn(&mut S, F)) -> Self
    where
        S: Any,
        F: Typed + FromValue,
    {
        Self {
            name,
            type_info: F::type_info,
            read: None,
            write: Some(Arc::new(move |instance: &mut dyn Any, value: Value| {
                set(downcast_mut::<S>(instance)?, F::from_value(value)?);
                Ok(())
            })),
            attributes: Arc::new(CustomAttributes::new()),
        }
    }

    /// A getter and setter pair sharing attributes.
    pub fn property<S, F>(name: &'static str, get: fn(&S) -> F, set: fn(&mut S, F)) -> Self
    where
        S: Any,
        F: Typed + ToValue + FromValue,
    {
        Self {
            write: Self::setter(name, set).write,
            ..Self::getter(name, get)
        }
    }

    /// Replaces the attributes.
    #[inline]
    pub fn with_attributes(self, attributes: CustomAttributes) -> Self {
        Self {
            attributes: Arc::new(attributes),
            ..self
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Calls the getter. Setter-only accessors yield [`Value::Null`].
    pub fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        match &self.read {
            Some(read) => read(instance),
            None => Ok(Value::Null),
        }
    }

    /// Calls the setter. Getter-only accessors do nothing.
    pub fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        match &self.write {
            Some(write) => write(instance, value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("type", &self.type_info().type_path())
            .field("getter", &self.read.is_some())
            .field("setter", &self.write.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Constructors

/// Visibility of a constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    /// Usable by the mapper only when hidden constructors are supported.
    Hidden,
}

/// A constructor parameter.
#[derive(Clone)]
pub struct ParamInfo {
    type_info: fn() -> &'static TypeInfo,
    attributes: Arc<CustomAttributes>,
}

impl ParamInfo {
    #[inline]
    pub fn new<T: Typed>() -> Self {
        Self {
            type_info: T::type_info,
            attributes: Arc::new(CustomAttributes::new()),
        }
    }

    #[inline]
    pub fn with_attributes(self, attributes: CustomAttributes) -> Self {
        Self {
            attributes: Arc::new(attributes),
            ..self
        }
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }
}

impl fmt::Debug for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_info().type_path())
    }
}

/// Positional arguments handed to a constructor.
pub struct ConstructorArgs {
    values: vec::IntoIter<Value>,
}

impl ConstructorArgs {
    /// Takes the next argument as a `T`. Missing arguments read as [`Value::Null`].
    #[inline]
    pub fn next<T: FromValue>(&mut self) -> Result<T, AccessError> {
        Ok(T::from_value(self.values.next().unwrap_or_default())?)
    }
}

/// A declared constructor.
///
/// # Example
///
/// ```
/// # use vc_mapping::info::{ConstructorInfo, ConstructorProperties, CustomAttributes, ParamInfo};
/// # use vc_mapping::Value;
/// struct Point { x: f64, y: f64 }
///
/// let ctor = ConstructorInfo::new::<Point, _>(
///     [ParamInfo::new::<f64>(), ParamInfo::new::<f64>()],
///     |args| Ok(Point { x: args.next()?, y: args.next()? }),
/// )
/// .with_attributes(CustomAttributes::new().with_attribute(ConstructorProperties(&["x", "y"])));
///
/// let point = ctor.invoke(vec![Value::Float(1.0), Value::Float(2.0)]).unwrap();
/// assert_eq!(point.downcast_ref::<Point>().unwrap().y, 2.0);
/// ```
#[derive(Clone)]
pub struct ConstructorInfo {
    owner: Type,
    params: Arc<[ParamInfo]>,
    visibility: Visibility,
    attributes: Arc<CustomAttributes>,
    factory: ConstructFn,
}

impl ConstructorInfo {
    /// A public zero-argument constructor.
    pub fn nullary<S: Any + Send>(make: fn() -> S) -> Self {
        Self::new::<S, _>([], move |_: &mut ConstructorArgs| Ok(make()))
    }

    /// A public constructor taking `params`.
    pub fn new<S, F>(params: impl Into<Arc<[ParamInfo]>>, make: F) -> Self
    where
        S: Any + Send,
        F: Fn(&mut ConstructorArgs) -> Result<S, AccessError> + Send + Sync + 'static,
    {
        Self {
            owner: Type::of::<S>(),
            params: params.into(),
            visibility: Visibility::Public,
            attributes: Arc::new(CustomAttributes::new()),
            factory: Arc::new(move |args: &mut ConstructorArgs| {
                Ok(Box::new(make(args)?) as Instance)
            }),
        }
    }

    #[inline]
    pub fn with_visibility(self, visibility: Visibility) -> Self {
        Self { visibility, ..self }
    }

    #[inline]
    pub fn with_attributes(self, attributes: CustomAttributes) -> Self {
        Self {
            attributes: Arc::new(attributes),
            ..self
        }
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }

    /// Returns the type this constructor builds.
    #[inline]
    pub const fn owner(&self) -> &Type {
        &self.owner
    }

    /// Runs the constructor.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Instance, AccessError> {
        if args.len() != self.params.len() {
            return Err(AccessError::ArgumentCount {
                type_path: self.owner.path(),
                expected: self.params.len(),
                found: args.len(),
            });
        }
        (self.factory)(&mut ConstructorArgs {
            values: args.into_iter(),
        })
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// A container for a struct's member capability table.
///
/// Fields, accessors and constructors are kept in declaration order.
///
/// # Example
///
/// ```
/// use vc_mapping::info::{NamedField, NonGenericTypeInfoCell, StructInfo, TypeInfo, Typed};
///
/// #[derive(Default)]
/// struct Point { x: f64, y: f64 }
///
/// impl Typed for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::Struct(
///                 StructInfo::new::<Self>()
///                     .with_field(NamedField::new::<Self, f64>("x", |p| &p.x, |p| &mut p.x))
///                     .with_field(NamedField::new::<Self, f64>("y", |p| &p.y, |p| &mut p.y))
///                     .with_default::<Self>(),
///             )
///         })
///     }
/// }
///
/// let info = Point::type_info().as_struct().unwrap();
/// assert_eq!(info.fields().len(), 2);
/// assert!(info.default_constructor().is_some());
/// ```
#[derive(Clone)]
pub struct StructInfo {
    ty: Type,
    generics: Generics,
    fields: Vec<NamedField>,
    accessors: Vec<Accessor>,
    constructors: Vec<ConstructorInfo>,
    default: Option<ConstructorInfo>,
    attributes: Arc<CustomAttributes>,
}

impl StructInfo {
    impl_type_fn!(ty);

    /// Creates an empty descriptor for `T`.
    pub fn new<T: Any>() -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            fields: Vec::new(),
            accessors: Vec::new(),
            constructors: Vec::new(),
            default: None,
            attributes: Arc::new(CustomAttributes::new()),
        }
    }

    #[inline]
    pub fn with_generics(self, generics: Generics) -> Self {
        Self { generics, ..self }
    }

    #[inline]
    pub fn with_field(mut self, field: NamedField) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessors.push(accessor);
        self
    }

    #[inline]
    pub fn with_constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Registers `T::default` as the type's public zero-argument constructor.
    #[inline]
    pub fn with_default<T: Default + Any + Send>(self) -> Self {
        Self {
            default: Some(ConstructorInfo::nullary::<T>(T::default)),
            ..self
        }
    }

    /// Replaces the type level attributes.
    #[inline]
    pub fn with_attributes(self, attributes: CustomAttributes) -> Self {
        Self {
            attributes: Arc::new(attributes),
            ..self
        }
    }

    #[inline]
    pub const fn generics(&self) -> &Generics {
        &self.generics
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Returns the declared constructors, in declaration order.
    #[inline]
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    /// Returns the `Default` based constructor, if registered.
    #[inline]
    pub fn default_constructor(&self) -> Option<&ConstructorInfo> {
        self.default.as_ref()
    }

    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }
}

impl fmt::Debug for StructInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructInfo")
            .field("ty", &self.ty)
            .field("fields", &self.fields)
            .field("accessors", &self.accessors)
            .field("constructors", &self.constructors)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
