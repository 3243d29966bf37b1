use core::any::TypeId;
use core::fmt;

use bitflags::bitflags;

use crate::info::{GenericArg, Generics, StructInfo, Type, Typed, impl_type_fn};

// -----------------------------------------------------------------------------
// TypeKind

/// The kind of a [`TypeInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Optional,
    Array,
    Collection,
    Map,
    Struct,
    Opaque,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Optional => f.pad("Optional"),
            Self::Array => f.pad("Array"),
            Self::Collection => f.pad("Collection"),
            Self::Map => f.pad("Map"),
            Self::Struct => f.pad("Struct"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// Scalars the JSON layer reads and writes without structural recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    /// Arbitrary-precision integer, described by external types.
    BigInteger,
    /// Arbitrary-precision decimal, described by external types.
    BigDecimal,
}

/// Descriptor of a [`Primitive`] type.
#[derive(Clone, Debug)]
pub struct PrimitiveInfo {
    ty: Type,
    primitive: Primitive,
    generics: Generics,
}

impl PrimitiveInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: ?Sized + 'static>(primitive: Primitive) -> Self {
        Self {
            ty: Type::of::<T>(),
            primitive,
            generics: Generics::new(),
        }
    }

    #[inline]
    pub const fn primitive(&self) -> Primitive {
        self.primitive
    }
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// Descriptor of a nullable wrapper such as `Option<T>`.
#[derive(Clone, Debug)]
pub struct OptionalInfo {
    ty: Type,
    generics: Generics,
}

impl OptionalInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: ?Sized + 'static, Inner: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::from_args([GenericArg::new::<Inner>()]),
        }
    }

    /// Returns the descriptor of the wrapped type.
    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        self.generics[0].type_info()
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Descriptor of a fixed-length sequence such as `Box<[T]>`.
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    ty: Type,
    generics: Generics,
}

impl ArrayInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: ?Sized + 'static, Item: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::from_args([GenericArg::new::<Item>()]),
        }
    }

    /// Returns the component [`Type`].
    #[inline]
    pub fn item_ty(&self) -> &Type {
        self.generics[0].ty()
    }

    /// Returns the component descriptor.
    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        self.generics[0].type_info()
    }
}

// -----------------------------------------------------------------------------
// CollectionInfo

bitflags! {
    /// Collection interfaces a type is assignable to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollectionTraits: u8 {
        const COLLECTION = 1 << 0;
        const LIST = 1 << 1;
        const SET = 1 << 2;
        const SORTED_SET = 1 << 3;
        const QUEUE = 1 << 4;
    }
}

/// Descriptor of a growable, single-element container.
#[derive(Clone, Debug)]
pub struct CollectionInfo {
    ty: Type,
    traits: CollectionTraits,
    generics: Generics,
}

impl CollectionInfo {
    impl_type_fn!(ty);

    /// Creates a collection descriptor, [`CollectionTraits::COLLECTION`] is always added.
    #[inline]
    pub fn new<T: ?Sized + 'static, Item: Typed>(traits: CollectionTraits) -> Self {
        Self {
            ty: Type::of::<T>(),
            traits: traits | CollectionTraits::COLLECTION,
            generics: Generics::from_args([GenericArg::new::<Item>()]),
        }
    }

    #[inline]
    pub const fn traits(&self) -> CollectionTraits {
        self.traits
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        self.generics[0].type_info()
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Descriptor of a string keyed map.
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    generics: Generics,
}

impl MapInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: ?Sized + 'static, K: Typed, V: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::from_args([GenericArg::new::<K>(), GenericArg::new::<V>()]),
        }
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        self.generics[1].type_info()
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Descriptor of a type the mapper has no structural knowledge of.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    ty: Type,
    generics: Generics,
}

impl OpaqueInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: ?Sized + 'static>() -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
        }
    }

    #[inline]
    pub fn with_generics(self, generics: Generics) -> Self {
        Self { generics, ..self }
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static type information.
///
/// Obtained through [`Typed::type_info`].
///
/// # Example
///
/// ```
/// # use vc_mapping::info::{Typed, TypeKind, CollectionTraits};
/// let info = <Vec<i64>>::type_info();
/// assert_eq!(info.kind(), TypeKind::Collection);
/// assert!(info.collection_traits().contains(CollectionTraits::LIST));
///
/// let info = <Option<Vec<i64>>>::type_info();
/// assert_eq!(info.kind(), TypeKind::Optional);
/// assert_eq!(info.erased().kind(), TypeKind::Collection);
/// ```
#[derive(Clone, Debug)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Optional(OptionalInfo),
    Array(ArrayInfo),
    Collection(CollectionInfo),
    Map(MapInfo),
    Struct(StructInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Returns the specific descriptor if the kind matches.
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$kind(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_collection: Collection => CollectionInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);

    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Optional(_) => TypeKind::Optional,
            Self::Array(_) => TypeKind::Array,
            Self::Collection(_) => TypeKind::Collection,
            Self::Map(_) => TypeKind::Map,
            Self::Struct(_) => TypeKind::Struct,
            Self::Opaque(_) => TypeKind::Opaque,
        }
    }

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Collection(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// Returns the type arguments.
    pub fn generics(&self) -> &Generics {
        match self {
            Self::Primitive(info) => &info.generics,
            Self::Optional(info) => &info.generics,
            Self::Array(info) => &info.generics,
            Self::Collection(info) => &info.generics,
            Self::Map(info) => &info.generics,
            Self::Struct(info) => info.generics(),
            Self::Opaque(info) => &info.generics,
        }
    }

    /// Returns the [`CollectionTraits`], empty for anything but collections.
    #[inline]
    pub const fn collection_traits(&self) -> CollectionTraits {
        match self {
            Self::Collection(info) => info.traits(),
            _ => CollectionTraits::empty(),
        }
    }

    /// Returns the descriptor with nullable wrappers removed.
    pub fn erased(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while let Self::Optional(optional) = info {
            info = optional.inner();
        }
        info
    }
}
