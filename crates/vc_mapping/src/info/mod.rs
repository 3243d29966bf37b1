//! Static type descriptors consumed by the mapper.
//!
//! Every type that takes part in mapping describes itself through [`Typed`],
//! returning a `&'static` [`TypeInfo`]. Struct descriptors ([`StructInfo`])
//! carry the member capability table (fields, accessors, constructors) and
//! the [`CustomAttributes`] that configure mapping.
//!
//! ## Menu
//!
//! - [`Type`]: type identity, a [`TypeId`](core::any::TypeId) and a path.
//! - [`TypeInfo`]: kind specific descriptor.
//! - [`Generics`]: the type arguments of a descriptor.
//! - [`StructInfo`], [`NamedField`], [`Accessor`], [`ConstructorInfo`]: struct members.
//! - [`CustomAttributes`] and attribute types: [`Ignore`], [`WithConverter`],
//!   [`VirtualObject`], [`VirtualObjects`], [`ConstructorProperties`].
//! - [`NonGenericTypeInfoCell`], [`GenericTypeInfoCell`]: static storage helpers.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod generics;
mod impls;
mod struct_info;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use attributes::{ConstructorProperties, CustomAttributes, Ignore, WithConverter};
pub use attributes::{VirtualField, VirtualObject, VirtualObjects};
pub use generics::{GenericArg, Generics};
pub use struct_info::{Accessor, NamedField, StructInfo};
pub use struct_info::{ConstructorArgs, ConstructorInfo, Instance, ParamInfo, Visibility};
pub use ty::Type;
pub use type_info::{ArrayInfo, CollectionInfo, CollectionTraits, MapInfo};
pub use type_info::{OpaqueInfo, OptionalInfo, Primitive, PrimitiveInfo};
pub use type_info::{TypeInfo, TypeKind};
pub use typed::{GenericTypeInfoCell, NonGenericTypeInfoCell, Typed};

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implement `ty`, `type_id` and `type_path` for descriptors holding a `ty` field.
macro_rules! impl_type_fn {
    ($field:ident) => {
        /// Returns the [`Type`](crate::info::Type).
        #[inline]
        pub const fn ty(&self) -> &crate::info::Type {
            &self.$field
        }

        /// Returns the [`TypeId`](core::any::TypeId).
        #[inline]
        pub const fn type_id(&self) -> ::core::any::TypeId {
            self.$field.id()
        }

        /// Returns the full type path.
        #[inline]
        pub const fn type_path(&self) -> &'static str {
            self.$field.path()
        }
    };
}

pub(crate) use impl_type_fn;
