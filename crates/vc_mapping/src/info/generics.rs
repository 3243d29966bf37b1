use alloc::boxed::Box;
use core::ops::Deref;

use crate::info::{Type, TypeInfo, Typed, impl_type_fn};

// -----------------------------------------------------------------------------
// GenericArg

/// One type argument of a parameterized type.
///
/// The [`TypeInfo`] is resolved lazily, so recursive types can describe themselves.
#[derive(Clone, Debug)]
pub struct GenericArg {
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
}

impl GenericArg {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            type_info: T::type_info,
        }
    }

    /// Returns the [`TypeInfo`] of the argument.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}

// -----------------------------------------------------------------------------
// Generics

/// The ordered type arguments of a descriptor.
///
/// # Example
///
/// ```
/// # use vc_mapping::info::Typed;
/// let generics = <Vec<i32>>::type_info().generics();
/// assert_eq!(generics.len(), 1);
/// assert!(generics[0].ty().is::<i32>());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Generics(Box<[GenericArg]>);

impl Generics {
    /// Creates an empty argument list.
    #[inline]
    pub fn new() -> Self {
        Self(Box::new([]))
    }

    #[inline]
    pub fn from_args(args: impl Into<Box<[GenericArg]>>) -> Self {
        Self(args.into())
    }
}

impl Deref for Generics {
    type Target = [GenericArg];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
