use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;
use crate::utils::TypeIdMap;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to type information.
///
/// # Manually Impl
///
/// For non-generic types, use [`NonGenericTypeInfoCell`]:
///
/// ```
/// use vc_mapping::info::{NamedField, NonGenericTypeInfoCell, StructInfo, TypeInfo, Typed};
///
/// struct Celsius { degrees: f64 }
///
/// impl Typed for Celsius {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(
///             StructInfo::new::<Self>()
///                 .with_field(NamedField::new::<Self, f64>("degrees", |c| &c.degrees, |c| &mut c.degrees))
///         ))
///     }
/// }
///
/// assert!(Celsius::type_info().as_struct().is_some());
/// ```
///
/// For generic types, the `static` inside the function is shared by every
/// instantiation, so use [`GenericTypeInfoCell`] which keys by [`TypeId`]:
///
/// ```
/// use vc_mapping::info::{GenericArg, GenericTypeInfoCell, Generics, StructInfo, TypeInfo, Typed};
///
/// struct Page<T>(Vec<T>);
///
/// impl<T: Typed> Typed for Page<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Struct(
///             StructInfo::new::<Self>().with_generics(Generics::from_args([GenericArg::new::<T>()]))
///         ))
///     }
/// }
///
/// assert_ne!(<Page<i32>>::type_info().type_id(), <Page<i64>>::type_info().type_id());
/// ```
pub trait Typed: Any {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Static storage of a non-generic type's [`TypeInfo`].
///
/// Internally an [`OnceLock`].
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, generating it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Static storage of a generic type's [`TypeInfo`], one entry per instantiation.
///
/// Entries are leaked once, so the returned references are `'static`.
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, generating it with `f` on first use.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        if let Some(info) = found {
            return info;
        }

        // `f` runs without the lock: it may request other instantiations of this cell.
        let info = f();
        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(&type_id) {
            return *existing;
        }
        let leaked: &'static TypeInfo = Box::leak(Box::new(info));
        table.insert(type_id, leaked);
        leaked
    }
}
