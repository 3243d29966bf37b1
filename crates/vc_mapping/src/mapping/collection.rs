use core::fmt;

use crate::info::{CollectionTraits, GenericArg, Type, TypeInfo, impl_type_fn};
use crate::mapping::is_primitive;

// -----------------------------------------------------------------------------
// CollectionKind

/// The normalized category of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    OrderedSet,
    Set,
    Queue,
    GenericCollection,
}

impl CollectionKind {
    /// The most specific category implied by `traits`, `None` if not a collection.
    pub const fn from_traits(traits: CollectionTraits) -> Option<Self> {
        if traits.contains(CollectionTraits::LIST) {
            Some(Self::List)
        } else if traits.contains(CollectionTraits::SORTED_SET) {
            Some(Self::OrderedSet)
        } else if traits.contains(CollectionTraits::SET) {
            Some(Self::Set)
        } else if traits.contains(CollectionTraits::QUEUE) {
            Some(Self::Queue)
        } else if traits.contains(CollectionTraits::COLLECTION) {
            Some(Self::GenericCollection)
        } else {
            None
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.pad("List"),
            Self::OrderedSet => f.pad("OrderedSet"),
            Self::Set => f.pad("Set"),
            Self::Queue => f.pad("Queue"),
            Self::GenericCollection => f.pad("Collection"),
        }
    }
}

// -----------------------------------------------------------------------------
// CollectionMapping

/// How the JSON layer handles one parameterized collection type.
///
/// # Example
///
/// ```
/// # use std::collections::VecDeque;
/// # use vc_mapping::info::Typed;
/// # use vc_mapping::mapping::{CollectionKind, CollectionMapping};
/// let mapping = CollectionMapping::resolve(<VecDeque<i32>>::type_info()).unwrap();
/// assert_eq!(mapping.kind(), CollectionKind::List);
/// assert!(mapping.element_is_primitive());
///
/// assert!(CollectionMapping::resolve(<Option<Vec<i32>>>::type_info()).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct CollectionMapping {
    ty: Type,
    kind: CollectionKind,
    element: GenericArg,
    element_is_primitive: bool,
}

impl CollectionMapping {
    impl_type_fn!(ty);

    /// Resolves the mapping of `info`.
    ///
    /// Only collections with exactly one type argument resolve; every other
    /// shape, including maps and nullable wrappers, yields `None`.
    pub fn resolve(info: &'static TypeInfo) -> Option<Self> {
        let [element] = &**info.generics() else {
            return None;
        };
        let kind = CollectionKind::from_traits(info.collection_traits())?;
        Some(Self {
            ty: *info.ty(),
            kind,
            element_is_primitive: is_primitive(element.type_info()),
            element: element.clone(),
        })
    }

    #[inline]
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// The element [`Type`].
    #[inline]
    pub const fn element_ty(&self) -> &Type {
        self.element.ty()
    }

    /// The element descriptor.
    #[inline]
    pub fn element_info(&self) -> &'static TypeInfo {
        self.element.type_info()
    }

    #[inline]
    pub const fn element_is_primitive(&self) -> bool {
        self.element_is_primitive
    }
}

// -----------------------------------------------------------------------------
// Tests
