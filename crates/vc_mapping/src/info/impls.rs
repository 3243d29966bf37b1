//! [`Typed`] implementations for built-in types.
//!
//! - primitives: `String` `char` `bool` `i8`-`i64` `f32` `f64`
//! - `Option<T>`, the nullable form of `T`
//! - arrays: `Box<[T]>`
//! - collections: `Vec` `VecDeque` `LinkedList` `BTreeSet` `HashSet` `BinaryHeap`
//! - maps: `HashMap<String, V>` `BTreeMap<String, V>` `IndexMap<String, V>`
//! - opaque: [`Value`]

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, BinaryHeap, LinkedList, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::info::{ArrayInfo, CollectionInfo, CollectionTraits, MapInfo, OpaqueInfo};
use crate::info::{GenericTypeInfoCell, NonGenericTypeInfoCell, Typed};
use crate::info::{OptionalInfo, Primitive, PrimitiveInfo, TypeInfo};
use crate::value::Value;

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Primitive(PrimitiveInfo::new::<Self>(Primitive::$kind)))
            }
        }
    )*};
}

impl_primitive! {
    String => String,
    char => Char,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<Self, T>()))
    }
}

impl<T: Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>()))
    }
}

macro_rules! impl_collection {
    ($($ty:ident => $traits:expr),* $(,)?) => {$(
        impl<T: Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Collection(CollectionInfo::new::<Self, T>($traits))
                })
            }
        }
    )*};
}

impl_collection! {
    Vec => CollectionTraits::LIST,
    VecDeque => CollectionTraits::LIST.union(CollectionTraits::QUEUE),
    LinkedList => CollectionTraits::LIST.union(CollectionTraits::QUEUE),
    BTreeSet => CollectionTraits::SET.union(CollectionTraits::SORTED_SET),
    HashSet => CollectionTraits::SET,
    BinaryHeap => CollectionTraits::QUEUE,
}

macro_rules! impl_map {
    ($($ty:ident),* $(,)?) => {$(
        impl<V: Typed> Typed for $ty<String, V> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, String, V>()))
            }
        }
    )*};
}

impl_map!(HashMap, BTreeMap, IndexMap);

// -----------------------------------------------------------------------------
// Tests
