use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, BinaryHeap, LinkedList, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::ValueError;
use crate::info::Type;
use crate::value::{TypedArray, Value, ValueMap};

// -----------------------------------------------------------------------------
// Traits

/// Conversion of a Rust value into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Conversion of a [`Value`] into a Rust value.
///
/// # Example
///
/// ```
/// # use vc_mapping::{FromValue, Value};
/// assert_eq!(i8::from_value(Value::Int(7)), Ok(7));
/// assert!(i8::from_value(Value::Int(300)).is_err());
/// assert_eq!(<Option<String>>::from_value(Value::Null), Ok(None));
/// ```
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

#[inline]
fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T, ValueError> {
    Err(ValueError::Mismatch {
        expected,
        found: value.kind(),
    })
}

// -----------------------------------------------------------------------------
// Scalars

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => mismatch("bool", &other),
        }
    }
}

impl ToValue for char {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Char(v) => Ok(v),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => mismatch("char", &Value::String(s)),
                }
            }
            other => mismatch("char", &other),
        }
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(v) => Ok(v),
            Value::Char(c) => Ok(String::from(c)),
            other => mismatch("string", &other),
        }
    }
}

macro_rules! impl_int {
    ($($ty:ident),*) => {$(
        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Int(v) => $ty::try_from(v).map_err(|_| ValueError::OutOfRange {
                        value: v,
                        target: stringify!($ty),
                    }),
                    other => mismatch(stringify!($ty), &other),
                }
            }
        }
    )*};
}

impl_int!(i8, i16, i32, i64);

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

/// Narrowing rounds to the nearest `f32`; finite values beyond its range are rejected.
impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        let v = f64::from_value(value)?;
        if v.is_finite() && v.abs() > f64::from(f32::MAX) {
            return Err(ValueError::FloatOutOfRange {
                value: v,
                target: "f32",
            });
        }
        Ok(v as f32)
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => mismatch("f64", &other),
        }
    }
}

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Option

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// -----------------------------------------------------------------------------
// Arrays

impl<T: ToValue + 'static> ToValue for Box<[T]> {
    fn to_value(&self) -> Value {
        Value::Array(TypedArray::new(
            Type::of::<T>(),
            self.iter().map(ToValue::to_value).collect::<Box<[Value]>>(),
        ))
    }
}

/// Only typed arrays of the same component are accepted.
impl<T: FromValue + 'static> FromValue for Box<[T]> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Array(array) if array.component().is::<T>() => array
                .into_items()
                .into_vec()
                .into_iter()
                .map(T::from_value)
                .collect(),
            other => mismatch(core::any::type_name::<Self>(), &other),
        }
    }
}

// -----------------------------------------------------------------------------
// Collections

fn into_items(value: Value, expected: &'static str) -> Result<Vec<Value>, ValueError> {
    match value {
        Value::Seq(items) => Ok(items),
        Value::Array(array) => Ok(array.into_items().into_vec()),
        other => mismatch(expected, &other),
    }
}

macro_rules! impl_collection {
    ($ty:ident $(, $bound:path)*) => {
        impl<T: ToValue> ToValue for $ty<T> {
            fn to_value(&self) -> Value {
                Value::Seq(self.iter().map(ToValue::to_value).collect())
            }
        }

        impl<T: FromValue $(+ $bound)*> FromValue for $ty<T> {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                into_items(value, core::any::type_name::<Self>())?
                    .into_iter()
                    .map(T::from_value)
                    .collect()
            }
        }
    };
}

impl_collection!(Vec);
impl_collection!(VecDeque);
impl_collection!(LinkedList);
impl_collection!(BTreeSet, Ord);
impl_collection!(HashSet, Eq, Hash);
impl_collection!(BinaryHeap, Ord);

// -----------------------------------------------------------------------------
// Maps

macro_rules! impl_map {
    ($ty:ident) => {
        impl<V: ToValue> ToValue for $ty<String, V> {
            fn to_value(&self) -> Value {
                Value::Map(
                    self.iter()
                        .map(|(k, v)| (k.clone(), v.to_value()))
                        .collect::<ValueMap>(),
                )
            }
        }

        impl<V: FromValue> FromValue for $ty<String, V> {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Map(map) => map
                        .into_iter()
                        .map(|(k, v)| V::from_value(v).map(|v| (k, v)))
                        .collect(),
                    other => mismatch(core::any::type_name::<Self>(), &other),
                }
            }
        }
    };
}

impl_map!(HashMap);
impl_map!(BTreeMap);
impl_map!(IndexMap);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;

    use crate::error::ValueError;
    use crate::info::Type;
    use crate::value::{FromValue, ToValue, TypedArray, Value, ValueKind};

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(i16::from_value(Value::Int(-5)), Ok(-5));
        assert_eq!(
            i8::from_value(Value::Int(128)),
            Err(ValueError::OutOfRange {
                value: 128,
                target: "i8"
            })
        );
        assert_eq!(f64::from_value(Value::Int(3)), Ok(3.0));
    }

    #[test]
    fn f32_narrowing_is_range_checked() {
        assert_eq!(f32::from_value(Value::Float(0.5)), Ok(0.5));
        assert_eq!(f32::from_value(Value::Float(f64::INFINITY)), Ok(f32::INFINITY));
        assert_eq!(
            f32::from_value(Value::Float(1e300)),
            Err(ValueError::FloatOutOfRange {
                value: 1e300,
                target: "f32"
            })
        );
    }

    #[test]
    fn arrays_require_matching_component() {
        let array = Value::Array(TypedArray::new(
            Type::of::<f64>(),
            [Value::Float(1.0), Value::Float(2.0)],
        ));
        let parsed = <Box<[f64]>>::from_value(array).unwrap();
        assert_eq!(&*parsed, &[1.0, 2.0]);

        let seq = Value::Seq(vec![Value::Float(1.0)]);
        assert!(<Box<[f64]>>::from_value(seq).is_err());

        let wrong = Value::Array(TypedArray::new(Type::of::<i64>(), [Value::Int(1)]));
        assert!(<Box<[f64]>>::from_value(wrong).is_err());
    }

    #[test]
    fn collections_accept_sequences() {
        let seq = Value::Seq(vec![Value::Int(2), Value::Int(1), Value::Int(2)]);
        let set = <BTreeSet<i32>>::from_value(seq).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 2]);

        let err = <Vec<i32>>::from_value(Value::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            ValueError::Mismatch {
                found: ValueKind::Bool,
                ..
            }
        ));
    }

    #[test]
    fn option_and_char() {
        assert_eq!(Some(3_i32).to_value(), Value::Int(3));
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(char::from_value(Value::from("x")), Ok('x'));
        assert!(char::from_value(Value::from("xy")).is_err());
    }
}
