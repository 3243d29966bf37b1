use crate::info::TypeInfo;

/// Returns `true` if the JSON layer reads and writes values of this type directly.
///
/// True for strings, characters, signed integers, floats, booleans and the
/// arbitrary-precision numbers, as well as their nullable (`Option`) forms.
/// False for arrays, collections, maps, structs and opaque types.
///
/// # Example
///
/// ```
/// # use vc_mapping::info::Typed;
/// # use vc_mapping::mapping::is_primitive;
/// assert!(is_primitive(i16::type_info()));
/// assert!(is_primitive(<Option<bool>>::type_info()));
/// assert!(!is_primitive(<Vec<i16>>::type_info()));
/// ```
#[inline]
pub fn is_primitive(info: &'static TypeInfo) -> bool {
    matches!(info.erased(), TypeInfo::Primitive(_))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use std::collections::HashMap;

    use super::is_primitive;
    use crate::fixtures::{Big, Place};
    use crate::info::Typed;
    use crate::value::{ToValue, Value, ValueMap};

    #[test]
    fn scalars_are_primitive() {
        assert!(is_primitive(String::type_info()));
        assert!(is_primitive(char::type_info()));
        assert!(is_primitive(i8::type_info()));
        assert!(is_primitive(i16::type_info()));
        assert!(is_primitive(i32::type_info()));
        assert!(is_primitive(i64::type_info()));
        assert!(is_primitive(f32::type_info()));
        assert!(is_primitive(f64::type_info()));
        assert!(is_primitive(bool::type_info()));
        assert!(is_primitive(Big::type_info()));
    }

    #[test]
    fn big_integers_stay_scalar() {
        let big = Big("123456789012345678901234567890".into());
        assert_eq!(big.to_value(), Value::from("123456789012345678901234567890"));
        assert!(is_primitive(<Option<Big>>::type_info()));
    }

    #[test]
    fn nullable_scalars_are_primitive() {
        assert!(is_primitive(<Option<i64>>::type_info()));
        assert!(is_primitive(<Option<char>>::type_info()));
        assert!(is_primitive(<Option<Option<f64>>>::type_info()));
    }

    #[test]
    fn structural_types_are_not_primitive() {
        assert!(!is_primitive(Place::type_info()));
        assert!(!is_primitive(<Box<[i32]>>::type_info()));
        assert!(!is_primitive(<Vec<String>>::type_info()));
        assert!(!is_primitive(<BTreeSet<i32>>::type_info()));
        assert!(!is_primitive(<HashMap<String, i32>>::type_info()));
        assert!(!is_primitive(ValueMap::type_info()));
        assert!(!is_primitive(Value::type_info()));
        assert!(!is_primitive(<Option<Place>>::type_info()));
    }
}
