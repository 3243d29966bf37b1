use serde::ser::{Error, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::Value;

/// Objects cannot be serialized; every other variant maps to its JSON shape.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Char(v) => serializer.serialize_char(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Array(array) => {
                let mut seq = serializer.serialize_seq(Some(array.len()))?;
                for item in array.items() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Object(_) => Err(S::Error::custom(
                "domain objects must be mapped before serialization",
            )),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
