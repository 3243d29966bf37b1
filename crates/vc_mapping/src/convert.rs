//! The value conversion capability attached to properties and parameters.
//!
//! Converters turn a property value into its wire form (what the JSON driver
//! writes) and back. Declaring one on a property through
//! [`WithConverter`](crate::info::WithConverter) makes the mapper treat the
//! property as a leaf, never as a nested object.

use crate::error::ConvertError;
use crate::value::Value;

/// Converts a value between its domain form and its wire form.
///
/// # Example
///
/// ```
/// use vc_mapping::convert::Converter;
/// use vc_mapping::{ConvertError, Value};
///
/// /// Writes booleans as `"yes"` / `"no"`.
/// #[derive(Default)]
/// struct YesNo;
///
/// impl Converter for YesNo {
///     fn to_wire(&self, value: Value) -> Result<Value, ConvertError> {
///         match value {
///             Value::Bool(b) => Ok(Value::from(if b { "yes" } else { "no" })),
///             other => Ok(other),
///         }
///     }
///
///     fn from_wire(&self, value: Value) -> Result<Value, ConvertError> {
///         match value.as_str() {
///             Some("yes") => Ok(Value::Bool(true)),
///             Some("no") => Ok(Value::Bool(false)),
///             _ => Err(ConvertError::new("expected yes or no")),
///         }
///     }
/// }
///
/// assert_eq!(YesNo.to_wire(Value::Bool(true)).unwrap(), Value::from("yes"));
/// assert!(YesNo.from_wire(Value::from("maybe")).is_err());
/// ```
pub trait Converter: Send + Sync + 'static {
    /// Domain form to wire form, used when reading an instance.
    fn to_wire(&self, value: Value) -> Result<Value, ConvertError>;

    /// Wire form to domain form, used when writing an instance.
    fn from_wire(&self, value: Value) -> Result<Value, ConvertError>;
}
