#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Compilation config

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod utils;

pub mod access;
pub mod config;
pub mod convert;
pub mod error;
pub mod info;
pub mod mapping;
pub mod value;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use config::{FieldOrdering, MappingConfig};
pub use error::{AccessError, ConvertError, MappingError, ValueError};
pub use mapping::{ClassMapping, CollectionMapping, Getter, Mappings, Setter};
pub use value::{FromValue, ToValue, Value, ValueMap};
