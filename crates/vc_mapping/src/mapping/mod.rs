//! Mapping descriptors and the registry caching them.
//!
//! A [`ClassMapping`] tells the JSON layer how to read, write and
//! instantiate one struct. It is built once from the struct's
//! [`StructInfo`](crate::info::StructInfo) and the active
//! [`MappingConfig`](crate::MappingConfig), then shared through [`Mappings`].
//!
//! ## Menu
//!
//! - [`Mappings`]: the concurrent registry.
//! - [`ClassMapping`], [`Constructor`]: per struct descriptors.
//! - [`Getter`], [`Setter`]: per property descriptors.
//! - [`CollectionMapping`], [`CollectionKind`]: per collection descriptors.
//! - [`is_primitive`]: the scalar classification.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod collection;
mod primitive;
mod property;
mod registry;
mod virtual_object;

// -----------------------------------------------------------------------------
// Exports

pub use class::{ClassMapping, Constructor};
pub use collection::{CollectionKind, CollectionMapping};
pub use primitive::is_primitive;
pub use property::{Getter, Setter};
pub use registry::Mappings;
