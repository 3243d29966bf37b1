//! Static configuration of a [`Mappings`](crate::Mappings) registry.

use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt;

use crate::access::{AccessMode, FieldAccess};

// -----------------------------------------------------------------------------
// FieldOrdering

/// Order of the properties of a built mapping.
#[derive(Clone, Default)]
pub enum FieldOrdering {
    /// Discovery order: virtual objects first, then the access mode's order.
    #[default]
    Unordered,
    /// Sorted by name.
    Lexicographic,
    /// Sorted by a custom comparator.
    Custom(Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>),
}

impl FieldOrdering {
    /// Creates a [`FieldOrdering::Custom`].
    #[inline]
    pub fn custom(compare: impl Fn(&str, &str) -> Ordering + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(compare))
    }

    /// Returns the comparator, `None` when unordered.
    pub(crate) fn comparator(&self) -> Option<&(dyn Fn(&str, &str) -> Ordering + Send + Sync)> {
        fn lexicographic(a: &str, b: &str) -> Ordering {
            a.cmp(b)
        }

        match self {
            Self::Unordered => None,
            Self::Lexicographic => Some(&lexicographic),
            Self::Custom(compare) => Some(&**compare),
        }
    }
}

impl fmt::Debug for FieldOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unordered => f.write_str("Unordered"),
            Self::Lexicographic => f.write_str("Lexicographic"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// MappingConfig

/// Knobs consumed while building mappings.
///
/// # Example
///
/// ```
/// # use vc_mapping::{FieldOrdering, MappingConfig};
/// # use vc_mapping::access::FieldAndAccessorAccess;
/// let config = MappingConfig::new()
///     .with_field_ordering(FieldOrdering::Lexicographic)
///     .with_access_mode(FieldAndAccessorAccess)
///     .with_support_constructors(true)
///     .with_version(Some(2));
///
/// assert!(config.support_constructors());
/// assert!(!config.support_hidden_constructors());
/// assert_eq!(config.version(), Some(2));
/// ```
#[derive(Clone)]
pub struct MappingConfig {
    field_ordering: FieldOrdering,
    access_mode: Arc<dyn AccessMode>,
    support_hidden_constructors: bool,
    support_constructors: bool,
    version: Option<u32>,
}

impl MappingConfig {
    /// The default configuration: unordered, field access, no constructor
    /// support and no active version.
    pub fn new() -> Self {
        Self {
            field_ordering: FieldOrdering::Unordered,
            access_mode: Arc::new(FieldAccess),
            support_hidden_constructors: false,
            support_constructors: false,
            version: None,
        }
    }

    #[inline]
    pub fn with_field_ordering(self, field_ordering: FieldOrdering) -> Self {
        Self {
            field_ordering,
            ..self
        }
    }

    /// Replaces the strategy discovering the readers and writers of a type.
    #[inline]
    pub fn with_access_mode(self, access_mode: impl AccessMode) -> Self {
        Self {
            access_mode: Arc::new(access_mode),
            ..self
        }
    }

    /// Lets hidden zero-argument constructors be used.
    #[inline]
    pub fn with_support_hidden_constructors(self, support: bool) -> Self {
        Self {
            support_hidden_constructors: support,
            ..self
        }
    }

    /// Lets constructors declaring [`ConstructorProperties`](crate::info::ConstructorProperties) be used.
    #[inline]
    pub fn with_support_constructors(self, support: bool) -> Self {
        Self {
            support_constructors: support,
            ..self
        }
    }

    /// Sets the active schema version.
    #[inline]
    pub fn with_version(self, version: Option<u32>) -> Self {
        Self { version, ..self }
    }

    #[inline]
    pub fn field_ordering(&self) -> &FieldOrdering {
        &self.field_ordering
    }

    #[inline]
    pub fn access_mode(&self) -> &dyn AccessMode {
        &*self.access_mode
    }

    #[inline]
    pub const fn support_hidden_constructors(&self) -> bool {
        self.support_hidden_constructors
    }

    #[inline]
    pub const fn support_constructors(&self) -> bool {
        self.support_constructors
    }

    #[inline]
    pub const fn version(&self) -> Option<u32> {
        self.version
    }
}

impl Default for MappingConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MappingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingConfig")
            .field("field_ordering", &self.field_ordering)
            .field("support_hidden_constructors", &self.support_hidden_constructors)
            .field("support_constructors", &self.support_constructors)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
