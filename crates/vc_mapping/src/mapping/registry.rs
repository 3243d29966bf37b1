use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use log::{debug, trace};

use crate::config::MappingConfig;
use crate::error::MappingError;
use crate::info::{TypeInfo, Typed};
use crate::mapping::{ClassMapping, CollectionMapping};
use crate::utils::TypeIdMap;

/// Commits `built` unless another thread got there first, returning the stored entry.
fn register_if_absent<V>(
    cache: &RwLock<TypeIdMap<Arc<V>>>,
    type_id: TypeId,
    built: Arc<V>,
    type_path: &'static str,
) -> Arc<V> {
    let mut table = cache.write().unwrap_or_else(PoisonError::into_inner);
    let stored = table.get_or_insert(type_id, built.clone());
    if !Arc::ptr_eq(stored, &built) {
        trace!("`{type_path}` was built concurrently, keeping the first mapping");
    }
    stored.clone()
}

fn lookup<V>(cache: &RwLock<TypeIdMap<Arc<V>>>, type_id: TypeId) -> Option<Arc<V>> {
    cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
        .cloned()
}

// -----------------------------------------------------------------------------
// Mappings

/// The registry of class and collection mappings.
///
/// Mappings are built on first demand and cached for the lifetime of the
/// registry. Builds run without holding a lock: concurrent first requests of
/// one type may build it more than once, but every caller receives the first
/// committed instance.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vc_mapping::info::{NamedField, NonGenericTypeInfoCell, StructInfo, TypeInfo, Typed};
/// use vc_mapping::Mappings;
///
/// #[derive(Default)]
/// struct Point { x: f64, y: f64 }
///
/// impl Typed for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(
///             StructInfo::new::<Self>()
///                 .with_field(NamedField::new::<Self, f64>("x", |p| &p.x, |p| &mut p.x))
///                 .with_field(NamedField::new::<Self, f64>("y", |p| &p.y, |p| &mut p.y))
///                 .with_default::<Self>(),
///         ))
///     }
/// }
///
/// let mappings = Mappings::default();
/// let first = mappings.find_or_create::<Point>().unwrap().unwrap();
/// let again = mappings.find_or_create::<Point>().unwrap().unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
/// assert_eq!(first.getters().len(), 2);
///
/// // Maps are handled structurally, never through a class mapping.
/// assert!(mappings.find_or_create::<vc_mapping::ValueMap>().unwrap().is_none());
/// ```
pub struct Mappings {
    config: MappingConfig,
    classes: RwLock<TypeIdMap<Arc<ClassMapping>>>,
    collections: RwLock<TypeIdMap<Arc<CollectionMapping>>>,
}

impl Mappings {
    pub fn new(config: MappingConfig) -> Self {
        Self {
            config,
            classes: RwLock::new(TypeIdMap::new()),
            collections: RwLock::new(TypeIdMap::new()),
        }
    }

    #[inline]
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Returns the mapping of `info`, building it on first demand.
    ///
    /// Types other than structs are not mappable and yield `Ok(None)`.
    /// A failed build is not cached, the next request builds again.
    pub fn find_or_create_class_mapping(
        &self,
        info: &'static TypeInfo,
    ) -> Result<Option<Arc<ClassMapping>>, MappingError> {
        if let Some(found) = lookup(&self.classes, info.type_id()) {
            return Ok(Some(found));
        }
        let Some(struct_info) = info.as_struct() else {
            return Ok(None);
        };

        let built = Arc::new(ClassMapping::build(struct_info, &self.config)?);
        debug!(
            "built class mapping of `{}`: {} getters, {} setters, constructor arity {:?}",
            info.type_path(),
            built.getters().len(),
            built.setters().len(),
            built.constructor().map(|constructor| constructor.info().param_count()),
        );
        Ok(Some(register_if_absent(
            &self.classes,
            info.type_id(),
            built,
            info.type_path(),
        )))
    }

    /// Typed shorthand of [`find_or_create_class_mapping`](Self::find_or_create_class_mapping).
    #[inline]
    pub fn find_or_create<T: Typed>(&self) -> Result<Option<Arc<ClassMapping>>, MappingError> {
        self.find_or_create_class_mapping(T::type_info())
    }

    /// Returns the collection mapping of `info`, resolving it on first demand.
    ///
    /// Shapes other than single-argument collections yield `None`.
    pub fn find_collection_mapping(&self, info: &'static TypeInfo) -> Option<Arc<CollectionMapping>> {
        if let Some(found) = lookup(&self.collections, info.type_id()) {
            return Some(found);
        }
        let built = Arc::new(CollectionMapping::resolve(info)?);
        debug!(
            "built collection mapping of `{}`: {}",
            info.type_path(),
            built.kind(),
        );
        Some(register_if_absent(
            &self.collections,
            info.type_id(),
            built,
            info.type_path(),
        ))
    }

    /// Typed shorthand of [`find_collection_mapping`](Self::find_collection_mapping).
    #[inline]
    pub fn find_collection<T: Typed>(&self) -> Option<Arc<CollectionMapping>> {
        self.find_collection_mapping(T::type_info())
    }

    /// Returns the cached mapping of a type without building it.
    #[inline]
    pub fn get_class_mapping(&self, type_id: TypeId) -> Option<Arc<ClassMapping>> {
        lookup(&self.classes, type_id)
    }
}

impl Default for Mappings {
    #[inline]
    fn default() -> Self {
        Self::new(MappingConfig::default())
    }
}

impl fmt::Debug for Mappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mappings")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
