//! Factory registry: logical module name → factory of lazy instances.
//!
//! Built from a marker scan: every matched type is registered under the
//! value of its marker's `name` attribute. Registering a name twice keeps the
//! later factory; the overwrite is logged, not rejected.

use crate::error::{AutofactoryError, Result};
use crate::lazy::LazyCell;
use crate::scanner::MarkerScanner;
use autofactory_api::{MarkerKind, TypeName};
use autofactory_plugin::{MarkerPredicate, TypeCatalog, TypeConstructor};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Marker attribute holding the logical module name.
pub const NAME_ATTRIBUTE: &str = "name";

/// Produces lazy cells around fresh instances of one module type.
pub trait ModuleFactory: Send + Sync {
    /// A new, uninitialized cell. Every call yields an independent cell.
    fn instance(&self) -> LazyCell<dyn Any + Send + Sync>;

    fn type_name(&self) -> &TypeName;
}

/// Factory constructing its type through the parameterless-constructor capability.
pub struct ConstructorFactory {
    ty: TypeName,
    constructor: Arc<dyn TypeConstructor>,
}

impl ConstructorFactory {
    pub fn new(ty: TypeName, constructor: Arc<dyn TypeConstructor>) -> Self {
        Self { ty, constructor }
    }
}

impl ModuleFactory for ConstructorFactory {
    fn instance(&self) -> LazyCell<dyn Any + Send + Sync> {
        let ty = self.ty.clone();
        let constructor = Arc::clone(&self.constructor);
        LazyCell::new(move || {
            constructor
                .construct(&ty)
                .map(Arc::<dyn Any + Send + Sync>::from)
        })
    }

    fn type_name(&self) -> &TypeName {
        &self.ty
    }
}

impl fmt::Debug for ConstructorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorFactory")
            .field("ty", &self.ty)
            .finish()
    }
}

/// Thread-safe in-memory factory registry
#[derive(Default)]
pub struct FactoryRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ModuleFactory>>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            factories: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Scan for `marker` and register every match under its `name` attribute.
    pub fn discover(
        scanner: &MarkerScanner,
        marker: &MarkerKind,
        predicate: &dyn MarkerPredicate,
        constructor: Arc<dyn TypeConstructor>,
    ) -> Result<Self> {
        let registry = Self::new();
        registry.populate(scanner, marker, predicate, constructor)?;
        Ok(registry)
    }

    /// [`discover`](Self::discover) with one catalog answering both capabilities.
    pub fn discover_in_catalog(
        scanner: &MarkerScanner,
        marker: &MarkerKind,
        catalog: Arc<TypeCatalog>,
    ) -> Result<Self> {
        Self::discover(scanner, marker, catalog.as_ref(), catalog.clone())
    }

    /// Register the matches of one scan into this registry.
    ///
    /// Attributes are read for every match before anything is registered, so
    /// a failure leaves the registry unchanged. Returns the number of matches.
    pub fn populate(
        &self,
        scanner: &MarkerScanner,
        marker: &MarkerKind,
        predicate: &dyn MarkerPredicate,
        constructor: Arc<dyn TypeConstructor>,
    ) -> Result<usize> {
        let matches = scanner.scan(marker)?;

        let mut entries = Vec::with_capacity(matches.len());
        for ty in matches {
            let name = predicate
                .read_attribute(&ty, marker, NAME_ATTRIBUTE)?
                .ok_or_else(|| AutofactoryError::MissingAttribute {
                    ty: ty.clone(),
                    marker: marker.clone(),
                    key: NAME_ATTRIBUTE.to_string(),
                })?;
            let factory: Arc<dyn ModuleFactory> =
                Arc::new(ConstructorFactory::new(ty, Arc::clone(&constructor)));
            entries.push((name, factory));
        }

        let count = entries.len();
        self.register_batch(entries);
        info!("Registered {} factories for {}", count, marker);
        Ok(count)
    }

    /// Register a factory; returns the factory it replaced, if any.
    pub fn register(
        &self,
        name: impl Into<String>,
        factory: Arc<dyn ModuleFactory>,
    ) -> Option<Arc<dyn ModuleFactory>> {
        let name = name.into();
        debug!("Registering {} -> {}", name, factory.type_name());
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        let previous = factories.insert(name.clone(), factory);
        if let Some(replaced) = &previous {
            warn!(
                "Module name {} was bound to {}, overwriting",
                name,
                replaced.type_name()
            );
        }
        previous
    }

    /// Register multiple factories at once (one lock acquisition)
    pub fn register_batch(
        &self,
        entries: impl IntoIterator<Item = (String, Arc<dyn ModuleFactory>)>,
    ) {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        for (name, factory) in entries {
            debug!("Registering {} -> {}", name, factory.type_name());
            if let Some(replaced) = factories.insert(name.clone(), factory) {
                warn!(
                    "Module name {} was bound to {}, overwriting",
                    name,
                    replaced.type_name()
                );
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ModuleFactory>> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all factories
    pub fn clear(&self) {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        factories.clear();
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("names", &self.names())
            .finish()
    }
}
