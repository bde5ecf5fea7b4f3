//! Type catalog: the registration table the scanner resolves type names against.
//!
//! Types enter the catalog in one of two ways:
//! - at build time, through [`register_type!`](crate::register_type), which
//!   submits a [`TypeRegistration`] to the `inventory` table
//! - at startup, through an explicit manifest assembled with
//!   [`TypeCatalog::builder`]
//!
//! The catalog answers marker queries ([`MarkerPredicate`]) and builds
//! instances through each type's parameterless constructor
//! ([`TypeConstructor`]).

use crate::cap::{Instance, MarkerPredicate, TypeConstructor};
use autofactory_api::{BoxError, ConstructError, MarkerKind, ScanError, TypeName};
use once_cell::sync::Lazy;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared parameterless constructor.
pub type Constructor = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

// ==================== Build-time Registration ====================

/// Static registration record collected by `inventory`.
pub struct TypeRegistration {
    /// Fully-qualified name; `::` separators are normalized to `.`
    pub name: &'static str,
    pub markers: &'static [MarkerRegistration],
    pub constructor: Option<fn() -> Result<Instance, BoxError>>,
}

pub struct MarkerRegistration {
    pub kind: &'static str,
    pub attributes: &'static [(&'static str, &'static str)],
}

inventory::collect!(TypeRegistration);

/// Parameterless constructor backed by [`Default`].
pub fn default_constructor<T: Default + Any + Send + Sync>() -> Result<Instance, BoxError> {
    Ok(Box::new(T::default()))
}

/// Register a `Default`-constructible type in the global catalog.
///
/// ```ignore
/// #[derive(Default)]
/// pub struct AudioModule;
///
/// // Name derived from the module path: `my_app.modules.AudioModule`
/// register_type!(AudioModule, module(name = "audio"));
///
/// // Explicit name
/// register_type!(AudioModule as "com.example.AudioModule", module(name = "audio"));
/// ```
#[macro_export]
macro_rules! register_type {
    (@submit $name:expr, $ctor:expr $(, $marker:ident ( $($key:ident = $value:expr),* ))*) => {
        $crate::inventory::submit! {
            $crate::catalog::TypeRegistration {
                name: $name,
                markers: &[$(
                    $crate::catalog::MarkerRegistration {
                        kind: stringify!($marker),
                        attributes: &[$((stringify!($key), $value)),*],
                    }
                ),*],
                constructor: $ctor,
            }
        }
    };
    ($ty:ty as $name:literal $(, $marker:ident ( $($key:ident = $value:expr),* $(,)? ))* $(,)?) => {
        $crate::register_type!(
            @submit $name,
            Some($crate::catalog::default_constructor::<$ty>)
            $(, $marker($($key = $value),*))*
        );
    };
    ($ty:ty $(, $marker:ident ( $($key:ident = $value:expr),* $(,)? ))* $(,)?) => {
        $crate::register_type!(
            @submit concat!(module_path!(), "::", stringify!($ty)),
            Some($crate::catalog::default_constructor::<$ty>)
            $(, $marker($($key = $value),*))*
        );
    };
}

// ==================== Descriptors ====================

/// Everything the catalog knows about one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: TypeName,
    markers: HashMap<MarkerKind, BTreeMap<String, String>>,
    constructor: Option<Constructor>,
    accessible: bool,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            markers: HashMap::new(),
            constructor: None,
            accessible: true,
        }
    }

    /// Attach a marker without attributes.
    pub fn marked(self, kind: impl Into<MarkerKind>) -> Self {
        self.with_marker(kind, std::iter::empty::<(String, String)>())
    }

    pub fn with_marker<I, K, V>(mut self, kind: impl Into<MarkerKind>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let slot = self.markers.entry(kind.into()).or_default();
        for (key, value) in attributes {
            slot.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_constructor(
        mut self,
        constructor: impl Fn() -> Result<Instance, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Use [`Default`] as the parameterless constructor.
    pub fn with_default<T: Default + Any + Send + Sync>(self) -> Self {
        self.with_constructor(default_constructor::<T>)
    }

    /// Constructor exists but may not be invoked from outside the type.
    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn has_marker(&self, kind: &MarkerKind) -> bool {
        self.markers.contains_key(kind)
    }

    pub fn attribute(&self, kind: &MarkerKind, key: &str) -> Option<&str> {
        self.markers
            .get(kind)
            .and_then(|attributes| attributes.get(key))
            .map(String::as_str)
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    fn from_registration(registration: &TypeRegistration) -> Self {
        let name: String = registration
            .name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .replace("::", ".");

        let mut descriptor = Self::new(name);
        for marker in registration.markers {
            descriptor = descriptor.with_marker(
                MarkerKind::from_static(marker.kind),
                marker.attributes.iter().copied(),
            );
        }
        if let Some(constructor) = registration.constructor {
            descriptor = descriptor.with_constructor(constructor);
        }
        descriptor
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("markers", &self.markers)
            .field("has_constructor", &self.constructor.is_some())
            .field("accessible", &self.accessible)
            .finish()
    }
}

// ==================== Catalog ====================

static GLOBAL_CATALOG: Lazy<Arc<TypeCatalog>> =
    Lazy::new(|| Arc::new(TypeCatalog::from_inventory()));

#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<TypeName, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn builder() -> TypeCatalogBuilder {
        TypeCatalogBuilder::new()
    }

    /// Collect every [`TypeRegistration`] linked into the binary.
    pub fn from_inventory() -> Self {
        let mut builder = Self::builder();
        for registration in inventory::iter::<TypeRegistration> {
            builder = builder.register(TypeDescriptor::from_registration(registration));
        }
        let catalog = builder.build();
        debug!("Collected {} registered types", catalog.len());
        catalog
    }

    /// Process-wide catalog built from the registration table on first use.
    pub fn global() -> Arc<TypeCatalog> {
        GLOBAL_CATALOG.clone()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&TypeName> {
        let mut names: Vec<_> = self.types.keys().collect();
        names.sort();
        names
    }

    fn resolve(&self, ty: &TypeName) -> Result<&TypeDescriptor, ScanError> {
        self.types
            .get(ty)
            .ok_or_else(|| ScanError::UnknownType(ty.clone()))
    }
}

impl MarkerPredicate for TypeCatalog {
    fn has_marker(&self, ty: &TypeName, marker: &MarkerKind) -> Result<bool, ScanError> {
        Ok(self.resolve(ty)?.has_marker(marker))
    }

    fn read_attribute(
        &self,
        ty: &TypeName,
        marker: &MarkerKind,
        key: &str,
    ) -> Result<Option<String>, ScanError> {
        Ok(self.resolve(ty)?.attribute(marker, key).map(str::to_string))
    }
}

impl TypeConstructor for TypeCatalog {
    fn construct(&self, ty: &TypeName) -> Result<Instance, ConstructError> {
        let descriptor = self
            .types
            .get(ty)
            .ok_or_else(|| ConstructError::UnknownType(ty.clone()))?;

        if !descriptor.accessible {
            return Err(ConstructError::Inaccessible(ty.clone()));
        }

        let constructor = descriptor
            .constructor
            .as_ref()
            .ok_or_else(|| ConstructError::MissingConstructor(ty.clone()))?;

        constructor().map_err(|source| ConstructError::Failed {
            ty: ty.clone(),
            source,
        })
    }
}

/// Manifest-style catalog assembly.
#[derive(Debug, Default)]
pub struct TypeCatalogBuilder {
    types: HashMap<TypeName, TypeDescriptor>,
}

impl TypeCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type. A later descriptor with the same name replaces the earlier one.
    pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
        let name = descriptor.name.clone();
        if self.types.insert(name.clone(), descriptor).is_some() {
            warn!("Type {} registered twice, keeping the later descriptor", name);
        }
        self
    }

    pub fn build(self) -> TypeCatalog {
        TypeCatalog { types: self.types }
    }
}
