//! Marker scanner: walk a namespace, keep the types carrying a marker.
//!
//! ```text
//! scan(marker) ──▶ ScanCache ──hit──▶ copy
//!                     │
//!                    miss
//!                     ▼
//!               TypeWalker.walk(base) ──▶ MarkerPredicate filter ──▶ store copy
//! ```

pub mod cache;
pub mod walker;

pub use cache::ScanCache;
pub use walker::{ArchiveWalker, DEFAULT_TYPE_SUFFIX, DirectoryWalker, TypeWalker};

use crate::config::ScannerConfig;
use crate::resource::{FsDirectoryResolver, ResourceLayout, ZipArchiveResolver};
use autofactory_api::{MarkerKind, NamespacePath, ScanError, TypeName};
use autofactory_plugin::MarkerPredicate;
use std::sync::{Arc, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

/// Scans a base namespace for types carrying a marker.
pub struct MarkerScanner {
    base_namespace: NamespacePath,
    walker: Box<dyn TypeWalker>,
    predicate: Arc<dyn MarkerPredicate>,
    cache: Option<ScanCache>,
}

impl MarkerScanner {
    pub fn builder(
        walker: impl TypeWalker + 'static,
        predicate: Arc<dyn MarkerPredicate>,
    ) -> MarkerScannerBuilder {
        MarkerScannerBuilder::new(Box::new(walker), predicate)
    }

    /// Build a scanner over the on-disk store described by `config`.
    ///
    /// The layout is chosen once here, from the configured resource root.
    pub fn from_config(
        config: &ScannerConfig,
        predicate: Arc<dyn MarkerPredicate>,
    ) -> Result<Self, ScanError> {
        let layout = config.layout.resolve(&config.resource_root)?;
        debug!(
            "Scanner over {} uses {:?} layout",
            config.resource_root.display(),
            layout
        );

        let walker: Box<dyn TypeWalker> = match layout {
            ResourceLayout::Archive => Box::new(
                ArchiveWalker::new(ZipArchiveResolver::new(&config.resource_root))
                    .with_suffix(config.type_suffix.clone()),
            ),
            ResourceLayout::Directory => Box::new(DirectoryWalker::new(FsDirectoryResolver::new(
                &config.resource_root,
            ))),
            // `resolve` replaces Auto with a detected layout
            ResourceLayout::Auto => {
                return Err(ScanError::UnresolvedRoot(
                    config.resource_root.display().to_string(),
                ));
            }
        };

        Ok(MarkerScannerBuilder::new(walker, predicate)
            .base_namespace(config.base_namespace.clone())
            .use_cache(config.use_cache)
            .build())
    }

    pub fn base_namespace(&self) -> &NamespacePath {
        &self.base_namespace
    }

    pub fn uses_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache(&self) -> Option<&ScanCache> {
        self.cache.as_ref()
    }

    /// Types under the base namespace carrying `marker`, in traversal order.
    ///
    /// With caching on, the first call per marker walks the store and later
    /// calls return a copy of that result. With caching off, every call walks.
    pub fn scan(&self, marker: &MarkerKind) -> Result<Vec<TypeName>, ScanError> {
        let Some(cache) = &self.cache else {
            return self.scan_uncached(self.walker.as_ref(), marker);
        };

        if let Some(hit) = cache.get(marker) {
            debug!("Scan cache hit for {} ({} types)", marker, hit.len());
            return Ok(hit);
        }

        let fill_lock = cache.fill_lock(marker);
        let _guard = fill_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have filled the entry while we waited.
        if let Some(hit) = cache.get(marker) {
            return Ok(hit);
        }

        let result = self.scan_uncached(self.walker.as_ref(), marker)?;
        cache.store(marker.clone(), &result);
        Ok(result)
    }

    /// Scan with a caller-chosen walker. Never reads or fills the cache.
    pub fn scan_with(
        &self,
        walker: &dyn TypeWalker,
        marker: &MarkerKind,
    ) -> Result<Vec<TypeName>, ScanError> {
        self.scan_uncached(walker, marker)
    }

    fn scan_uncached(
        &self,
        walker: &dyn TypeWalker,
        marker: &MarkerKind,
    ) -> Result<Vec<TypeName>, ScanError> {
        let start = Instant::now();
        let candidates = walker.walk(&self.base_namespace)?;
        let total = candidates.len();

        let mut matched = Vec::new();
        for candidate in candidates {
            if self.predicate.has_marker(&candidate, marker)? {
                matched.push(candidate);
            }
        }

        info!(
            "Scanned {} with {}: {} of {} types carry {} in {:?}",
            self.base_namespace,
            walker.name(),
            matched.len(),
            total,
            marker,
            start.elapsed()
        );
        Ok(matched)
    }
}

/// Builder for [`MarkerScanner`]
pub struct MarkerScannerBuilder {
    base_namespace: NamespacePath,
    walker: Box<dyn TypeWalker>,
    predicate: Arc<dyn MarkerPredicate>,
    use_cache: bool,
}

impl MarkerScannerBuilder {
    pub fn new(walker: Box<dyn TypeWalker>, predicate: Arc<dyn MarkerPredicate>) -> Self {
        Self {
            base_namespace: NamespacePath::root(),
            walker,
            predicate,
            use_cache: true,
        }
    }

    pub fn base_namespace(mut self, namespace: NamespacePath) -> Self {
        self.base_namespace = namespace;
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn build(self) -> MarkerScanner {
        MarkerScanner {
            base_namespace: self.base_namespace,
            walker: self.walker,
            predicate: self.predicate,
            cache: self.use_cache.then(ScanCache::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::InMemoryTree;
    use autofactory_plugin::{TypeCatalog, TypeDescriptor};

    fn catalog() -> Arc<TypeCatalog> {
        Arc::new(
            TypeCatalog::builder()
                .register(TypeDescriptor::new("app.Core").marked(MarkerKind::MODULE))
                .register(TypeDescriptor::new("app.util.Helper"))
                .register(TypeDescriptor::new("app.audio.Mixer").marked(MarkerKind::MODULE))
                .build(),
        )
    }

    fn tree() -> InMemoryTree {
        InMemoryTree::from_paths([
            "app/Core.class",
            "app/util/Helper.class",
            "app/audio/Mixer.class",
        ])
    }

    #[test]
    fn test_scan_filters_in_traversal_order() {
        let scanner = MarkerScanner::builder(DirectoryWalker::new(tree()), catalog())
            .base_namespace(NamespacePath::parse("app").unwrap())
            .build();

        let found = scanner.scan(&MarkerKind::MODULE).unwrap();
        assert_eq!(
            found,
            vec![TypeName::new("app.Core"), TypeName::new("app.audio.Mixer")]
        );
        assert!(scanner.cache().unwrap().contains(&MarkerKind::MODULE));
    }

    #[test]
    fn test_scan_with_bypasses_cache() {
        let scanner = MarkerScanner::builder(DirectoryWalker::new(tree()), catalog())
            .base_namespace(NamespacePath::parse("app").unwrap())
            .build();

        let archive = ArchiveWalker::new(tree());
        let found = scanner.scan_with(&archive, &MarkerKind::MODULE).unwrap();
        assert_eq!(found.len(), 2);
        assert!(scanner.cache().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_candidate_fails_scan() {
        let mut tree = tree();
        tree.insert("app/Unregistered.class");
        let scanner = MarkerScanner::builder(DirectoryWalker::new(tree), catalog())
            .base_namespace(NamespacePath::parse("app").unwrap())
            .build();

        let result = scanner.scan(&MarkerKind::MODULE);
        assert!(matches!(result, Err(ScanError::UnknownType(_))));
        assert!(scanner.cache().unwrap().is_empty());
    }

    #[test]
    fn test_uncached_scanner() {
        let scanner = MarkerScanner::builder(DirectoryWalker::new(tree()), catalog())
            .base_namespace(NamespacePath::parse("app").unwrap())
            .use_cache(false)
            .build();

        assert!(!scanner.uses_cache());
        assert_eq!(scanner.scan(&MarkerKind::MODULE).unwrap().len(), 2);
    }
}
