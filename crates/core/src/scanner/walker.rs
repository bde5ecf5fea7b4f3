//! Resource tree walkers: expand a root namespace into candidate type names.

use autofactory_api::{NamespacePath, ResourceEntry, ScanError, TypeName};
use autofactory_plugin::{ArchiveResolver, DirectoryResolver};
use std::rc::Rc;
use tracing::trace;

/// Default suffix of compiled type resources.
pub const DEFAULT_TYPE_SUFFIX: &str = ".class";

/// Enumerates every type identifier at or below a namespace.
///
/// Output order is traversal order and must be stable for an unchanged
/// store. Any failure aborts the walk; no partial result is returned.
pub trait TypeWalker: Send + Sync {
    fn walk(&self, root: &NamespacePath) -> Result<Vec<TypeName>, ScanError>;

    /// Walker name (for logging/debugging)
    fn name(&self) -> &str;
}

// ==================== Directory Layout ====================

/// Depth-first walk over a directory-shaped store.
///
/// Uses an explicit work stack, so nesting depth never grows the call stack.
/// Output matches a recursive walk that visits children in listing order.
pub struct DirectoryWalker<R> {
    resolver: R,
}

impl<R: DirectoryResolver> DirectoryWalker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn push_children(
        &self,
        namespace: Rc<NamespacePath>,
        pending: &mut Vec<(Rc<NamespacePath>, String)>,
    ) -> Result<(), ScanError> {
        let children = self.resolver.list_children(&namespace)?;
        trace!("{} lists {} children", namespace, children.len());
        // Reversed so the first listed child is popped first.
        pending.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (Rc::clone(&namespace), child)),
        );
        Ok(())
    }
}

impl<R: DirectoryResolver> TypeWalker for DirectoryWalker<R> {
    fn walk(&self, root: &NamespacePath) -> Result<Vec<TypeName>, ScanError> {
        let mut found = Vec::new();
        let mut pending = Vec::new();
        self.push_children(Rc::new(root.clone()), &mut pending)?;

        while let Some((namespace, raw)) = pending.pop() {
            match ResourceEntry::classify(&raw)? {
                ResourceEntry::Type(simple_name) => found.push(namespace.qualify(&simple_name)),
                ResourceEntry::Namespace(segment) => {
                    let nested = namespace.child(&segment)?;
                    self.push_children(Rc::new(nested), &mut pending)?;
                }
            }
        }

        Ok(found)
    }

    fn name(&self) -> &str {
        self.resolver.name()
    }
}

// ==================== Archive Layout ====================

/// Flat filter over one enumeration of an archive.
pub struct ArchiveWalker<R> {
    resolver: R,
    suffix: String,
}

impl<R: ArchiveResolver> ArchiveWalker<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            suffix: DEFAULT_TYPE_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: ArchiveResolver> TypeWalker for ArchiveWalker<R> {
    fn walk(&self, root: &NamespacePath) -> Result<Vec<TypeName>, ScanError> {
        let entries = self.resolver.list_all_entries()?;
        trace!("{} holds {} entries", self.resolver.name(), entries.len());

        entries
            .into_iter()
            .filter(|entry| entry.ends_with(&self.suffix) && root.contains_resource(entry))
            .map(|entry| {
                TypeName::from_resource_path(&entry, &self.suffix)
                    .ok_or(ScanError::MalformedEntry(entry))
            })
            .collect()
    }

    fn name(&self) -> &str {
        self.resolver.name()
    }
}
