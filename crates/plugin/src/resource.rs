//! Resource resolver traits.
//!
//! A resource store exposes the namespace tree in one of two shapes:
//! - exploded directories, listed one namespace at a time
//! - a single archive, enumerated flat in one pass

use autofactory_api::{NamespacePath, ScanError};
use std::sync::Arc;

// ==================== Directory Layout ====================

/// Lists the direct children of a namespace as raw names.
///
/// Names carrying a `.` are types (`Foo.class`), the rest are nested
/// namespaces. Implementations must return the same listing for the same
/// store so walks stay deterministic.
pub trait DirectoryResolver: Send + Sync {
    fn list_children(&self, namespace: &NamespacePath) -> Result<Vec<String>, ScanError>;

    /// Resolver name (for logging/debugging)
    fn name(&self) -> &str {
        "directory"
    }
}

impl<R: DirectoryResolver + ?Sized> DirectoryResolver for Arc<R> {
    fn list_children(&self, namespace: &NamespacePath) -> Result<Vec<String>, ScanError> {
        (**self).list_children(namespace)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ==================== Archive Layout ====================

/// Enumerates every entry of a single archive, regardless of namespace.
///
/// Entries are slash-separated paths (`com/example/Foo.class`); directory
/// entries may be included and end with `/`.
pub trait ArchiveResolver: Send + Sync {
    fn list_all_entries(&self) -> Result<Vec<String>, ScanError>;

    /// Resolver name (for logging/debugging)
    fn name(&self) -> &str {
        "archive"
    }
}

impl<R: ArchiveResolver + ?Sized> ArchiveResolver for Arc<R> {
    fn list_all_entries(&self) -> Result<Vec<String>, ScanError> {
        (**self).list_all_entries()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
