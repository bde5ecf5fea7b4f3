//! Capabilities consumed by the scanner, and the type catalog that backs
//! the marker and construction capabilities.

pub mod cap;
pub mod catalog;
pub mod resource;

pub use autofactory_api::{BoxError, ConstructError, MarkerKind, NamespacePath, ScanError, TypeName};
pub use cap::*;
pub use catalog::{
    Constructor, MarkerRegistration, TypeCatalog, TypeCatalogBuilder, TypeDescriptor,
    TypeRegistration,
};
pub use resource::{ArchiveResolver, DirectoryResolver};

#[doc(hidden)]
pub use inventory;
