pub mod config;
pub mod error;
pub mod lazy;
pub mod logging;
pub mod registry;
pub mod resource;
pub mod scanner;

pub use config::ScannerConfig;
pub use error::{AutofactoryError, Result};
pub use lazy::LazyCell;
pub use registry::{ConstructorFactory, FactoryRegistry, ModuleFactory};
pub use resource::{FsDirectoryResolver, InMemoryTree, ResourceLayout, ZipArchiveResolver};
pub use scanner::{
    ArchiveWalker, DirectoryWalker, MarkerScanner, MarkerScannerBuilder, ScanCache, TypeWalker,
};
