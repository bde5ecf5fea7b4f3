pub mod error;
pub mod models;

// Re-export commonly used types
pub use error::{BoxError, ConstructError, NamespaceError, ScanError};
pub use models::*;
