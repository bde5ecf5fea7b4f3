use crate::models::{NamespacePath, TypeName};

/// Boxed error used at capability boundaries (constructors, resolvers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("Empty segment in namespace `{0}`")]
    EmptySegment(String),
    #[error("Invalid namespace segment `{0}`")]
    InvalidSegment(String),
}

/// Failures while enumerating or filtering a resource tree.
///
/// Every variant is fatal to the scan that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Namespace not found: {0}")]
    UnknownNamespace(NamespacePath),
    #[error("Type not found: {0}")]
    UnknownType(TypeName),
    #[error("I/O error reading {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Resource root `{0}` is neither a directory nor an archive")]
    UnresolvedRoot(String),
    #[error("Malformed resource entry: `{0}`")]
    MalformedEntry(String),
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}

impl ScanError {
    pub fn io(resource: impl Into<String>, source: std::io::Error) -> Self {
        ScanError::Io {
            resource: resource.into(),
            source,
        }
    }
}

/// Failures of the parameterless-constructor capability.
#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
    #[error("Type not found: {0}")]
    UnknownType(TypeName),
    #[error("{0} has no parameterless constructor")]
    MissingConstructor(TypeName),
    #[error("{0} is not accessible")]
    Inaccessible(TypeName),
    #[error("Constructing {ty} failed: {source}")]
    Failed {
        ty: TypeName,
        #[source]
        source: BoxError,
    },
}
