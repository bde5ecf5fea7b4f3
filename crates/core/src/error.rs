use autofactory_api::{ConstructError, MarkerKind, ScanError, TypeName};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutofactoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Construction failed: {0}")]
    Construct(#[from] ConstructError),
    #[error("{ty} carries {marker} without a `{key}` attribute")]
    MissingAttribute {
        ty: TypeName,
        marker: MarkerKind,
        key: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, AutofactoryError>;
