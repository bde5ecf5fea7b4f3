use autofactory_api::{MarkerKind, ScanError, TypeName};

/// Answers marker queries about discovered types.
///
/// A type the host cannot resolve is a [`ScanError::UnknownType`], which
/// aborts the scan that asked.
pub trait MarkerPredicate: Send + Sync {
    fn has_marker(&self, ty: &TypeName, marker: &MarkerKind) -> Result<bool, ScanError>;

    /// Read one attribute of `marker` on `ty`, `None` if the type carries the
    /// marker without that attribute or does not carry the marker at all.
    fn read_attribute(
        &self,
        ty: &TypeName,
        marker: &MarkerKind,
        key: &str,
    ) -> Result<Option<String>, ScanError>;
}
