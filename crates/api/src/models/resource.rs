use crate::error::ScanError;

/// One direct child of a namespace, classified by naming convention.
///
/// A raw name containing `.` is a type; the simple name is everything
/// before the last `.`. Any other name is a nested namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEntry {
    Namespace(String),
    Type(String),
}

impl ResourceEntry {
    pub fn classify(raw: &str) -> Result<Self, ScanError> {
        if raw.is_empty() || raw.contains('/') {
            return Err(ScanError::MalformedEntry(raw.to_string()));
        }
        match raw.rfind('.') {
            Some(0) => Err(ScanError::MalformedEntry(raw.to_string())),
            Some(idx) => Ok(ResourceEntry::Type(raw[..idx].to_string())),
            None => Ok(ResourceEntry::Namespace(raw.to_string())),
        }
    }
}
