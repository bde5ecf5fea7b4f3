use super::type_name::TypeName;
use crate::error::NamespaceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position in the resource tree, e.g. `com.example.modules`.
///
/// Accepts dot- or slash-separated text. The empty path is the root namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    pub const SEPARATOR: char = '.';
    pub const RESOURCE_SEPARATOR: char = '/';

    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, NamespaceError> {
        let trimmed = text.trim().trim_matches(Self::RESOURCE_SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let segments = trimmed
            .split([Self::SEPARATOR, Self::RESOURCE_SEPARATOR])
            .map(|segment| {
                if segment.is_empty() {
                    Err(NamespaceError::EmptySegment(text.to_string()))
                } else {
                    Ok(segment.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Nested namespace one level below this one.
    pub fn child(&self, segment: &str) -> Result<Self, NamespaceError> {
        if segment.is_empty()
            || segment.contains([Self::SEPARATOR, Self::RESOURCE_SEPARATOR])
        {
            return Err(NamespaceError::InvalidSegment(segment.to_string()));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// Fully-qualified name of a type living directly in this namespace.
    pub fn qualify(&self, simple_name: &str) -> TypeName {
        if self.is_root() {
            TypeName::new(simple_name)
        } else {
            TypeName::new(format!("{}{}{}", self, Self::SEPARATOR, simple_name))
        }
    }

    /// Slash-separated form used by resource stores (`com/example`).
    pub fn to_resource_path(&self) -> String {
        self.segments.join("/")
    }

    /// Whether `path` (slash-separated) lies at or below this namespace.
    ///
    /// Matches on whole segments: `a/bc/X` is not under `a/b`.
    pub fn contains_resource(&self, path: &str) -> bool {
        if self.is_root() {
            return true;
        }
        let prefix = self.to_resource_path();
        match path.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(Self::RESOURCE_SEPARATOR),
            None => false,
        }
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for NamespacePath {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NamespacePath {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NamespacePath> for String {
    fn from(value: NamespacePath) -> Self {
        value.to_string()
    }
}
