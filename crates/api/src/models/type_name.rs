use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Fully-qualified, dot-separated type identifier (`com.example.Foo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive a type name from an archive entry such as `com/example/Foo.class`.
    ///
    /// Returns `None` when `path` does not carry `suffix` or has an empty stem.
    pub fn from_resource_path(path: &str, suffix: &str) -> Option<Self> {
        let stem = path.strip_suffix(suffix)?;
        if stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Some(Self(stem.replace('/', ".")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Dotted namespace part, empty for a type in the root namespace.
    pub fn namespace(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}
