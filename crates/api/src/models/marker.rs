use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Key of a declarative marker a scan filters on.
///
/// Equality and hashing are by name, so two kinds built from the same string
/// share a cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerKind(Cow<'static, str>);

impl MarkerKind {
    pub const MODULE: MarkerKind = MarkerKind(Cow::Borrowed("module"));

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<&str> for MarkerKind {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for MarkerKind {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for MarkerKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_owned_and_static_kinds_share_key() {
        let mut map = HashMap::new();
        map.insert(MarkerKind::MODULE, 1);
        assert_eq!(map.get(&MarkerKind::from("module")), Some(&1));
        assert_eq!(MarkerKind::MODULE.to_string(), "@module");
    }
}
