use autofactory_api::{NamespacePath, ScanError};
use autofactory_plugin::{ArchiveResolver, DirectoryResolver, TypeCatalog};

/// Resource tree described by a list of slash-separated paths.
///
/// Serves both layouts from the same data, which makes it a manifest for
/// applications that assemble their types at startup. Paths ending in `/`
/// declare (possibly empty) namespaces.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTree {
    paths: Vec<String>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Resource tree holding one `a/b/C{suffix}` entry per catalog type,
    /// in sorted name order.
    pub fn from_catalog(catalog: &TypeCatalog, suffix: &str) -> Self {
        Self::from_paths(
            catalog
                .names()
                .into_iter()
                .map(|ty| format!("{}{}", ty.as_str().replace('.', "/"), suffix)),
        )
    }

    pub fn insert(&mut self, path: impl Into<String>) {
        self.paths.push(path.into());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl DirectoryResolver for InMemoryTree {
    /// Children in first-seen order.
    fn list_children(&self, namespace: &NamespacePath) -> Result<Vec<String>, ScanError> {
        let prefix = if namespace.is_root() {
            String::new()
        } else {
            format!("{}/", namespace.to_resource_path())
        };

        let mut exists = namespace.is_root();
        let mut children: Vec<String> = Vec::new();

        for path in &self.paths {
            let Some(rest) = path.strip_prefix(prefix.as_str()) else {
                continue;
            };
            exists = true;

            let child = match rest.find('/') {
                Some(idx) => &rest[..idx],
                None => rest,
            };
            if !child.is_empty() && !children.iter().any(|c| c == child) {
                children.push(child.to_string());
            }
        }

        if !exists {
            return Err(ScanError::UnknownNamespace(namespace.clone()));
        }
        Ok(children)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl ArchiveResolver for InMemoryTree {
    fn list_all_entries(&self) -> Result<Vec<String>, ScanError> {
        Ok(self.paths.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
