use autofactory_api::{NamespacePath, ScanError};
use autofactory_plugin::DirectoryResolver;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Exploded directory tree: namespace `a.b` lives at `root/a/b`.
#[derive(Debug, Clone)]
pub struct FsDirectoryResolver {
    root: PathBuf,
}

impl FsDirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn directory_for(&self, namespace: &NamespacePath) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(namespace.segments());
        path
    }
}

impl DirectoryResolver for FsDirectoryResolver {
    /// Names are returned sorted so a walk over an unchanged tree is
    /// reproducible regardless of the platform's directory order.
    fn list_children(&self, namespace: &NamespacePath) -> Result<Vec<String>, ScanError> {
        let dir = self.directory_for(namespace);
        let resource = dir.display().to_string();

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScanError::UnknownNamespace(namespace.clone()));
            }
            Err(e) => return Err(ScanError::io(resource, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScanError::io(&resource, e))?;
            let name = entry.file_name().into_string().map_err(|raw| {
                ScanError::MalformedEntry(raw.to_string_lossy().into_owned())
            })?;
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}
