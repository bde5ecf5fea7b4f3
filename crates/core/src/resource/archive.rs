use autofactory_api::ScanError;
use autofactory_plugin::ArchiveResolver;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Single zip archive (jar-style) holding the whole resource tree.
#[derive(Debug, Clone)]
pub struct ZipArchiveResolver {
    path: PathBuf,
}

impl ZipArchiveResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveResolver for ZipArchiveResolver {
    fn list_all_entries(&self) -> Result<Vec<String>, ScanError> {
        let resource = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|e| ScanError::io(&resource, e))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| ScanError::io(&resource, e.into()))?;

        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index(index)
                .map_err(|e| ScanError::io(&resource, e.into()))?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn name(&self) -> &str {
        "zip"
    }
}
