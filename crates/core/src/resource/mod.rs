//! Concrete resource stores and layout detection.
//!
//! - [`FsDirectoryResolver`]: exploded directory tree on disk
//! - [`ZipArchiveResolver`]: single zip archive on disk
//! - [`InMemoryTree`]: path manifest held in memory, usable as either layout

pub mod archive;
pub mod fs;
pub mod memory;

pub use archive::ZipArchiveResolver;
pub use fs::FsDirectoryResolver;
pub use memory::InMemoryTree;

use autofactory_api::ScanError;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

/// How the type resources under a root are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceLayout {
    Directory,
    Archive,
    /// Decide from the resource root itself, see [`ResourceLayout::detect`].
    #[default]
    Auto,
}

impl ResourceLayout {
    /// Resolve `Auto` against `root`; concrete layouts are returned unchanged.
    pub fn resolve(self, root: &Path) -> Result<Self, ScanError> {
        match self {
            ResourceLayout::Auto => Self::detect(root),
            layout => Ok(layout),
        }
    }

    /// A directory is a directory layout; a regular file is an archive layout
    /// if it starts with the zip magic `PK`. Anything else, including a
    /// missing root, is [`ScanError::UnresolvedRoot`].
    pub fn detect(root: &Path) -> Result<Self, ScanError> {
        let resource = root.display().to_string();
        let metadata = match std::fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScanError::UnresolvedRoot(resource));
            }
            Err(e) => return Err(ScanError::io(resource, e)),
        };

        if metadata.is_dir() {
            return Ok(ResourceLayout::Directory);
        }

        let mut magic = [0u8; 2];
        match std::fs::File::open(root).and_then(|mut file| file.read_exact(&mut magic)) {
            Ok(()) => {}
            // Shorter than the magic itself
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(ScanError::UnresolvedRoot(resource));
            }
            Err(e) => return Err(ScanError::io(resource, e)),
        }

        match magic {
            [0x50, 0x4B] => Ok(ResourceLayout::Archive),
            _ => Err(ScanError::UnresolvedRoot(resource)),
        }
    }
}

impl FromStr for ResourceLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directory" | "dir" => Ok(ResourceLayout::Directory),
            "archive" | "zip" | "jar" => Ok(ResourceLayout::Archive),
            "auto" => Ok(ResourceLayout::Auto),
            other => Err(format!("unknown resource layout `{}`", other)),
        }
    }
}
