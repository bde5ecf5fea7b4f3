//! Directory and archive strategies over real on-disk stores

use autofactory_core::{
    ArchiveWalker, DirectoryWalker, FsDirectoryResolver, MarkerScanner, ResourceLayout,
    ScannerConfig, TypeWalker, ZipArchiveResolver,
};
use autofactory_plugin::{MarkerKind, NamespacePath, ScanError, TypeCatalog, TypeDescriptor, TypeName};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const TYPES: &[&str] = &[
    "app/Core.class",
    "app/audio/Mixer.class",
    "app/audio/codec/Opus.class",
    "app/util/Helper.class",
    "lib/Outside.class",
];

fn write_tree(root: &Path) {
    for path in TYPES {
        let file = root.join(path);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, b"\xCA\xFE\xBA\xBE").unwrap();
    }
}

fn write_archive(path: &Path) {
    let mut zip = ZipWriter::new(std::fs::File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    zip.add_directory("app/", options).unwrap();
    for entry in TYPES {
        zip.start_file(*entry, options).unwrap();
        zip.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
    }
    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    zip.write_all(b"Manifest-Version: 1.0\n").unwrap();
    zip.finish().unwrap();
}

fn catalog() -> Arc<TypeCatalog> {
    Arc::new(
        TypeCatalog::builder()
            .register(TypeDescriptor::new("app.Core").marked(MarkerKind::MODULE))
            .register(TypeDescriptor::new("app.audio.Mixer").marked(MarkerKind::MODULE))
            .register(TypeDescriptor::new("app.audio.codec.Opus").marked(MarkerKind::MODULE))
            .register(TypeDescriptor::new("app.util.Helper"))
            .register(TypeDescriptor::new("lib.Outside").marked(MarkerKind::MODULE))
            .build(),
    )
}

fn sorted(mut types: Vec<TypeName>) -> Vec<TypeName> {
    types.sort();
    types
}

#[test]
fn test_directory_walk_on_disk() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path());

    let walker = DirectoryWalker::new(FsDirectoryResolver::new(temp.path()));
    let found = walker.walk(&NamespacePath::parse("app").unwrap()).unwrap();

    // Listing is sorted, and uppercase sorts before lowercase
    let names: Vec<&str> = found.iter().map(TypeName::as_str).collect();
    assert_eq!(
        names,
        vec![
            "app.Core",
            "app.audio.Mixer",
            "app.audio.codec.Opus",
            "app.util.Helper",
        ]
    );
}

#[test]
fn test_archive_and_directory_agree() {
    let temp = TempDir::new().unwrap();
    let tree_root = temp.path().join("classes");
    write_tree(&tree_root);
    let jar = temp.path().join("modules.jar");
    write_archive(&jar);

    let base = NamespacePath::parse("app").unwrap();
    let directory = DirectoryWalker::new(FsDirectoryResolver::new(&tree_root))
        .walk(&base)
        .unwrap();
    let archive = ArchiveWalker::new(ZipArchiveResolver::new(&jar))
        .walk(&base)
        .unwrap();

    assert_eq!(sorted(directory), sorted(archive));
}

#[test]
fn test_from_config_detects_layout() {
    let temp = TempDir::new().unwrap();
    let tree_root = temp.path().join("classes");
    write_tree(&tree_root);
    let jar = temp.path().join("modules.jar");
    write_archive(&jar);

    assert_eq!(ResourceLayout::detect(&tree_root).unwrap(), ResourceLayout::Directory);
    assert_eq!(ResourceLayout::detect(&jar).unwrap(), ResourceLayout::Archive);

    let base = NamespacePath::parse("app").unwrap();
    let from_dir = MarkerScanner::from_config(&ScannerConfig::new(base.clone(), &tree_root), catalog())
        .unwrap()
        .scan(&MarkerKind::MODULE)
        .unwrap();
    let from_jar = MarkerScanner::from_config(&ScannerConfig::new(base, &jar), catalog())
        .unwrap()
        .scan(&MarkerKind::MODULE)
        .unwrap();

    assert_eq!(from_dir.len(), 3);
    assert_eq!(sorted(from_dir), sorted(from_jar));
}

#[test]
fn test_empty_results() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path());
    std::fs::create_dir_all(temp.path().join("empty")).unwrap();

    let scanner = MarkerScanner::from_config(
        &ScannerConfig::new(NamespacePath::parse("empty").unwrap(), temp.path()),
        catalog(),
    )
    .unwrap();
    assert!(scanner.scan(&MarkerKind::MODULE).unwrap().is_empty());

    // Nothing carries an unused marker
    let scanner = MarkerScanner::from_config(
        &ScannerConfig::new(NamespacePath::parse("app").unwrap(), temp.path()),
        catalog(),
    )
    .unwrap();
    assert!(scanner.scan(&MarkerKind::new("plugin")).unwrap().is_empty());
}

#[test]
fn test_missing_base_namespace() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path());

    let walker = DirectoryWalker::new(FsDirectoryResolver::new(temp.path()));
    let result = walker.walk(&NamespacePath::parse("nowhere").unwrap());
    assert!(matches!(result, Err(ScanError::UnknownNamespace(_))));
}

#[test]
fn test_archive_prefix_respects_segments() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("modules.jar");
    write_archive(&jar);

    // `ap` must not match `app/...`
    let found = ArchiveWalker::new(ZipArchiveResolver::new(&jar))
        .walk(&NamespacePath::parse("ap").unwrap())
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_corrupt_archive_is_io_error() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("broken.jar");
    std::fs::write(&jar, b"PK\x03\x04 definitely not a zip").unwrap();

    let result = ArchiveWalker::new(ZipArchiveResolver::new(&jar)).walk(&NamespacePath::root());
    assert!(matches!(result, Err(ScanError::Io { .. })));
}

#[test]
fn test_explicit_layout_skips_detection() {
    let temp = TempDir::new().unwrap();
    let tree_root = temp.path().join("classes");
    write_tree(&tree_root);
    let jar = temp.path().join("modules.jar");
    write_archive(&jar);
    let base = NamespacePath::parse("app").unwrap();

    let mut config = ScannerConfig::new(base.clone(), &tree_root);
    config.layout = ResourceLayout::Directory;
    let scanner = MarkerScanner::from_config(&config, catalog()).unwrap();
    assert_eq!(scanner.scan(&MarkerKind::MODULE).unwrap().len(), 3);

    // Forcing the archive layout onto a directory fails at scan time
    let mut config = ScannerConfig::new(base, &tree_root);
    config.layout = ResourceLayout::Archive;
    let scanner = MarkerScanner::from_config(&config, catalog()).unwrap();
    assert!(matches!(
        scanner.scan(&MarkerKind::MODULE),
        Err(ScanError::Io { .. })
    ));
}

#[test]
fn test_unresolvable_root() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.txt");
    std::fs::write(&notes, b"not an archive").unwrap();

    let base = NamespacePath::parse("app").unwrap();
    for root in [notes, temp.path().join("missing")] {
        let result = MarkerScanner::from_config(&ScannerConfig::new(base.clone(), &root), catalog());
        assert!(matches!(result, Err(ScanError::UnresolvedRoot(_))));
    }
}
