//! Scan → registry → lazy instance, end to end

use autofactory_core::{
    AutofactoryError, FactoryRegistry, LazyCell, MarkerScanner, ScannerConfig,
};
use autofactory_plugin::{MarkerKind, NamespacePath, TypeCatalog, TypeDescriptor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

static AUDIO_BUILT: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct AudioModule {
    serial: usize,
}

impl Default for AudioModule {
    fn default() -> Self {
        Self {
            serial: AUDIO_BUILT.fetch_add(1, Ordering::SeqCst),
        }
    }
}

#[derive(Default, Debug)]
struct InputModule;

fn write_classes(root: &std::path::Path, paths: &[&str]) {
    for path in paths {
        let file = root.join(path);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, b"").unwrap();
    }
}

fn catalog() -> Arc<TypeCatalog> {
    Arc::new(
        TypeCatalog::builder()
            .register(
                TypeDescriptor::new("game.audio.AudioModule")
                    .with_marker(MarkerKind::MODULE, [("name", "audio")])
                    .with_default::<AudioModule>(),
            )
            .register(
                TypeDescriptor::new("game.input.InputModule")
                    .with_marker(MarkerKind::MODULE, [("name", "input")])
                    .with_default::<InputModule>(),
            )
            .register(
                TypeDescriptor::new("game.input.LegacyInput")
                    .with_marker(MarkerKind::MODULE, [("name", "input")])
                    .with_default::<InputModule>(),
            )
            .register(TypeDescriptor::new("game.Main"))
            .build(),
    )
}

#[test]
fn test_discover_from_disk() {
    let temp = TempDir::new().unwrap();
    write_classes(
        temp.path(),
        &[
            "game/Main.class",
            "game/audio/AudioModule.class",
            "game/input/InputModule.class",
            "game/input/LegacyInput.class",
        ],
    );

    let config = ScannerConfig::new(NamespacePath::parse("game").unwrap(), temp.path());
    let catalog = catalog();
    let scanner = MarkerScanner::from_config(&config, catalog.clone()).unwrap();
    let registry =
        FactoryRegistry::discover_in_catalog(&scanner, &MarkerKind::MODULE, catalog).unwrap();

    assert_eq!(registry.names(), vec!["audio", "input"]);

    // Sorted listing visits LegacyInput after InputModule, so it wins the name
    assert_eq!(
        registry.get("input").unwrap().type_name().as_str(),
        "game.input.LegacyInput"
    );

    let cell = registry.get("audio").unwrap().instance();
    let first = cell.get_or_create_as::<AudioModule>().unwrap().unwrap();
    let again = cell.get_or_create_as::<AudioModule>().unwrap().unwrap();
    assert_eq!(first.serial, again.serial);

    cell.clear();
    let rebuilt = cell.get_or_create_as::<AudioModule>().unwrap().unwrap();
    assert_ne!(first.serial, rebuilt.serial);
}

#[test]
fn test_missing_name_attribute() {
    let temp = TempDir::new().unwrap();
    write_classes(temp.path(), &["game/Nameless.class"]);

    let catalog = Arc::new(
        TypeCatalog::builder()
            .register(
                TypeDescriptor::new("game.Nameless")
                    .marked(MarkerKind::MODULE)
                    .with_default::<InputModule>(),
            )
            .build(),
    );
    let config = ScannerConfig::new(NamespacePath::parse("game").unwrap(), temp.path());
    let scanner = MarkerScanner::from_config(&config, catalog.clone()).unwrap();

    let result = FactoryRegistry::discover_in_catalog(&scanner, &MarkerKind::MODULE, catalog);
    match result {
        Err(AutofactoryError::MissingAttribute { ty, key, .. }) => {
            assert_eq!(ty.as_str(), "game.Nameless");
            assert_eq!(key, "name");
        }
        other => panic!("expected MissingAttribute, got {:?}", other.map(|r| r.names())),
    }
}

#[test]
fn test_concurrent_get_or_create_builds_once() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let cell = Arc::new(LazyCell::from_fn(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(std::time::Duration::from_millis(5));
        vec![0u8; 16]
    }));

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cell.get_or_create().unwrap()
            })
        })
        .collect();

    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
}
