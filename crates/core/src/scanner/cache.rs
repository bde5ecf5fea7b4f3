//! Per-marker memo of scan results.
//!
//! Stores and lookups both copy, so no caller ever holds a sequence that
//! aliases the cached one.

use autofactory_api::{MarkerKind, TypeName};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Thread-safe scan cache keyed by marker kind.
///
/// Hits only take the read lock. Misses are serialized per marker through
/// [`ScanCache::fill_lock`] so concurrent misses for one marker walk once.
#[derive(Debug, Default)]
pub struct ScanCache {
    entries: RwLock<HashMap<MarkerKind, Vec<TypeName>>>,
    fill_locks: DashMap<MarkerKind, Arc<Mutex<()>>>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the cached result for `marker`.
    pub fn get(&self, marker: &MarkerKind) -> Option<Vec<TypeName>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(marker).cloned()
    }

    /// Store a copy of `result`; an existing entry is replaced.
    pub fn store(&self, marker: MarkerKind, result: &[TypeName]) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(marker, result.to_vec());
    }

    pub fn contains(&self, marker: &MarkerKind) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(marker)
    }

    /// Drop the entry for `marker`; returns whether one existed.
    pub fn invalidate(&self, marker: &MarkerKind) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(marker).is_some()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// Number of cached markers
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutex serializing cache fills for one marker.
    pub(crate) fn fill_lock(&self, marker: &MarkerKind) -> Arc<Mutex<()>> {
        self.fill_locks
            .entry(marker.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
