//! Cross-kind record lookup
//!
//! Provides [`ResourceLookup`], memoized on the full [`CompositeKey`].

use lrc_entity::{CompositeKey, EntityId, EntityKind, Reference};
use lrc_merge::Slot;
use lrc_store::{NormalizedStore, TableName};
use moka::sync::Cache;
use serde_json::Value;
use std::sync::Arc;

/// Cached result plus the version of the table it was read from
type Entry = (u64, Option<Arc<Value>>);

/// `(id, kind)` → record, memoized per composite key
///
/// Entries are validated against [`NormalizedStore::version`] of the kind's
/// table, so a merge into that table invalidates them while merges elsewhere
/// do not. Only the record itself is retained, never the table. Use one
/// lookup per store.
#[derive(Clone)]
pub struct ResourceLookup {
    cache: Cache<CompositeKey, Entry>,
}

impl std::fmt::Debug for ResourceLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLookup")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl ResourceLookup {
    /// Create lookup with max memo capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: Cache::new(max_capacity),
        }
    }

    /// Record of `kind` with `id`
    pub fn get(
        &self,
        store: &NormalizedStore,
        id: impl Into<EntityId>,
        kind: EntityKind,
    ) -> Option<Arc<Value>> {
        self.get_by_key(store, &CompositeKey::new(kind, id))
    }

    /// Record by composite key
    pub fn get_by_key(&self, store: &NormalizedStore, key: &CompositeKey) -> Option<Arc<Value>> {
        let table = TableName::for_kind(key.kind);
        let version = store.version(&table);

        if let Some((cached_version, record)) = self.cache.get(key) {
            if cached_version == version {
                return record;
            }
        }

        let record = store
            .slot_ref(&table)
            .and_then(Slot::as_table)
            .and_then(|table| table.get(&key.id))
            .cloned()
            .map(Arc::new);

        self.cache.insert(key.clone(), (version, record.clone()));
        record
    }

    /// Resolve a reference (inverse of [`Reference::from_record`])
    pub fn resolve(&self, store: &NormalizedStore, reference: &Reference) -> Option<Arc<Value>> {
        self.get_by_key(store, &reference.key())
    }

    /// Resolve many references in order, skipping ones not loaded yet
    pub fn resolve_all<'a>(
        &self,
        store: &NormalizedStore,
        references: impl IntoIterator<Item = &'a Reference>,
    ) -> Vec<Arc<Value>> {
        references
            .into_iter()
            .filter_map(|reference| self.resolve(store, reference))
            .collect()
    }

    /// Approximate number of memoized keys
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Drop all memoized entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for ResourceLookup {
    /// Lookup with default capacity (10,000 keys)
    fn default() -> Self {
        Self::new(10_000)
    }
}
