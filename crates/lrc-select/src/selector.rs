//! Selector trait and per-kind table selectors

use crate::memo::Inputs;
use lrc_entity::{EntityKind, Reference};
use lrc_merge::Slot;
use lrc_store::{NormalizedStore, TableName};
use serde_json::Value;
use std::sync::Arc;

/// Derived value over a store snapshot
///
/// Implementations must be pure: the same store contents yield equal output.
pub trait Selector {
    /// Derived value type
    type Output;

    /// Read (or recompute) the derived value
    fn select(&self, store: &NormalizedStore) -> Arc<Self::Output>;
}

/// Identity pass-through of one entity table
///
/// Returns the store's own `Arc`, so callers can use pointer equality to
/// detect change. A table never written yields a shared empty slot.
#[derive(Debug, Clone)]
pub struct TableSelector {
    table: TableName,
    empty: Arc<Slot>,
}

impl TableSelector {
    /// Selector for the table of `kind`
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self::for_table(TableName::for_kind(kind))
    }

    /// Selector for any named slot
    #[must_use]
    pub fn for_table(table: TableName) -> Self {
        Self {
            table,
            empty: Arc::new(Slot::empty_table()),
        }
    }

    /// Table being selected
    #[inline]
    #[must_use]
    pub fn table(&self) -> &TableName {
        &self.table
    }
}

impl Selector for TableSelector {
    type Output = Slot;

    fn select(&self, store: &NormalizedStore) -> Arc<Slot> {
        store
            .slot(&self.table)
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }
}

/// The six entity slots, in [`EntityKind::TABLE_KINDS`] order
#[must_use]
pub fn entity_inputs(store: &NormalizedStore) -> Inputs {
    EntityKind::TABLE_KINDS
        .iter()
        .map(|kind| store.slot(&TableName::for_kind(*kind)))
        .collect()
}

/// Resolve references against the store, skipping ones not loaded yet
#[must_use]
pub fn resolve_references<'a>(
    store: &NormalizedStore,
    references: impl IntoIterator<Item = &'a Reference>,
) -> Vec<Value> {
    references
        .into_iter()
        .filter_map(|reference| store.get(&reference.key()).cloned())
        .collect()
}
