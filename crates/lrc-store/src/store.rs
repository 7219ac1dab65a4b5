//! The normalized entity store
//!
//! Provides [`NormalizedStore`]: named slots behind `Arc`, a per-table version
//! counter, and `apply`, the only mutation path.

use crate::error::StoreError;
use crate::patch::{Patch, UpdateMap};
use crate::table_name::TableName;
use lrc_entity::{CompositeKey, EntityKind};
use lrc_merge::{MergePolicy, Slot, SlotShape, Table};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store shared between the execution engine and readers
pub type SharedStore = Arc<RwLock<NormalizedStore>>;

/// Wrap a store for sharing
#[inline]
#[must_use]
pub fn shared(store: NormalizedStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}

/// Outcome of one [`NormalizedStore::apply`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Tables whose contents changed, in name order
    pub changed: Vec<TableName>,
    /// Patch tables dropped for lack of a policy
    pub dropped: Vec<TableName>,
}

impl ApplyReport {
    /// Whether the store is unchanged
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Normalized store keyed by table name, then by id
///
/// # Invariants
/// - Slots are replaced, never mutated in place: a reader holding an
///   `Arc<Slot>` sees a stable snapshot
/// - A slot's `Arc` and version change only when its contents change
/// - `revision` increases by one per `apply` that changed anything
#[derive(Debug, Clone, Default)]
pub struct NormalizedStore {
    slots: BTreeMap<TableName, Arc<Slot>>,
    versions: BTreeMap<TableName, u64>,
    revision: u64,
}

impl NormalizedStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a patch into the store
    ///
    /// Each table named in `update` is merged with its policy, whether or not
    /// the patch carries data for it (a `Dissoc` needs none). Patch tables
    /// with no policy are dropped.
    pub fn apply(&mut self, mut patch: Patch, update: &UpdateMap) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (table, policy) in update.iter() {
            let incoming = patch.remove(table);
            if self.apply_table(table, policy, incoming) {
                report.changed.push(table.clone());
            }
        }

        for (table, _) in patch {
            tracing::debug!("Dropping patch table '{}' with no update policy", table);
            report.dropped.push(table);
        }

        if !report.is_noop() {
            self.revision += 1;
            tracing::debug!(
                "Store revision {}: changed {:?}",
                self.revision,
                report.changed
            );
        }

        report
    }

    /// Merge one slot; returns whether it changed
    fn apply_table(&mut self, table: &TableName, policy: &MergePolicy, incoming: Option<Slot>) -> bool {
        let existing = self.slots.get(table).cloned();

        if let (Some(current), Some(patch)) = (existing.as_deref(), incoming.as_ref()) {
            let shape_matches = current.shape() == patch.shape();
            if !shape_matches && !matches!(policy, MergePolicy::Replace | MergePolicy::Dissoc(_)) {
                tracing::warn!(
                    "Table '{}' holds {:?} but patch is {:?}; {} falls back to replace",
                    table,
                    current.shape(),
                    patch.shape(),
                    policy.name()
                );
            }
        }

        let Some(next) = policy.apply(existing.as_deref(), incoming) else {
            return false;
        };

        if existing.as_deref() == Some(&next) {
            return false;
        }

        self.slots.insert(table.clone(), Arc::new(next));
        *self.versions.entry(table.clone()).or_insert(0) += 1;
        true
    }

    /// Shared handle to a slot
    #[inline]
    #[must_use]
    pub fn slot(&self, table: &TableName) -> Option<Arc<Slot>> {
        self.slots.get(table).cloned()
    }

    /// Borrow a slot
    #[inline]
    #[must_use]
    pub fn slot_ref(&self, table: &TableName) -> Option<&Slot> {
        self.slots.get(table).map(Arc::as_ref)
    }

    /// Borrow a table slot; `None` if absent or not a table
    #[inline]
    #[must_use]
    pub fn table(&self, table: &TableName) -> Option<&Table> {
        self.slot_ref(table).and_then(Slot::as_table)
    }

    /// Borrow a table slot, reporting shape mismatches
    ///
    /// # Errors
    /// Returns `StoreError::ShapeMismatch` if the slot is not a table
    pub fn try_table(&self, table: &TableName) -> Result<Option<&Table>, StoreError> {
        match self.slot_ref(table) {
            None => Ok(None),
            Some(Slot::Table(records)) => Ok(Some(records)),
            Some(other) => Err(StoreError::shape_mismatch(
                table.clone(),
                SlotShape::Table,
                other.shape(),
            )),
        }
    }

    /// Entity table of a kind
    #[inline]
    #[must_use]
    pub fn kind_table(&self, kind: EntityKind) -> Option<&Table> {
        self.table(&TableName::for_kind(kind))
    }

    /// Record by composite key
    ///
    /// Lookup always goes through the kind's own table, so equal ids of
    /// different kinds never collide.
    #[must_use]
    pub fn get(&self, key: &CompositeKey) -> Option<&Value> {
        self.kind_table(key.kind)?.get(&key.id)
    }

    /// Number of changes applied to a table so far (0 if never written)
    #[inline]
    #[must_use]
    pub fn version(&self, table: &TableName) -> u64 {
        self.versions.get(table).copied().unwrap_or(0)
    }

    /// Number of `apply` calls that changed the store
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Names of every written table
    pub fn table_names(&self) -> impl Iterator<Item = &TableName> {
        self.slots.keys()
    }
}
