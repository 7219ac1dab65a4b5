//! Patches and per-table merge policies
//!
//! A [`Patch`] is what a descriptor's transform produces; an [`UpdateMap`]
//! says how each of its tables lands on the store.

use crate::table_name::TableName;
use lrc_entity::EntityId;
use lrc_merge::{MergePolicy, Slot, Table};
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};

/// Partial update to one or more tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    tables: BTreeMap<TableName, Slot>,
}

impl Patch {
    /// Create empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slot for a table, replacing any previous one
    pub fn insert(&mut self, table: impl Into<TableName>, slot: Slot) {
        self.tables.insert(table.into(), slot);
    }

    /// Builder form of [`Patch::insert`]
    #[inline]
    #[must_use]
    pub fn with(mut self, table: impl Into<TableName>, slot: Slot) -> Self {
        self.insert(table, slot);
        self
    }

    /// Add one record to a table slot, creating the table if needed
    ///
    /// A non-table slot under the same name is replaced by a fresh table.
    pub fn insert_record(&mut self, table: impl Into<TableName>, id: impl Into<EntityId>, record: Value) {
        let slot = self
            .tables
            .entry(table.into())
            .or_insert_with(Slot::empty_table);
        if !matches!(slot, Slot::Table(_)) {
            *slot = Slot::empty_table();
        }
        if let Slot::Table(records) = slot {
            records.insert(id.into(), record);
        }
    }

    /// Builder form of [`Patch::insert_record`]
    #[inline]
    #[must_use]
    pub fn with_record(
        mut self,
        table: impl Into<TableName>,
        id: impl Into<EntityId>,
        record: Value,
    ) -> Self {
        self.insert_record(table, id, record);
        self
    }

    /// Slot for a table
    #[inline]
    #[must_use]
    pub fn get(&self, table: &TableName) -> Option<&Slot> {
        self.tables.get(table)
    }

    /// Table slot contents, if the slot is a table
    #[inline]
    #[must_use]
    pub fn table(&self, table: &TableName) -> Option<&Table> {
        self.tables.get(table).and_then(Slot::as_table)
    }

    /// Take the slot for a table out of the patch
    #[inline]
    pub fn remove(&mut self, table: &TableName) -> Option<Slot> {
        self.tables.remove(table)
    }

    /// Table names carried by this patch
    pub fn table_names(&self) -> impl Iterator<Item = &TableName> {
        self.tables.keys()
    }

    /// Number of tables in the patch
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the patch touches no table
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for Patch {
    type Item = (TableName, Slot);
    type IntoIter = btree_map::IntoIter<TableName, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

/// Merge policy per table
///
/// Only tables named here are written; patch tables without a policy are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateMap {
    policies: BTreeMap<TableName, MergePolicy>,
}

impl UpdateMap {
    /// Create empty update map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for a table
    #[inline]
    #[must_use]
    pub fn with(mut self, table: impl Into<TableName>, policy: MergePolicy) -> Self {
        self.policies.insert(table.into(), policy);
        self
    }

    /// Policy for a table
    #[inline]
    #[must_use]
    pub fn policy(&self, table: &TableName) -> Option<&MergePolicy> {
        self.policies.get(table)
    }

    /// Iterate `(table, policy)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&TableName, &MergePolicy)> {
        self.policies.iter()
    }

    /// Number of tables with a policy
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether no table has a policy
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_record_groups_by_table() {
        let patch = Patch::new()
            .with_record(TableName::COURSES, 1, json!({"id": 1}))
            .with_record(TableName::COURSES, 2, json!({"id": 2}))
            .with_record(TableName::VIDEOS, 1, json!({"id": 1}));

        assert_eq!(patch.len(), 2);
        assert_eq!(patch.table(&TableName::COURSES).unwrap().len(), 2);
        assert_eq!(patch.table(&TableName::VIDEOS).unwrap().len(), 1);
    }

    #[test]
    fn insert_record_replaces_non_table_slot() {
        let mut patch = Patch::new().with("x", Slot::Ids(vec![EntityId::Int(1)]));
        patch.insert_record("x", 1, json!({"id": 1}));
        assert_eq!(patch.table(&TableName::from("x")).unwrap().len(), 1);
    }

    #[test]
    fn empty_patch() {
        let patch = Patch::new();
        assert!(patch.is_empty());
        assert_eq!(patch.table_names().count(), 0);
    }

    #[test]
    fn update_map_lookup() {
        let update = UpdateMap::new()
            .with(TableName::COURSES, MergePolicy::DeepMerge)
            .with("coursesNext", MergePolicy::Replace);

        assert_eq!(update.len(), 2);
        assert_eq!(
            update.policy(&TableName::COURSES),
            Some(&MergePolicy::DeepMerge)
        );
        assert!(update.policy(&TableName::VIDEOS).is_none());
    }
}
