//! Merge policies
//!
//! Provides [`MergePolicy`], selected per table when a descriptor is defined.

use crate::record::{deep_merge, shallow_merge};
use crate::slot::{Slot, Table};
use lrc_entity::EntityId;
use serde_json::Value;
use std::collections::HashSet;

/// How a patch lands on an existing slot
///
/// # Characteristics
/// - Pure and total: shape mismatches resolve to the patch
/// - Idempotent: `apply(apply(T, P), P) == apply(T, P)`
/// - Table policies commute for patches with disjoint ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePolicy {
    /// Per id, `{...existing[id], ...patch[id]}`
    ShallowMerge,

    /// Per id, recursive field-wise merge
    DeepMerge,

    /// Patch replaces the slot (cursors, authoritative id lists)
    Replace,

    /// Remove one id from a table; the patch is ignored
    Dissoc(EntityId),

    /// Append ids not already present, preserving existing order
    AppendUnique,
}

impl MergePolicy {
    /// Apply this policy
    ///
    /// # Arguments
    /// * `existing` - Current slot, `None` if the table was never written
    /// * `patch` - Transform output for this table, `None` if it produced none
    ///
    /// # Returns
    /// The new slot, `None` when there is still nothing to store
    #[must_use]
    pub fn apply(&self, existing: Option<&Slot>, patch: Option<Slot>) -> Option<Slot> {
        if let Self::Dissoc(id) = self {
            return existing.map(|slot| dissoc(slot, id));
        }

        let Some(patch) = patch else {
            return existing.cloned();
        };

        let merged = match (self, existing, patch) {
            (Self::Replace, _, patch) => patch,
            (Self::ShallowMerge, existing, Slot::Table(incoming)) => {
                Slot::Table(merge_tables(existing, incoming, shallow_merge))
            }
            (Self::DeepMerge, existing, Slot::Table(incoming)) => {
                Slot::Table(merge_tables(existing, incoming, deep_merge))
            }
            (Self::AppendUnique, existing, Slot::Ids(incoming)) => {
                Slot::Ids(append_unique(existing, incoming))
            }
            (_, _, patch) => patch,
        };

        Some(merged)
    }

    /// Policy name (for logging)
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShallowMerge => "shallow_merge",
            Self::DeepMerge => "deep_merge",
            Self::Replace => "replace",
            Self::Dissoc(_) => "dissoc",
            Self::AppendUnique => "append_unique",
        }
    }
}

/// Merge `incoming` into the existing table (if the slot is one)
fn merge_tables(
    existing: Option<&Slot>,
    incoming: Table,
    merge_record: fn(&Value, &Value) -> Value,
) -> Table {
    let mut merged = existing
        .and_then(Slot::as_table)
        .cloned()
        .unwrap_or_default();

    for (id, record) in incoming {
        let next = match merged.get(&id) {
            Some(current) => merge_record(current, &record),
            None => record,
        };
        merged.insert(id, next);
    }

    merged
}

fn append_unique(existing: Option<&Slot>, incoming: Vec<EntityId>) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = existing
        .and_then(Slot::as_ids)
        .map(<[EntityId]>::to_vec)
        .unwrap_or_default();
    let mut seen: HashSet<EntityId> = ids.iter().cloned().collect();

    for id in incoming {
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }

    ids
}

fn dissoc(slot: &Slot, id: &EntityId) -> Slot {
    match slot {
        Slot::Table(table) => {
            let mut remaining = table.clone();
            remaining.remove(id);
            Slot::Table(remaining)
        }
        Slot::Ids(ids) => Slot::Ids(ids.iter().filter(|other| *other != id).cloned().collect()),
        Slot::Scalar(_) => slot.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table(records: &[Value]) -> Table {
        records
            .iter()
            .map(|r| (EntityId::from_value(&r["id"]).unwrap(), r.clone()))
            .collect()
    }

    #[test]
    fn shallow_merge_preserves_untouched_ids() {
        let existing = Slot::Table(table(&[
            json!({"id": 1, "title": "a"}),
            json!({"id": 2, "title": "b"}),
        ]));
        let patch = Slot::Table(table(&[json!({"id": 1, "is_favorite": true})]));

        let merged = MergePolicy::ShallowMerge
            .apply(Some(&existing), Some(patch))
            .unwrap();

        assert_eq!(
            merged,
            Slot::Table(table(&[
                json!({"id": 1, "title": "a", "is_favorite": true}),
                json!({"id": 2, "title": "b"}),
            ]))
        );
    }

    #[test]
    fn deep_merge_keeps_concurrent_nested_fields() {
        // A fetch wrote `runs`, a favorite toggle writes `is_favorite` plus a partial `meta`.
        let existing = Slot::Table(table(&[json!({
            "id": 1,
            "meta": {"runs": 3, "level": "intro"},
        })]));
        let patch = Slot::Table(table(&[json!({
            "id": 1,
            "is_favorite": true,
            "meta": {"level": "advanced"},
        })]));

        let merged = MergePolicy::DeepMerge.apply(Some(&existing), Some(patch)).unwrap();

        assert_eq!(
            merged.as_table().unwrap()[&EntityId::Int(1)],
            json!({"id": 1, "is_favorite": true, "meta": {"runs": 3, "level": "advanced"}})
        );
    }

    #[test]
    fn merge_into_missing_slot_creates_it() {
        let patch = Slot::Table(table(&[json!({"id": 4})]));
        let merged = MergePolicy::DeepMerge.apply(None, Some(patch.clone()));
        assert_eq!(merged, Some(patch));
    }

    #[test]
    fn replace_overwrites() {
        let existing = Slot::Scalar(json!("/api/v0/podcasts/recent/?page=2"));
        let merged = MergePolicy::Replace
            .apply(Some(&existing), Some(Slot::Scalar(json!(null))))
            .unwrap();
        assert_eq!(merged, Slot::Scalar(json!(null)));
    }

    #[test]
    fn dissoc_removes_only_target() {
        let existing = Slot::Table(table(&[
            json!({"id": 6}),
            json!({"id": 7}),
            json!({"id": 8}),
        ]));

        let merged = MergePolicy::Dissoc(EntityId::Int(7))
            .apply(Some(&existing), None)
            .unwrap();

        assert_eq!(merged, Slot::Table(table(&[json!({"id": 6}), json!({"id": 8})])));
    }

    #[test]
    fn dissoc_on_missing_slot_is_noop() {
        assert_eq!(MergePolicy::Dissoc(EntityId::Int(1)).apply(None, None), None);
    }

    #[test]
    fn dissoc_ignores_patch() {
        let existing = Slot::Table(table(&[json!({"id": 1}), json!({"id": 2})]));
        let patch = Slot::Table(table(&[json!({"id": 3})]));
        let merged = MergePolicy::Dissoc(EntityId::Int(1))
            .apply(Some(&existing), Some(patch))
            .unwrap();
        assert_eq!(merged, Slot::Table(table(&[json!({"id": 2})])));
    }

    #[test]
    fn append_unique_preserves_order() {
        let existing = Slot::Ids(vec![EntityId::Int(3), EntityId::Int(1)]);
        let patch = Slot::Ids(vec![EntityId::Int(1), EntityId::Int(9), EntityId::Int(9)]);

        let merged = MergePolicy::AppendUnique
            .apply(Some(&existing), Some(patch))
            .unwrap();

        assert_eq!(
            merged,
            Slot::Ids(vec![EntityId::Int(3), EntityId::Int(1), EntityId::Int(9)])
        );
    }

    #[test]
    fn absent_patch_leaves_slot() {
        let existing = Slot::Ids(vec![EntityId::Int(1)]);
        for policy in [
            MergePolicy::ShallowMerge,
            MergePolicy::DeepMerge,
            MergePolicy::Replace,
            MergePolicy::AppendUnique,
        ] {
            assert_eq!(policy.apply(Some(&existing), None), Some(existing.clone()));
        }
    }

    #[test]
    fn shape_mismatch_resolves_to_patch() {
        let existing = Slot::Table(table(&[json!({"id": 1})]));
        let patch = Slot::Ids(vec![EntityId::Int(1)]);
        assert_eq!(
            MergePolicy::DeepMerge.apply(Some(&existing), Some(patch.clone())),
            Some(patch)
        );
    }

    #[test]
    fn policy_names() {
        assert_eq!(MergePolicy::DeepMerge.name(), "deep_merge");
        assert_eq!(MergePolicy::Dissoc(EntityId::Int(1)).name(), "dissoc");
    }
}
